use crate::{Axis, Ray, Vec3};

/// Parametric span `[t_near, t_far]` where `ray` is inside the box
/// `[min, max]`, using the slab method.
///
/// Each axis gives two plane-crossing distances; a slab lying entirely
/// behind the origin rejects the ray immediately, otherwise the three slabs
/// are intersected. Axis-parallel rays divide by a signed zero and get
/// `±inf` crossings, which keeps the interval arithmetic correct without a
/// special case.
///
/// Returns `None` when the ray misses or the box is inverted (`min > max` on
/// some axis). `t_near` is negative when the origin is inside the box.
pub fn slab_span(min: Vec3, max: Vec3, ray: &Ray) -> Option<(f32, f32)> {
    if min.cmpgt(max).any() {
        return None;
    }

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in Axis::ALL {
        let origin = axis.of(ray.origin);
        let direction = axis.of(ray.direction);
        let mut t0 = (axis.of(min) - origin) / direction;
        let mut t1 = (axis.of(max) - origin) / direction;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t1 < 0.0 {
            // slab is behind the ray
            return None;
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
    }

    if t_near > t_far {
        None
    } else {
        Some((t_near, t_far))
    }
}

/// Axis-aligned bounding box stored as its two extreme corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box that contains nothing; growing it by any point yields that point.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point of `points`.
    pub fn enclosing<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        points.into_iter().fold(Self::EMPTY, |acc, p| acc.grow(p))
    }

    /// This box extended to contain `point`.
    #[inline]
    pub fn grow(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Side lengths.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Midpoint of the box along `axis`.
    pub fn midpoint(&self, axis: Axis) -> f32 {
        (axis.of(self.min) + axis.of(self.max)) * 0.5
    }

    /// Longest axis. Ties resolve toward the later axis, so a cube splits on z.
    pub fn longest_axis(&self) -> Axis {
        let e = self.extent();
        if e.x > e.y && e.x > e.z {
            Axis::X
        } else if e.y > e.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// All three axes ordered from the longest side to the shortest.
    pub fn axes_by_extent(&self) -> [Axis; 3] {
        let longest = self.longest_axis();
        let e = self.extent();
        let mut rest: Vec<Axis> = Axis::ALL.into_iter().filter(|&a| a != longest).collect();
        rest.sort_by(|&a, &b| {
            b.of(e)
                .partial_cmp(&a.of(e))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        [longest, rest[0], rest[1]]
    }

    /// Whether `point` lies inside or on the boundary of the box.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Whether the ray passes through the box in front of its origin.
    #[inline]
    pub fn hit(&self, ray: &Ray) -> bool {
        slab_span(self.min, self.max, ray).is_some()
    }

    /// Distance at which the ray enters the box: `Some(0.0)` if the origin is
    /// already inside, `None` on a miss.
    pub fn entry_distance(&self, ray: &Ray) -> Option<f32> {
        slab_span(self.min, self.max, ray).map(|(t_near, _)| t_near.max(0.0))
    }

    /// Distance at which the ray leaves the box, `None` on a miss.
    pub fn exit_distance(&self, ray: &Ray) -> Option<f32> {
        slab_span(self.min, self.max, ray).map(|(_, t_far)| t_far)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_enclosing_contains_every_point() {
        let points = [
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-4.0, 5.0, 0.5),
            Vec3::new(0.0, 0.0, -7.0),
        ];
        let aabb = Aabb::enclosing(points);

        assert_eq!(aabb.min, Vec3::new(-4.0, -2.0, -7.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 5.0, 3.0));
        assert!(points.iter().all(|&p| aabb.contains(p)));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.hit(&ray));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray));
    }

    #[test]
    fn test_axis_parallel_ray_uses_infinities() {
        let aabb = unit_box();

        // direction.x == direction.y == 0, origin inside those slabs
        let inside = Ray::new(Vec3::new(0.5, -0.5, 4.0), Vec3::NEG_Z);
        assert_eq!(aabb.entry_distance(&inside), Some(3.0));

        // origin outside the x slab, never crosses it
        let outside = Ray::new(Vec3::new(2.0, 0.0, 4.0), Vec3::NEG_Z);
        assert_eq!(aabb.entry_distance(&outside), None);
    }

    #[test]
    fn test_empty_box_is_never_hit() {
        let rays = [
            Ray::new(Vec3::new(100.0, 100.0, 100.0), Vec3::X),
            Ray::new(Vec3::ZERO, Vec3::NEG_Z),
            Ray::new(Vec3::new(-3.0, 2.0, 1.0), Vec3::new(1.0, -1.0, 0.5).normalize()),
        ];
        for ray in &rays {
            assert!(!Aabb::EMPTY.hit(ray));
            assert_eq!(Aabb::EMPTY.entry_distance(ray), None);
            assert_eq!(Aabb::EMPTY.exit_distance(ray), None);
        }
        assert!(!Aabb::EMPTY.contains(Vec3::ZERO));
    }

    #[test]
    fn test_flat_box_is_still_hit() {
        let flat = Aabb::from_points(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(flat.entry_distance(&ray), Some(5.0));
    }

    #[test]
    fn test_entry_and_exit_distance() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert_eq!(aabb.entry_distance(&ray), Some(4.0));
        assert_eq!(aabb.exit_distance(&ray), Some(6.0));

        // origin inside: entry clamps to zero
        let inside = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(aabb.entry_distance(&inside), Some(0.0));
        assert_eq!(aabb.exit_distance(&inside), Some(1.0));

        // box behind the ray
        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(aabb.entry_distance(&behind), None);
        assert_eq!(aabb.exit_distance(&behind), None);
    }

    #[test]
    fn test_aabb_longest_axis() {
        let aabb_x = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0));
        assert_eq!(aabb_x.longest_axis(), Axis::X);

        let aabb_y = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb_y.longest_axis(), Axis::Y);

        let aabb_z = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(aabb_z.longest_axis(), Axis::Z);

        let cube = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert_eq!(cube.longest_axis(), Axis::Z);
    }

    #[test]
    fn test_axes_by_extent() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 7.0, 4.0));
        assert_eq!(aabb.axes_by_extent(), [Axis::Y, Axis::Z, Axis::X]);
    }

    #[test]
    fn test_aabb_midpoint() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 4.0, 2.0));

        assert_eq!(aabb.midpoint(Axis::X), 5.0);
        assert_eq!(aabb.midpoint(Axis::Y), 2.0);
    }
}
