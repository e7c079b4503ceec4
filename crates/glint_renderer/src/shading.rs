//! Recursive Whitted-style shading.
//!
//! Every hit gets ambient plus Blinn-Phong direct light from each visible
//! point light. Mirrors, conductors and dielectrics then spawn secondary rays
//! as long as the recursion budget lasts; each secondary ray and each
//! internal bounce inside a dielectric spends one unit of that budget.

use glint_core::{Color, Material, MaterialKind};
use glint_math::{Ray, Vec3};

use crate::{Scene, Surface};

/// Colour seen along `ray` with `remaining_depth` secondary bounces left.
pub fn ray_color(scene: &Scene, ray: &Ray, remaining_depth: u32) -> Color {
    let Some(hit) = scene.closest_hit(ray) else {
        return scene.background_color;
    };

    let material = hit.surface.material();

    // shade the side the ray arrived from
    let normal = if ray.direction.dot(hit.normal) > 0.0 {
        -hit.normal
    } else {
        hit.normal
    };
    let surface_point = ray.at(hit.t);
    let point = surface_point + normal * scene.shadow_ray_epsilon;

    let mut color = scene.ambient_light * material.ambient;

    for light in &scene.lights {
        if scene.light_visible(point, light) {
            let to_light = (light.position - point).normalize();
            let irradiance = light.irradiance_at(point);
            color += blinn_phong(material, normal, to_light, ray.direction, irradiance);
        }
    }

    if remaining_depth == 0 {
        return color;
    }

    match material.kind {
        MaterialKind::Default => {}
        MaterialKind::Mirror { mirror_reflectance } => {
            let reflected = Ray::new(point, reflect(ray.direction, normal));
            color += mirror_reflectance * ray_color(scene, &reflected, remaining_depth - 1);
        }
        MaterialKind::Conductor {
            mirror_reflectance,
            refraction_index,
            absorption_index,
        } => {
            let cos_theta = (-ray.direction.dot(normal)).clamp(0.0, 1.0);
            let fresnel = conductor_fresnel(cos_theta, refraction_index, absorption_index);
            let reflected = Ray::new(point, reflect(ray.direction, normal));
            color += mirror_reflectance
                * fresnel
                * ray_color(scene, &reflected, remaining_depth - 1);
        }
        MaterialKind::Dielectric {
            absorption_coefficient,
            refraction_index,
        } => {
            color += transmitted(
                scene,
                ray,
                hit.surface,
                surface_point,
                normal,
                absorption_coefficient,
                refraction_index,
                remaining_depth - 1,
            );
        }
    }

    color
}

/// Diffuse plus specular response to one light.
///
/// `to_light` is the unit vector toward the light, `view` the incoming ray
/// direction. Both cosines are clamped at zero.
pub fn blinn_phong(
    material: &Material,
    normal: Vec3,
    to_light: Vec3,
    view: Vec3,
    irradiance: Color,
) -> Color {
    let half = (to_light - view).normalize();
    let diffuse = material.diffuse * normal.dot(to_light).max(0.0) * irradiance;
    let specular = material.specular
        * normal.dot(half).max(0.0).powf(material.phong_exponent)
        * irradiance;
    diffuse + specular
}

/// Mirror `direction` about `normal`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Refract a unit `direction` through a boundary with `normal` facing it,
/// `eta` being the ratio of the incident to the transmitted index.
///
/// Returns `None` for total internal reflection, including the critical
/// angle itself.
pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -direction.dot(normal);
    let radicand = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if radicand <= 0.0 {
        return None;
    }
    Some((eta * direction + (eta * cos_i - radicand.sqrt()) * normal).normalize())
}

/// Fraction of light a conductor reflects at incidence angle `cos_theta`,
/// averaged over s- and p-polarisation.
pub fn conductor_fresnel(cos_theta: f32, refraction_index: f32, absorption_index: f32) -> f32 {
    let n = refraction_index;
    let nk = n * n + absorption_index * absorption_index;
    let cos2 = cos_theta * cos_theta;
    let two_n_cos = 2.0 * n * cos_theta;

    let rs = (nk - two_n_cos + cos2) / (nk + two_n_cos + cos2);
    let rp = (nk * cos2 - two_n_cos + 1.0) / (nk * cos2 + two_n_cos + 1.0);
    (rs + rp) / 2.0
}

/// Light arriving through a dielectric: refract in, bounce around inside
/// the entered surface until the ray can leave, refract out and trace on.
#[allow(clippy::too_many_arguments)]
fn transmitted(
    scene: &Scene,
    ray: &Ray,
    medium: &dyn Surface,
    surface_point: Vec3,
    normal: Vec3,
    absorption: Color,
    refraction_index: f32,
    mut budget: u32,
) -> Color {
    let Some(direction) = refract(ray.direction, normal, 1.0 / refraction_index) else {
        return Color::ZERO;
    };

    let eps = scene.shadow_ray_epsilon;
    let mut inner = Ray::new(surface_point - normal * eps, direction);
    let mut distance = 0.0;

    loop {
        let Some(exit) = medium.intersect(&inner, scene.intersection_test_epsilon) else {
            return Color::ZERO;
        };
        distance += exit.t * inner.direction.length();

        let exit_point = inner.at(exit.t);
        // normal pointing back into the medium, facing the inner ray
        let inward = if inner.direction.dot(exit.normal) > 0.0 {
            -exit.normal
        } else {
            exit.normal
        };

        match refract(inner.direction, inward, refraction_index) {
            Some(out) => {
                let outgoing = Ray::new(exit_point - inward * eps, out);
                let attenuation = Vec3::new(
                    (-absorption.x * distance).exp(),
                    (-absorption.y * distance).exp(),
                    (-absorption.z * distance).exp(),
                );
                return attenuation * ray_color(scene, &outgoing, budget);
            }
            None => {
                if budget == 0 {
                    return Color::ZERO;
                }
                budget -= 1;
                inner = Ray::new(exit_point + inward * eps, reflect(inner.direction, inward));
            }
        }
    }
}
