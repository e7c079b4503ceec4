//! Tile-based rendering.
//!
//! Divides the image into square tiles that are rendered independently,
//! each into its own buffer, so workers never share output memory.

use std::time::Instant;

use glint_core::Color;

use crate::shading::ray_color;
use crate::{Camera, Scene};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Position of this tile in the render order
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Generate tiles covering the image, ordered from the center outward.
///
/// Edge tiles are clipped to the image. The order only affects which part
/// of the frame finishes first, never the pixels.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let mut tiles = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, tiles.len()));
            x += tile_size;
        }
        y += tile_size;
    }

    sort_spiral(&mut tiles, width, height);

    for (i, tile) in tiles.iter_mut().enumerate() {
        tile.index = i;
    }

    tiles
}

/// Sort tiles by distance from the image center. Stable, so equidistant
/// tiles keep row-major order.
fn sort_spiral(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |t: &Tile| {
        let dx = t.x as f32 + t.width as f32 / 2.0 - center_x;
        let dy = t.y as f32 + t.height as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    tiles.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Pixels and timings of one rendered tile, both row-major within the tile.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    pub pixels: Vec<[u8; 3]>,
    /// Wall-clock time per pixel in microseconds
    pub times: Vec<u32>,
}

/// Clamp each channel to [0, 255] and truncate to 8 bits. NaN becomes 0.
#[inline]
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        color.x.clamp(0.0, 255.0) as u8,
        color.y.clamp(0.0, 255.0) as u8,
        color.z.clamp(0.0, 255.0) as u8,
    ]
}

/// Trace one pixel, returning its colour and how long it took in µs.
pub fn render_pixel(scene: &Scene, camera: &dyn Camera, x: u32, y: u32) -> ([u8; 3], u32) {
    let start = Instant::now();
    let ray = camera.cast_ray(x, y);
    let rgb = color_to_rgb(ray_color(scene, &ray, scene.max_recursion_depth));
    let micros = u32::try_from(start.elapsed().as_micros()).unwrap_or(u32::MAX);
    (rgb, micros)
}

/// Render every pixel of `tile`.
pub fn render_tile(scene: &Scene, camera: &dyn Camera, tile: &Tile) -> TileResult {
    let mut pixels = Vec::with_capacity(tile.pixel_count());
    let mut times = Vec::with_capacity(tile.pixel_count());

    for local_y in 0..tile.height {
        for local_x in 0..tile.width {
            let (rgb, micros) = render_pixel(scene, camera, tile.x + local_x, tile.y + local_y);
            pixels.push(rgb);
            times.push(micros);
        }
    }

    TileResult {
        tile: *tile,
        pixels,
        times,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraBasis, NearPlane, PerspectiveCamera};
    use glint_math::Vec3;

    #[test]
    fn test_generate_tiles_exact_fit() {
        let tiles = generate_tiles(128, 128, 64);
        assert_eq!(tiles.len(), 4);

        let total: usize = tiles.iter().map(|t| t.pixel_count()).sum();
        assert_eq!(total, 128 * 128);
    }

    #[test]
    fn test_generate_tiles_partial_fit() {
        let tiles = generate_tiles(100, 70, 32);
        assert_eq!(tiles.len(), 4 * 3);

        let total: usize = tiles.iter().map(|t| t.pixel_count()).sum();
        assert_eq!(total, 100 * 70);
        assert!(tiles.iter().any(|t| t.width == 4 && t.height == 6));
    }

    #[test]
    fn test_spiral_order_starts_at_center() {
        let tiles = generate_tiles(96, 96, 32);
        assert_eq!(tiles.len(), 9);
        assert_eq!((tiles[0].x, tiles[0].y), (32, 32));
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.index, i);
        }
    }

    #[test]
    fn test_empty_image_has_no_tiles() {
        assert!(generate_tiles(0, 10, 8).is_empty());
        assert!(generate_tiles(10, 0, 8).is_empty());
    }

    #[test]
    fn test_color_to_rgb_clamps_and_truncates() {
        assert_eq!(color_to_rgb(Color::new(-5.0, 127.9, 400.0)), [0, 127, 255]);
        assert_eq!(color_to_rgb(Color::new(f32::NAN, 0.5, 255.0)), [0, 0, 255]);
    }

    #[test]
    fn test_render_tile_fills_background() {
        let scene = Scene {
            background_color: Color::new(10.0, 20.0, 30.0),
            ..Default::default()
        };
        let camera = PerspectiveCamera::new(
            "bg.png",
            CameraBasis::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y),
            (8, 8),
            NearPlane::new(-1.0, 1.0, -1.0, 1.0, 1.0),
        );
        let tile = Tile::new(2, 3, 4, 5, 0);
        let result = render_tile(&scene, &camera, &tile);

        assert_eq!(result.pixels.len(), 20);
        assert_eq!(result.times.len(), 20);
        assert!(result.pixels.iter().all(|&p| p == [10, 20, 30]));
    }
}
