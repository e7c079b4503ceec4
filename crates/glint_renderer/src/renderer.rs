//! Frame rendering: tiles, workers and the finished images.

use std::path::Path;
use std::time::Instant;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::heatmap::time_heatmap;
use crate::scheduler::TileScheduler;
use crate::tile::{generate_tiles, render_tile, TileResult, DEFAULT_TILE_SIZE};
use crate::{Camera, Scene};

/// Errors that can occur while setting up a renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Tile size must be at least 1 pixel")]
    InvalidTileSize,
}

/// How tiles are distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// All pool threads claim tiles concurrently.
    #[default]
    Parallel,
    /// Tiles are rendered one after another on the calling thread.
    Sequential,
}

/// Renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Worker threads; 0 picks one per available core
    pub threads: usize,
    pub mode: ExecutionMode,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            threads: 0,
            mode: ExecutionMode::Parallel,
        }
    }
}

/// One rendered camera view.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image_name: String,
    pub image: RgbImage,
    /// Per-pixel render time in microseconds, row-major
    pub times: Vec<u32>,
    pub width: u32,
    pub height: u32,
    pub tile_count: usize,
}

impl Frame {
    /// Red heatmap of the per-pixel render times.
    pub fn heatmap(&self) -> RgbImage {
        time_heatmap(&self.times, self.width, self.height)
    }

    /// File name for the heatmap: `<stem>_time.png` next to the image.
    pub fn heatmap_name(&self) -> String {
        let path = Path::new(&self.image_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image_name.clone());
        path.with_file_name(format!("{}_time.png", stem))
            .to_string_lossy()
            .into_owned()
    }
}

/// Tile-parallel renderer owning a reusable worker pool.
pub struct Renderer {
    settings: RenderSettings,
    scheduler: Option<TileScheduler>,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Result<Self, RenderError> {
        if settings.tile_size == 0 {
            return Err(RenderError::InvalidTileSize);
        }

        let scheduler = match settings.mode {
            ExecutionMode::Parallel => Some(TileScheduler::new(settings.threads)?),
            ExecutionMode::Sequential => None,
        };

        Ok(Self {
            settings,
            scheduler,
        })
    }

    /// Threads rendering tiles; 1 in sequential mode.
    pub fn thread_count(&self) -> usize {
        self.scheduler.as_ref().map_or(1, TileScheduler::thread_count)
    }

    /// Render every camera of the scene in order.
    pub fn render_scene(&self, scene: &Scene) -> Vec<Frame> {
        scene
            .cameras
            .iter()
            .map(|camera| self.render_camera(scene, camera.as_ref()))
            .collect()
    }

    /// Render one camera view of `scene`.
    pub fn render_camera(&self, scene: &Scene, camera: &dyn Camera) -> Frame {
        let start = Instant::now();
        let (width, height) = camera.resolution();
        let tiles = generate_tiles(width, height, self.settings.tile_size);

        let results: Vec<TileResult> = match &self.scheduler {
            Some(scheduler) => {
                scheduler.run(tiles.len(), |i| render_tile(scene, camera, &tiles[i]))
            }
            None => tiles
                .iter()
                .map(|tile| render_tile(scene, camera, tile))
                .collect(),
        };

        let mut image = RgbImage::new(width, height);
        let mut times = vec![0u32; width as usize * height as usize];
        for result in &results {
            blit(result, &mut image, &mut times, width);
        }

        log::info!(
            "{} took {} ms",
            camera.image_name(),
            start.elapsed().as_millis()
        );

        Frame {
            image_name: camera.image_name().to_string(),
            image,
            times,
            width,
            height,
            tile_count: tiles.len(),
        }
    }
}

/// Copy a finished tile into the frame buffers.
fn blit(result: &TileResult, image: &mut RgbImage, times: &mut [u32], width: u32) {
    let tile = &result.tile;
    for local_y in 0..tile.height {
        for local_x in 0..tile.width {
            let local = (local_y * tile.width + local_x) as usize;
            let (x, y) = (tile.x + local_x, tile.y + local_y);
            image.put_pixel(x, y, Rgb(result.pixels[local]));
            times[(y * width + x) as usize] = result.times[local];
        }
    }
}
