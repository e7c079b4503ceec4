//! glint command line renderer.
//!
//! Usage: `glint <scene.json> [output-dir]`
//!
//! Renders every camera in the scene and writes the image plus a
//! `<name>_time.png` heatmap of per-pixel render times. Thread count, tile
//! size and sequential mode can be overridden with `GLINT_THREADS`,
//! `GLINT_TILE_SIZE` and `GLINT_SEQUENTIAL`.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use glint_core::load_scene_description;
use glint_renderer::{BuildConfig, ExecutionMode, RenderSettings, Renderer, Scene};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "glint".into());
    let args: Vec<String> = args.collect();
    if args.is_empty() || args.len() > 2 {
        bail!("{}", usage(&program));
    }

    let scene_path = Path::new(&args[0]);
    let output_dir = args.get(1).map(PathBuf::from).unwrap_or_default();

    let description = load_scene_description(scene_path)
        .with_context(|| format!("Failed to load scene {}", scene_path.display()))?;

    let build_start = Instant::now();
    let scene = Scene::from_description(&description, &BuildConfig::default())
        .context("Failed to build scene")?;
    log::info!(
        "Built {} surfaces in {} ms",
        scene.surfaces.len(),
        build_start.elapsed().as_millis()
    );

    let settings = settings_from_env()?;
    let renderer = Renderer::new(settings).context("Failed to start renderer")?;
    log::info!(
        "Rendering with {} threads, {}px tiles",
        renderer.thread_count(),
        settings.tile_size
    );

    if !output_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    }

    for camera in &scene.cameras {
        let frame = renderer.render_camera(&scene, camera.as_ref());

        let image_path = output_dir.join(&frame.image_name);
        frame
            .image
            .save(&image_path)
            .with_context(|| format!("Failed to write {}", image_path.display()))?;

        let heatmap_path = output_dir.join(frame.heatmap_name());
        frame
            .heatmap()
            .save(&heatmap_path)
            .with_context(|| format!("Failed to write {}", heatmap_path.display()))?;

        log::info!(
            "Saved {} and {} ({} tiles)",
            image_path.display(),
            heatmap_path.display(),
            frame.tile_count
        );
    }

    Ok(())
}

fn usage(program: &str) -> String {
    format!("Usage: {} <scene.json> [output-dir]", program)
}

/// Render settings with environment overrides applied.
fn settings_from_env() -> Result<RenderSettings> {
    let mut settings = RenderSettings::default();

    if let Ok(threads) = env::var("GLINT_THREADS") {
        settings.threads = threads
            .parse()
            .with_context(|| format!("GLINT_THREADS is not a number: {}", threads))?;
    }
    if let Ok(tile_size) = env::var("GLINT_TILE_SIZE") {
        settings.tile_size = tile_size
            .parse()
            .with_context(|| format!("GLINT_TILE_SIZE is not a number: {}", tile_size))?;
    }
    if let Ok(sequential) = env::var("GLINT_SEQUENTIAL") {
        if !matches!(sequential.as_str(), "" | "0" | "false") {
            settings.mode = ExecutionMode::Sequential;
        }
    }

    Ok(settings)
}
