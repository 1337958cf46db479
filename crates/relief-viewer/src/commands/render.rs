//! Headless terrain-to-PNG render command

use anyhow::{Context, Result};
use relief_render::{HeadlessContext, TerrainRenderer};
use relief_viewer::{initial_camera, terrain_loader, ViewerConfig};
use std::path::PathBuf;
use tracing::info;

pub struct RenderArgs {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

pub fn run(config: ViewerConfig, args: RenderArgs) -> Result<()> {
    let loaded = terrain_loader(&config.terrain)
        .load()
        .context("Failed to load terrain")?;

    let ctx = pollster::block_on(HeadlessContext::new(args.width, args.height))
        .context("Failed to create headless render context")?;

    let mut renderer = TerrainRenderer::new(ctx.format, config.window.background);
    renderer
        .set_terrain(&ctx.device, &loaded.mesh)
        .context("Failed to prepare terrain for the GPU")?;

    let camera = initial_camera(&config.camera, ctx.aspect_ratio());
    renderer.render(
        &ctx.device,
        &ctx.queue,
        &camera,
        &ctx.color_view,
        &ctx.depth_view,
    );

    let image = ctx.read_image().context("Failed to read back frame")?;
    image
        .save_with_format(&args.output, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        width = args.width,
        height = args.height,
        "snapshot written"
    );
    println!("Rendered {} ({}x{})", args.output.display(), args.width, args.height);
    Ok(())
}
