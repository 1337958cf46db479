//! Print descriptor and elevation statistics without opening a window

use anyhow::{Context, Result};
use relief_terrain::TerrainStats;
use relief_viewer::{terrain_loader, ViewerConfig};

pub fn run(config: ViewerConfig) -> Result<()> {
    let loader = terrain_loader(&config.terrain);
    let (descriptor, samples) = loader.load_data().context("Failed to load terrain data")?;
    let stats = TerrainStats::compute(&descriptor, &samples);

    println!("Root:      {}", config.terrain.root);
    println!("Binary:    {}", descriptor.filename);
    println!(
        "Source:    {} x {} units",
        descriptor.width, descriptor.height
    );
    println!("{}", stats);
    Ok(())
}
