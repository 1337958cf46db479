//! Relief - terrain relief viewer
//!
//! Usage:
//!   relief view [ROOT] [--fullscreen]
//!   relief render [ROOT] --output out.png
//!   relief inspect [ROOT]

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use relief_viewer::config::CliOverrides;
use relief_viewer::logging::init_logging;
use relief_viewer::ViewerConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relief")]
#[command(about = "View elevation grids as a wireframe relief mesh", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./relief.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive viewer
    View {
        #[command(flatten)]
        terrain: TerrainArgs,

        /// Launch in fullscreen mode
        #[arg(long)]
        fullscreen: bool,
    },

    /// Render one frame to a PNG without a window
    Render {
        #[command(flatten)]
        terrain: TerrainArgs,

        /// Output image path
        #[arg(short, long, default_value = "relief.png")]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "720")]
        height: u32,
    },

    /// Print descriptor and elevation statistics
    Inspect {
        #[command(flatten)]
        terrain: TerrainArgs,
    },
}

#[derive(Args)]
struct TerrainArgs {
    /// Asset root: a directory or an http(s) base URL
    root: Option<String>,

    /// Descriptor path relative to the root
    #[arg(long)]
    descriptor: Option<String>,

    /// Vertex shader path relative to the root
    #[arg(long)]
    vertex_shader: Option<String>,

    /// Fragment shader path relative to the root
    #[arg(long)]
    fragment_shader: Option<String>,

    /// Vertical exaggeration passed to the shader
    #[arg(long)]
    exaggeration: Option<f32>,
}

impl TerrainArgs {
    fn into_overrides(self, fullscreen: bool) -> CliOverrides {
        CliOverrides {
            root: self.root,
            descriptor: self.descriptor,
            vertex_shader: self.vertex_shader,
            fragment_shader: self.fragment_shader,
            vertical_exaggeration: self.exaggeration,
            fullscreen,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::View {
            terrain,
            fullscreen,
        } => {
            let config = ViewerConfig::load(config_path, &terrain.into_overrides(fullscreen))?;
            commands::view::run(config)
        }
        Commands::Render {
            terrain,
            output,
            width,
            height,
        } => {
            let config = ViewerConfig::load(config_path, &terrain.into_overrides(false))?;
            commands::render::run(
                config,
                commands::render::RenderArgs {
                    output,
                    width,
                    height,
                },
            )
        }
        Commands::Inspect { terrain } => {
            let config = ViewerConfig::load(config_path, &terrain.into_overrides(false))?;
            commands::inspect::run(config)
        }
    }
}
