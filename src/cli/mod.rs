//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod draw;
mod guide;
mod import;
mod info;
mod new;
mod publish;
mod show;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, GridConfig};
use crate::draw::{DrawError, DrawPipeline};
use crate::session::Session;

pub use info::PaletteAction;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// cubegrid - Draw 8-bit pixel grids and plan cube mosaics
#[derive(Parser)]
#[command(name = "cubegrid")]
#[command(about = "cubegrid - Draw 8-bit pixel grids and turn them into cube mosaic assembly guides")]
#[command(version)]
pub struct Cli {
    /// Config file (default: search for cubegrid.toml upward, then in $XDG_CONFIG_HOME)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Built-in palette to use instead of the configured one
    #[arg(long, global = true)]
    pub palette: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a blank canvas and save it as PNG
    New {
        /// Output PNG (default: drawing_{width}x{height}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Canvas width in cells
        #[arg(long)]
        width: Option<usize>,

        /// Canvas height in cells
        #[arg(long)]
        height: Option<usize>,

        /// Size the canvas in whole cubes instead: --cubes WIDE HIGH
        #[arg(long, num_args = 2, value_names = ["WIDE", "HIGH"], conflicts_with_all = ["width", "height"])]
        cubes: Option<Vec<usize>>,

        /// Pixels per cell in the saved PNG
        #[arg(long)]
        scale: Option<u32>,
    },

    /// Convert images into palette grids
    Import {
        /// Images to convert (processed in parallel)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output PNG for a single input, or output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target width in cells
        #[arg(long)]
        width: Option<usize>,

        /// Target height in cells
        #[arg(long)]
        height: Option<usize>,

        /// Keep the image's own size, one pixel per cell
        #[arg(long, conflicts_with_all = ["width", "height"])]
        native: bool,

        /// Pixels per cell in the saved PNG
        #[arg(long)]
        scale: Option<u32>,
    },

    /// Apply brush and fill operations to a drawing
    Draw {
        /// Drawing to modify (PNG)
        input: PathBuf,

        /// Operation: "brush R,C[xN]=COLOR", "fill R,C=COLOR", "undo" or "redo"
        #[arg(long = "op", value_name = "OP", required = true)]
        ops: Vec<String>,

        /// Output file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixels per cell in the input image
        #[arg(long, default_value_t = 1)]
        cell_size: u32,

        /// Pixels per cell in the written PNG (default: same as --cell-size)
        #[arg(long)]
        scale: Option<u32>,

        /// Preview the result without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Preview a drawing in the terminal
    Show {
        /// Drawing to show (PNG)
        input: PathBuf,

        /// Pixels per cell in the input image
        #[arg(long, default_value_t = 1)]
        cell_size: u32,

        /// Print palette indexes with row/column numbers instead of colors
        #[arg(long)]
        coords: bool,
    },

    /// Build the cube assembly guide for a drawing
    Guide {
        /// Drawing to decompose (PNG)
        input: PathBuf,

        /// Pixels per cell in the input image
        #[arg(long, default_value_t = 1)]
        cell_size: u32,

        /// Cells per tile side
        #[arg(long)]
        tile_size: Option<usize>,

        /// Tiles per section side
        #[arg(long)]
        super_tile_size: Option<usize>,

        /// Emit the guide as JSON for a document renderer
        #[arg(long)]
        json: bool,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List and inspect built-in palettes
    Palettes {
        #[command(subcommand)]
        action: PaletteAction,
    },

    /// Publish a drawing to the gallery
    Publish {
        /// Drawing to publish (PNG)
        input: PathBuf,

        /// Pixels per cell in the input image
        #[arg(long, default_value_t = 1)]
        cell_size: u32,

        /// Title shown in the gallery
        #[arg(long)]
        name: Option<String>,

        /// Description shown in the gallery
        #[arg(long)]
        description: Option<String>,

        /// Gallery directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// List published drawings
    Gallery {
        /// Gallery directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Config values this command overrides from its flags.
    fn overrides(&self, palette: Option<String>) -> CliOverrides {
        let mut overrides = CliOverrides { palette, ..Default::default() };
        match self {
            Commands::New { scale, .. } | Commands::Import { scale, .. } => {
                overrides.scale = *scale;
            }
            Commands::Guide { tile_size, super_tile_size, .. } => {
                overrides.tile_size = *tile_size;
                overrides.super_tile_size = *super_tile_size;
            }
            Commands::Publish { dir, .. } | Commands::Gallery { dir, .. } => {
                overrides.publish_dir = dir.clone();
            }
            _ => {}
        }
        overrides
    }
}

/// Load the config file and apply command-line overrides.
fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<GridConfig, ExitCode> {
    let mut config = load_config(path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    merge_cli_overrides(&mut config, overrides).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    Ok(config)
}

/// Open a drawing exported at `cell_size` pixels per cell.
pub(crate) fn open_drawing(
    input: &Path,
    config: GridConfig,
    cell_size: u32,
) -> Result<Session, DrawError> {
    DrawPipeline::load(input, config, cell_size).map(DrawPipeline::into_session)
}

pub fn run() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let overrides = cli.command.overrides(cli.palette);
    let config = match resolve_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match cli.command {
        Commands::New { output, width, height, cubes, scale: _ } => {
            new::run_new(config, output.as_deref(), width, height, cubes.as_deref())
        }
        Commands::Import { inputs, output, width, height, native, scale: _ } => {
            import::run_import(&config, &inputs, output.as_deref(), width, height, native)
        }
        Commands::Draw { input, ops, output, cell_size, scale, dry_run } => draw::run_draw(
            config,
            &input,
            &ops,
            output.as_deref(),
            cell_size,
            scale,
            dry_run,
        ),
        Commands::Show { input, cell_size, coords } => {
            show::run_show(config, &input, cell_size, coords)
        }
        Commands::Guide { input, cell_size, json, output, .. } => {
            guide::run_guide(config, &input, cell_size, json, output.as_deref())
        }
        Commands::Palettes { action } => info::run_palettes(action),
        Commands::Publish { input, cell_size, name, description, dir: _ } => publish::run_publish(
            config,
            &input,
            cell_size,
            name.as_deref(),
            description.as_deref(),
        ),
        Commands::Gallery { dir: _, json } => publish::run_gallery(&config, json),
    }
}
