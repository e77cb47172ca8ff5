//! Palette listing (`cubegrid palettes`)

use clap::Subcommand;
use std::process::ExitCode;

use crate::palettes;
use crate::terminal::{color_to_ansi_bg, ANSI_RESET};

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Subcommand)]
pub enum PaletteAction {
    /// List all available built-in palettes
    List,
    /// Show details of a specific palette
    Show {
        /// Name of the palette to show
        name: String,
    },
}

/// Execute the palettes command
pub fn run_palettes(action: PaletteAction) -> ExitCode {
    match action {
        PaletteAction::List => {
            println!("Built-in palettes:");
            for name in palettes::list_builtins() {
                let marker = if name == palettes::DEFAULT_PALETTE { " (default)" } else { "" };
                println!("  {}{}", name, marker);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        PaletteAction::Show { name } => match palettes::get_builtin(&name) {
            Some(palette) => {
                println!("Palette: {}", palette.name());
                println!();
                for (id, color) in palette.iter() {
                    println!(
                        "  {:>3} {}  {} {:10} {}",
                        id.to_string(),
                        color_to_ansi_bg(color.rgb),
                        ANSI_RESET,
                        color.name,
                        color.hex()
                    );
                }
                ExitCode::from(EXIT_SUCCESS)
            }
            None => {
                eprintln!("Error: Unknown palette '{}'", name);
                eprintln!();
                eprintln!("Available palettes:");
                for builtin_name in palettes::list_builtins() {
                    eprintln!("  {}", builtin_name);
                }
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}
