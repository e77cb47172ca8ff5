//! Gallery commands (`cubegrid publish`, `cubegrid gallery`)

use std::path::Path;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::GridConfig;
use crate::publish::{Artifact, Catalog, DirectoryCatalog};

use super::{open_drawing, EXIT_ERROR, EXIT_SUCCESS};

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Execute the publish command
pub fn run_publish(
    config: GridConfig,
    input: &Path,
    cell_size: u32,
    name: Option<&str>,
    description: Option<&str>,
) -> ExitCode {
    let catalog = DirectoryCatalog::new(config.publish.dir.clone());
    let session = match open_drawing(input, config, cell_size) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: cannot load '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let published = Artifact::prepare(session.grid(), session.palette(), name, description, now_millis())
        .and_then(|artifact| catalog.publish(&artifact));
    match published {
        Ok(path) => {
            println!("Published: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the gallery command
pub fn run_gallery(config: &GridConfig, json: bool) -> ExitCode {
    let catalog = DirectoryCatalog::new(config.publish.dir.clone());
    let entries = match catalog.list() {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&entries) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    if entries.is_empty() {
        println!("No published drawings in {}", catalog.dir().display());
        return ExitCode::from(EXIT_SUCCESS);
    }
    for entry in &entries {
        let title = entry.meta.name.as_deref().unwrap_or("(untitled)");
        match &entry.meta.description {
            Some(description) => println!("{}  {} - {}", entry.file_name, title, description),
            None => println!("{}  {}", entry.file_name, title),
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}
