//! Image import (`cubegrid import`)
//!
//! Each input is decoded, quantized onto the palette, and saved as its own
//! drawing. Inputs are independent, so they are processed in parallel.

use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::GridConfig;
use crate::output::save_grid;
use crate::session::Session;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Where an imported drawing is written.
///
/// A single input with a `.png` output path is written there; otherwise the
/// output (or the input's directory) is a directory and files are named
/// `{stem}_{width}x{height}.png`.
fn output_path(
    input: &Path,
    output: Option<&Path>,
    single: bool,
    width: usize,
    height: usize,
) -> PathBuf {
    if let Some(out) = output {
        let is_png = out.extension().is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if single && is_png {
            return out.to_path_buf();
        }
    }
    let dir = match output {
        Some(out) => out.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    dir.join(format!("{}_{}x{}.png", stem, width, height))
}

/// First pair of inputs that would be written to the same file.
///
/// Output names only depend on the input stem and the grid size, so inputs
/// like `cat.jpg` and `cat.png` in one directory collide whatever their size.
fn find_collision<'a>(
    inputs: &'a [PathBuf],
    output: Option<&Path>,
    single: bool,
) -> Option<(&'a Path, &'a Path)> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    for input in inputs.iter().map(PathBuf::as_path) {
        let key = output_path(input, output, single, 0, 0);
        if let Some(first) = seen.insert(key, input) {
            return Some((first, input));
        }
    }
    None
}

fn import_one(
    config: &GridConfig,
    input: &Path,
    output: Option<&Path>,
    single: bool,
    size: Option<(usize, usize)>,
    native: bool,
) -> Result<PathBuf, String> {
    let image = image::open(input).map_err(|e| format!("{}: {}", input.display(), e))?;

    let imported = if native {
        Session::with_defaults(config.clone())
            .and_then(|mut session| session.import_image(&image).map(|_| session))
    } else {
        let (width, height) =
            size.unwrap_or((config.canvas.default_width, config.canvas.default_height));
        Session::new(config.clone(), width, height)
            .and_then(|mut session| session.import_resized(&image).map(|_| session))
    };
    let session = imported.map_err(|e| format!("{}: {}", input.display(), e))?;

    let grid = session.grid();
    let target = output_path(input, output, single, grid.width(), grid.height());
    save_grid(grid, session.palette(), config.export.scale, &target)
        .map_err(|e| format!("{}: {}", target.display(), e))?;
    Ok(target)
}

/// Execute the import command
pub fn run_import(
    config: &GridConfig,
    inputs: &[PathBuf],
    output: Option<&Path>,
    width: Option<usize>,
    height: Option<usize>,
    native: bool,
) -> ExitCode {
    let size = match (width, height) {
        (None, None) => None,
        (w, h) => Some((
            w.unwrap_or(config.canvas.default_width),
            h.unwrap_or(config.canvas.default_height),
        )),
    };
    let single = inputs.len() == 1;
    if let Some((first, second)) = find_collision(inputs, output, single) {
        eprintln!(
            "Error: '{}' and '{}' would be written to the same file",
            first.display(),
            second.display()
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let results: Vec<Result<PathBuf, String>> = inputs
        .par_iter()
        .map(|input| import_one(config, input, output, single, size, native))
        .collect();

    let mut failed = 0;
    for result in results {
        match result {
            Ok(path) => println!("Imported: {}", path.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{} of {} imports failed", failed, inputs.len());
        return ExitCode::from(EXIT_ERROR);
    }
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_single_png() {
        let path = output_path(Path::new("in/cat.jpg"), Some(Path::new("out/cat.png")), true, 15, 15);
        assert_eq!(path, PathBuf::from("out/cat.png"));
    }

    #[test]
    fn test_output_path_directory() {
        let path = output_path(Path::new("in/cat.jpg"), Some(Path::new("out")), true, 15, 18);
        assert_eq!(path, PathBuf::from("out/cat_15x18.png"));

        let path = output_path(Path::new("in/cat.jpg"), Some(Path::new("out/x.png")), false, 15, 18);
        assert_eq!(path, PathBuf::from("out/x.png/cat_15x18.png"));
    }

    #[test]
    fn test_find_collision_same_stem() {
        let inputs = vec![PathBuf::from("a/cat.jpg"), PathBuf::from("a/dog.png"), PathBuf::from("a/cat.png")];
        assert_eq!(
            find_collision(&inputs, None, false),
            Some((Path::new("a/cat.jpg"), Path::new("a/cat.png")))
        );
        // one shared output directory collides across input directories too
        let inputs = vec![PathBuf::from("a/cat.jpg"), PathBuf::from("b/cat.jpg")];
        assert!(find_collision(&inputs, Some(Path::new("out")), false).is_some());
        assert!(find_collision(&inputs, None, false).is_none());
    }

    #[test]
    fn test_output_path_next_to_input() {
        let path = output_path(Path::new("in/dog.png"), None, false, 21, 21);
        assert_eq!(path, PathBuf::from("in/dog_21x21.png"));
    }
}
