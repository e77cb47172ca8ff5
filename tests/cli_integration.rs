//! CLI integration tests for the `cubegrid` binary.
//!
//! Drives every subcommand end to end against temporary directories:
//! canvas creation, import, draw operations, previews, guides, and the
//! publish/gallery round trip.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

/// Run cubegrid in `dir` with the given arguments and return (stdout, stderr, exit code).
fn run_in(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cubegrid"))
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute cubegrid");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

/// Write a `size x size` white PNG with one black cell at (0, size - 1).
fn write_drawing(dir: &TempDir, name: &str, size: u32, cell_size: u32) -> PathBuf {
    let side = size * cell_size;
    let mut image = RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255]));
    for y in 0..cell_size {
        for x in (side - cell_size)..side {
            image.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    let path = dir.path().join(name);
    image.save(&path).unwrap();
    path
}

fn pixel(path: &Path, x: u32, y: u32) -> [u8; 4] {
    image::open(path).unwrap().to_rgba8().get_pixel(x, y).0
}

// ============================================================================
// new
// ============================================================================

#[test]
fn test_new_default_canvas() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_in(dir.path(), &["new"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("15x15"));

    let path = dir.path().join("drawing_15x15.png");
    let image = image::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (15, 15));
    assert_eq!(pixel(&path, 7, 7), [255, 255, 255, 255]);
}

#[test]
fn test_new_with_size_and_scale() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_in(
        dir.path(),
        &["new", "--width", "18", "--height", "21", "--scale", "4", "-o", "art/big.png"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    let image = image::open(dir.path().join("art/big.png")).unwrap();
    assert_eq!((image.width(), image.height()), (72, 84));
}

#[test]
fn test_new_with_cubes() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_in(dir.path(), &["new", "--cubes", "5", "7"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(dir.path().join("drawing_15x21.png").exists());
}

#[test]
fn test_new_rejects_invalid_size() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_in(dir.path(), &["new", "--width", "16"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(stderr.contains("multiple of 3"), "stderr: {}", stderr);
}

#[test]
fn test_new_uses_project_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("cubegrid.toml"),
        "[canvas]\ndefault_width = 21\ndefault_height = 24\n\n[export]\nscale = 2\n",
    )
    .unwrap();
    let (_, stderr, code) = run_in(dir.path(), &["new"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let image = image::open(dir.path().join("drawing_21x24.png")).unwrap();
    assert_eq!((image.width(), image.height()), (42, 48));
}

#[test]
fn test_invalid_config_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cubegrid.toml"), "[guide]\ntile_size = 0\n").unwrap();
    let (_, stderr, code) = run_in(dir.path(), &["new"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("guide.tile_size"), "stderr: {}", stderr);
}

// ============================================================================
// import
// ============================================================================

#[test]
fn test_import_resizes_to_canvas() {
    let dir = TempDir::new().unwrap();
    let photo = dir.path().join("photo.png");
    // left half near-red, right half near-blue
    let image = RgbaImage::from_fn(100, 80, |x, _| {
        if x < 50 { Rgba([230, 20, 30, 255]) } else { Rgba([10, 20, 220, 255]) }
    });
    image.save(&photo).unwrap();

    let (stdout, stderr, code) = run_in(dir.path(), &["import", "photo.png"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("photo_15x15.png"));

    let out = dir.path().join("photo_15x15.png");
    assert_eq!(pixel(&out, 0, 0), [255, 0, 0, 255]);
    assert_eq!(pixel(&out, 14, 14), [0, 0, 255, 255]);
}

#[test]
fn test_import_many_in_parallel() {
    let dir = TempDir::new().unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        write_drawing(&dir, name, 15, 1);
    }
    let out_dir = dir.path().join("out");
    let (stdout, stderr, code) = run_in(
        dir.path(),
        &["import", "a.png", "b.png", "c.png", "-o", out_dir.to_str().unwrap(), "--width", "21"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout.matches("Imported:").count(), 3);
    for stem in ["a", "b", "c"] {
        assert!(out_dir.join(format!("{}_21x15.png", stem)).exists());
    }
}

#[test]
fn test_import_rejects_clashing_outputs() {
    let dir = TempDir::new().unwrap();
    for sub in ["a", "b"] {
        std::fs::create_dir(dir.path().join(sub)).unwrap();
    }
    write_drawing(&dir, "a/cat.png", 15, 1);
    write_drawing(&dir, "b/cat.png", 15, 1);
    let (stdout, stderr, code) = run_in(dir.path(), &["import", "a/cat.png", "b/cat.png", "-o", "out"]);
    assert_eq!(code, 2);
    assert!(!stdout.contains("Imported:"));
    assert!(stderr.contains("same file"), "stderr: {}", stderr);
    assert!(!dir.path().join("out/cat_15x15.png").exists());
}

#[test]
fn test_import_native_keeps_size() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "exported.png", 18, 1);
    let (_, stderr, code) =
        run_in(dir.path(), &["import", "exported.png", "--native", "-o", "copy.png"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let copy = dir.path().join("copy.png");
    assert_eq!(image::open(&copy).unwrap().width(), 18);
    assert_eq!(pixel(&copy, 17, 0), [0, 0, 0, 255]);
}

#[test]
fn test_import_reports_failures() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "good.png", 15, 1);
    std::fs::write(dir.path().join("bad.png"), "not an image").unwrap();
    let (stdout, stderr, code) = run_in(dir.path(), &["import", "good.png", "bad.png"]);
    assert_eq!(code, 1);
    assert!(stdout.contains("good_15x15.png"));
    assert!(stderr.contains("bad.png"));
    assert!(stderr.contains("1 of 2 imports failed"));
}

// ============================================================================
// draw
// ============================================================================

#[test]
fn test_draw_brush_and_fill() {
    let dir = TempDir::new().unwrap();
    let input = write_drawing(&dir, "art.png", 15, 1);
    let (_, stderr, code) = run_in(
        dir.path(),
        &["draw", "art.png", "--op", "brush 7,7x3=Black", "--op", "fill 0,0=Yellow"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stderr.contains("Wrote:"));

    assert_eq!(pixel(&input, 7, 7), [0, 0, 0, 255]);
    assert_eq!(pixel(&input, 6, 8), [0, 0, 0, 255]);
    assert_eq!(pixel(&input, 0, 0), [255, 255, 0, 255]);
    assert_eq!(pixel(&input, 14, 0), [0, 0, 0, 255]);
}

#[test]
fn test_draw_with_cell_size_and_output() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "big.png", 15, 4);
    let (_, stderr, code) = run_in(
        dir.path(),
        &["draw", "big.png", "--cell-size", "4", "--op", "brush 14,0=Red", "-o", "edited.png"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    let edited = dir.path().join("edited.png");
    assert_eq!(image::open(&edited).unwrap().width(), 60);
    assert_eq!(pixel(&edited, 1, 58), [255, 0, 0, 255]);
    assert_eq!(pixel(&dir.path().join("big.png"), 1, 58), [255, 255, 255, 255]);
}

#[test]
fn test_draw_undo_redo() {
    let dir = TempDir::new().unwrap();
    let input = write_drawing(&dir, "art.png", 15, 1);
    let (_, stderr, code) = run_in(
        dir.path(),
        &["draw", "art.png", "--op", "brush 1,1=Red", "--op", "brush 2,2=Blue", "--op", "undo"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(pixel(&input, 1, 1), [255, 0, 0, 255]);
    assert_eq!(pixel(&input, 2, 2), [255, 255, 255, 255]);
}

#[test]
fn test_draw_dry_run_leaves_file() {
    let dir = TempDir::new().unwrap();
    let input = write_drawing(&dir, "art.png", 15, 1);
    let before = std::fs::read(&input).unwrap();
    let (stdout, _, code) =
        run_in(dir.path(), &["draw", "art.png", "--op", "fill 5,5=Green", "--dry-run"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("224 cells would change."), "stdout: {}", stdout);
    assert_eq!(std::fs::read(&input).unwrap(), before);
}

#[test]
fn test_draw_dry_run_no_changes() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "art.png", 15, 1);
    let (stdout, stderr, code) =
        run_in(dir.path(), &["draw", "art.png", "--op", "fill 5,5=White", "--dry-run"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No changes."));
    assert!(stderr.contains("Warning: fill at (5, 5) changed nothing"));
}

#[test]
fn test_draw_invalid_op() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "art.png", 15, 1);
    let (_, stderr, code) = run_in(dir.path(), &["draw", "art.png", "--op", "spray 1,1=Red"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("invalid draw op"));
}

#[test]
fn test_draw_out_of_bounds_fill() {
    let dir = TempDir::new().unwrap();
    let input = write_drawing(&dir, "art.png", 15, 1);
    let before = std::fs::read(&input).unwrap();
    let (_, stderr, code) =
        run_in(dir.path(), &["draw", "art.png", "--op", "brush 0,0=Red", "--op", "fill 20,3=Red"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"));
    assert_eq!(std::fs::read(&input).unwrap(), before);
}

#[test]
fn test_draw_missing_file() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_in(dir.path(), &["draw", "absent.png", "--op", "undo"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot load"));
}

// ============================================================================
// show / guide
// ============================================================================

#[test]
fn test_show_colors_and_coords() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "art.png", 15, 1);

    let (stdout, _, code) = run_in(dir.path(), &["show", "art.png"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\x1b[48;2;0;0;0m"));
    assert!(stdout.contains("Legend:"));
    assert!(stdout.contains("Black"));

    let (stdout, _, code) = run_in(dir.path(), &["show", "art.png", "--coords"]);
    assert_eq!(code, 0);
    assert!(!stdout.contains("\x1b["));
    assert!(stdout.contains(" 0 \u{2502}  0  0  0"));
}

#[test]
fn test_guide_text() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "art.png", 15, 1);
    let (stdout, _, code) = run_in(dir.path(), &["guide", "art.png"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Grid 15x15: 5x5 tiles of 3 cells, 4 sections"));
    assert!(stdout.contains("Section 4: columns D-E, rows 4-5"));
    assert!(stdout.contains("E5"));
}

#[test]
fn test_guide_json_to_file() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "art.png", 15, 1);
    let (_, stderr, code) = run_in(
        dir.path(),
        &["guide", "art.png", "--json", "--tile-size", "5", "--super-tile-size", "2", "-o", "guide.json"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);

    let text = std::fs::read_to_string(dir.path().join("guide.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["tile_size"], 5);
    assert_eq!(json["tile_columns"], 3);
    assert_eq!(json["super_tiles"].as_array().unwrap().len(), 4);
    assert_eq!(json["super_tiles"][0]["tiles"][1]["label"], "B1");
    let black = json["colors"].as_array().unwrap().iter().find(|c| c["name"] == "Black").unwrap();
    assert_eq!(black["count"], 1);
}

// ============================================================================
// palettes
// ============================================================================

#[test]
fn test_palettes_list_and_show() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_in(dir.path(), &["palettes", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("cube (default)"));
    assert!(stdout.contains("gameboy"));

    let (stdout, _, code) = run_in(dir.path(), &["palettes", "show", "cube"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Orange"));
    assert!(stdout.contains("#FFA500"));

    let (_, stderr, code) = run_in(dir.path(), &["palettes", "show", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown palette 'nope'"));
}

#[test]
fn test_global_palette_override() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_in(dir.path(), &["--palette", "1bit", "new", "-o", "mono.png"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    write_drawing(&dir, "art.png", 15, 1);
    let (_, stderr, code) = run_in(dir.path(), &["--palette", "missing", "show", "art.png"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("missing"), "stderr: {}", stderr);
}

// ============================================================================
// publish / gallery
// ============================================================================

#[test]
fn test_publish_and_gallery() {
    let dir = TempDir::new().unwrap();
    write_drawing(&dir, "art.png", 15, 1);

    let (stdout, stderr, code) = run_in(
        dir.path(),
        &["publish", "art.png", "--name", "Space Cat", "--description", "my first mosaic"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Published:"));

    let published: Vec<_> = std::fs::read_dir(dir.path().join("published"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    let png = published.iter().find(|n| n.ends_with(".png")).unwrap();
    assert!(png.starts_with("Space_Cat_"));
    assert!(png.ends_with("_15x15.png"));
    assert!(published.contains(&png.replace(".png", ".json")));

    let (stdout, _, code) = run_in(dir.path(), &["gallery"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Space Cat - my first mosaic"));

    let (stdout, _, code) = run_in(dir.path(), &["gallery", "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json[0]["name"], "Space Cat");
    assert_eq!(json[0]["file_name"], png.as_str());
}

#[test]
fn test_gallery_custom_dir_empty() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_in(dir.path(), &["gallery", "--dir", "elsewhere"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No published drawings"));
}
