//! Publishing drawings to a gallery catalog.
//!
//! A published drawing is a PNG plus a small metadata record. Storage is
//! behind the [`Catalog`] trait; [`DirectoryCatalog`] keeps each drawing as
//! `<stem>.png` next to a `<stem>.json` sidecar holding its metadata.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::grid::Grid;
use crate::output::{encode_png, render_grid, OutputError};
use crate::palette::Palette;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("failed to write metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("invalid catalog pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("'{0}' is already published")]
    AlreadyExists(String),
}

/// Name and description shown in the gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A drawing ready to hand to a catalog.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub png: Vec<u8>,
    pub meta: ArtifactMeta,
}

/// One catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedEntry {
    pub file_name: String,
    #[serde(flatten)]
    pub meta: ArtifactMeta,
}

/// Keep `[A-Za-z0-9_-]`, turning everything else into `_`.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Published file name: `{name}_{timestamp}_{width}x{height}.png`, with
/// `drawing` standing in for a blank name.
pub fn published_file_name(name: Option<&str>, timestamp: u64, width: usize, height: usize) -> String {
    let stem = name.map(sanitize_name).filter(|s| !s.is_empty());
    format!("{}_{}_{}x{}.png", stem.as_deref().unwrap_or("drawing"), timestamp, width, height)
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

impl Artifact {
    /// Encode `grid` and attach its metadata. `timestamp` is milliseconds
    /// since the Unix epoch and keeps repeated publishes apart.
    pub fn prepare(
        grid: &Grid,
        palette: &Palette,
        name: Option<&str>,
        description: Option<&str>,
        timestamp: u64,
    ) -> Result<Self, PublishError> {
        let png = encode_png(&render_grid(grid, palette)?)?;
        Ok(Artifact {
            file_name: published_file_name(name, timestamp, grid.width(), grid.height()),
            png,
            meta: ArtifactMeta { name: non_blank(name), description: non_blank(description) },
        })
    }
}

/// Storage for published drawings.
pub trait Catalog {
    /// Store an artifact; returns where it was stored.
    fn publish(&self, artifact: &Artifact) -> Result<PathBuf, PublishError>;

    /// Everything published so far, sorted by file name.
    fn list(&self) -> Result<Vec<PublishedEntry>, PublishError>;
}

/// Catalog kept as PNG files and JSON sidecars in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_meta(png_path: &Path) -> ArtifactMeta {
        let sidecar = png_path.with_extension("json");
        match fs::read_to_string(&sidecar) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable metadata {}: {}", sidecar.display(), e);
                ArtifactMeta::default()
            }),
            Err(_) => ArtifactMeta::default(),
        }
    }
}

impl Catalog for DirectoryCatalog {
    fn publish(&self, artifact: &Artifact) -> Result<PathBuf, PublishError> {
        fs::create_dir_all(&self.dir)?;
        let png_path = self.dir.join(&artifact.file_name);
        if png_path.exists() {
            return Err(PublishError::AlreadyExists(artifact.file_name.clone()));
        }

        let meta = serde_json::to_string(&artifact.meta)?;
        fs::write(&png_path, &artifact.png)?;
        if let Err(e) = fs::write(png_path.with_extension("json"), meta) {
            // a PNG without its sidecar must not stay behind
            let _ = fs::remove_file(&png_path);
            return Err(e.into());
        }
        log::info!("published {}", png_path.display());
        Ok(png_path)
    }

    fn list(&self) -> Result<Vec<PublishedEntry>, PublishError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = self.dir.join("*.png");
        let mut entries: Vec<PublishedEntry> = glob::glob(&pattern.to_string_lossy())?
            .filter_map(Result::ok)
            .filter_map(|path| {
                let file_name = path.file_name()?.to_string_lossy().into_owned();
                Some(PublishedEntry { file_name, meta: Self::read_meta(&path) })
            })
            .collect();
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }
}
