//! Media-source resolution strategies.
//!
//! The locator format decides how a track is loaded: a `.m3u8` manifest goes
//! through the adaptive-streaming loader, anything else is a progressive file
//! assigned directly. The loader is capability-injected and selected once at
//! startup, so the controller only ever asks `supports_adaptive_streaming()`
//! and `load()`.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const ADAPTIVE_MANIFEST_EXT: &str = "m3u8";

/// Nested variant playlists are followed at most this deep.
const MAX_MANIFEST_DEPTH: u8 = 2;

/// Does this locator name an adaptive-streaming manifest?
pub fn is_adaptive_manifest(source: &Path) -> bool {
    source
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(ADAPTIVE_MANIFEST_EXT))
        .unwrap_or(false)
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("could not read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest {path} lists no playable segments")]
    EmptyManifest { path: PathBuf },
}

/// The media files to feed the backend, in playback order. Progressive
/// sources resolve to a single file; adaptive manifests to their segments.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSource {
    pub files: Vec<PathBuf>,
}

impl ResolvedSource {
    pub fn single(path: &Path) -> Self {
        Self {
            files: vec![path.to_path_buf()],
        }
    }
}

pub trait MediaLoader {
    fn supports_adaptive_streaming(&self) -> bool;
    fn load(&self, source: &Path) -> Result<ResolvedSource, MediaError>;
}

/// Loader for segmented `.m3u8` manifests.
///
/// Fatal-error handling mirrors the recovery ladder of streaming clients:
/// a failed manifest read (network class) is retried once before giving up;
/// undecodable segments (media class) are skipped by the backend in place;
/// an empty or unusable manifest tears the load down with an error.
pub struct HlsManifestLoader;

impl MediaLoader for HlsManifestLoader {
    fn supports_adaptive_streaming(&self) -> bool {
        true
    }

    fn load(&self, source: &Path) -> Result<ResolvedSource, MediaError> {
        if !is_adaptive_manifest(source) {
            return Ok(ResolvedSource::single(source));
        }
        let files = read_manifest(source, MAX_MANIFEST_DEPTH)?;
        if files.is_empty() {
            return Err(MediaError::EmptyManifest {
                path: source.to_path_buf(),
            });
        }
        Ok(ResolvedSource { files })
    }
}

/// Fallback loader: every locator is treated as a progressive file.
pub struct ProgressiveLoader;

impl MediaLoader for ProgressiveLoader {
    fn supports_adaptive_streaming(&self) -> bool {
        false
    }

    fn load(&self, source: &Path) -> Result<ResolvedSource, MediaError> {
        Ok(ResolvedSource::single(source))
    }
}

/// Pick the loader for this process. The manifest loader has no external
/// requirements here, so it is always available; the progressive fallback
/// stays behind the same trait for environments without it.
pub fn select_media_loader() -> Box<dyn MediaLoader> {
    Box::new(HlsManifestLoader)
}

fn read_manifest(path: &Path, depth: u8) -> Result<Vec<PathBuf>, MediaError> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(first) => {
            // Network-class failure: restart the load once.
            tracing::warn!(path = %path.display(), error = %first, "manifest read failed, retrying");
            std::fs::read_to_string(path).map_err(|source| MediaError::ManifestRead {
                path: path.to_path_buf(),
                source,
            })?
        }
    };

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let mut files = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let entry = base.join(line);
        if is_adaptive_manifest(&entry) {
            if depth == 0 {
                tracing::warn!(path = %entry.display(), "manifest nesting too deep, skipping");
                continue;
            }
            // Variant playlist: take the first one that resolves.
            match read_manifest(&entry, depth - 1) {
                Ok(nested) if !nested.is_empty() => return Ok(nested),
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "variant playlist unusable, trying next");
                    continue;
                }
            }
        }
        files.push(entry);
    }
    Ok(files)
}
