//! Asset resolution and icon decoding.
//!
//! The viewport never touches the filesystem directly: assets are fetched by
//! name through an [`AssetResolver`], so hosts can serve them from disk, an
//! archive or memory.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use uavview_canvas::{rasterize_svg, ImageHandle};

use crate::error::{Result, ViewportError};

/// Built-in marker icon.
const UAV_SVG: &[u8] = include_bytes!("../assets/uav.svg");

/// Turns asset names into bytes.
pub trait AssetResolver {
    /// Load the raw bytes of `name`.
    ///
    /// Returns [`ViewportError::AssetNotFound`] when the asset does not exist.
    fn load(&self, name: &str) -> Result<Vec<u8>>;
}

/// Serves assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetResolver for DirectoryAssets {
    fn load(&self, name: &str) -> Result<Vec<u8>> {
        // Only plain relative names; no escaping the asset root
        let relative = Path::new(name);
        if name.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(ViewportError::AssetNotFound(name.to_string()));
        }

        let path = self.root.join(relative);
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::debug!("Loaded asset {} from {:?}", name, path);
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ViewportError::AssetNotFound(name.to_string()))
            }
            Err(e) => Err(ViewportError::Io(e)),
        }
    }
}

/// Serves assets from memory.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedAssets {
    entries: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// The assets compiled into the crate.
    pub fn builtin() -> Self {
        let mut assets = Self::new();
        assets.insert(crate::constants::DEFAULT_MARKER_ASSET, UAV_SVG);
        assets
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) {
        self.entries.insert(name.into(), bytes.into());
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl AssetResolver for EmbeddedAssets {
    fn load(&self, name: &str) -> Result<Vec<u8>> {
        self.entries
            .get(name)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| ViewportError::AssetNotFound(name.to_string()))
    }
}

/// Tries `primary` first and falls back when the asset is not found there.
///
/// Other errors from `primary` (unreadable file, permissions) are returned
/// as-is rather than masked by the fallback.
#[derive(Debug, Clone)]
pub struct FallbackAssets<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> FallbackAssets<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: AssetResolver, B: AssetResolver> AssetResolver for FallbackAssets<A, B> {
    fn load(&self, name: &str) -> Result<Vec<u8>> {
        match self.primary.load(name) {
            Err(ViewportError::AssetNotFound(_)) => self.fallback.load(name),
            other => other,
        }
    }
}

/// Default resolver: `dir` on disk, then the built-in assets.
pub fn default_resolver(dir: impl Into<PathBuf>) -> FallbackAssets<DirectoryAssets, EmbeddedAssets> {
    FallbackAssets::new(DirectoryAssets::new(dir), EmbeddedAssets::builtin())
}

/// Decode icon bytes and scale them to fit a `max_size` square.
///
/// SVG documents are rasterized at the target size; raster formats go
/// through the `image` crate and are then resampled.
pub fn decode_icon(name: &str, bytes: &[u8], max_size: u32) -> Result<ImageHandle> {
    let decode_error = |reason: String| ViewportError::AssetDecode {
        name: name.to_string(),
        reason,
    };

    if looks_like_svg(bytes) {
        return rasterize_svg(bytes, max_size, None).map_err(|e| decode_error(e.to_string()));
    }

    let img = image::load_from_memory(bytes).map_err(|e| decode_error(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let handle = ImageHandle::from_rgba8(rgba.into_raw(), width, height)
        .map_err(|e| decode_error(e.to_string()))?;
    handle
        .resized_to_fit(max_size, max_size)
        .map_err(|e| decode_error(e.to_string()))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg"))
}
