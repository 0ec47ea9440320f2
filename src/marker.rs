//! Heading marker state and its icon cache.

use uavview_canvas::{ImageHandle, Point};

use crate::assets::{decode_icon, AssetResolver};
use crate::error::Result;

/// Orientation and canvas-space anchor of the heading marker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarkerState {
    /// Clockwise rotation in degrees, any range
    pub angle_deg: f32,
    /// Center of the icon in canvas coordinates
    pub position: Point,
}

impl MarkerState {
    pub fn new(angle_deg: f32, position: Point) -> Self {
        Self {
            angle_deg,
            position,
        }
    }

    /// Angle folded into `[0, 360)`.
    pub fn normalized_angle(&self) -> f32 {
        normalize_angle(self.angle_deg)
    }
}

pub fn normalize_angle(angle_deg: f32) -> f32 {
    let a = angle_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Decoded base icon for one (asset, size) pair.
struct BaseIcon {
    asset: String,
    size: u32,
    image: ImageHandle,
}

/// Caches the decoded marker icon and its most recent rotation.
///
/// The asset is decoded once per (name, size). The rotated raster is keyed by
/// the normalized angle and rebuilt only when the angle changes. A failed load
/// is remembered so a missing asset is reported once instead of on every
/// paint; [`MarkerIconCache::reload`] forgets it.
pub struct MarkerIconCache {
    resolver: Box<dyn AssetResolver>,
    base: Option<BaseIcon>,
    failed: Option<(String, u32)>,
    /// (normalized angle bits, rotated image)
    rotated: Option<(u32, ImageHandle)>,
    loads: usize,
}

impl MarkerIconCache {
    pub fn new(resolver: Box<dyn AssetResolver>) -> Self {
        Self {
            resolver,
            base: None,
            failed: None,
            rotated: None,
            loads: 0,
        }
    }

    /// Rotated icon, or `None` if the asset cannot be loaded.
    pub fn icon(&mut self, asset: &str, size: u32, angle_deg: f32) -> Option<ImageHandle> {
        if self.failed.as_ref().is_some_and(|(a, s)| a == asset && *s == size) {
            return None;
        }
        match self.try_icon(asset, size, angle_deg) {
            Ok(icon) => Some(icon),
            Err(e) => {
                log::warn!("Marker icon unavailable, skipping marker: {}", e);
                self.failed = Some((asset.to_string(), size));
                None
            }
        }
    }

    /// Rotated icon, propagating load and decode errors.
    pub fn try_icon(&mut self, asset: &str, size: u32, angle_deg: f32) -> Result<ImageHandle> {
        let base = self.base_icon(asset, size)?;
        let key = normalize_angle(angle_deg).to_bits();

        if let Some((cached_key, image)) = &self.rotated {
            if *cached_key == key {
                return Ok(image.clone());
            }
        }

        let rotated = base.rotated(f32::from_bits(key))?;
        log::trace!(
            "Rotated marker icon to {:.1} degrees ({}x{})",
            f32::from_bits(key),
            rotated.width(),
            rotated.height()
        );
        self.rotated = Some((key, rotated.clone()));
        Ok(rotated)
    }

    /// Forget cached images and past failures.
    pub fn reload(&mut self) {
        self.base = None;
        self.failed = None;
        self.rotated = None;
    }

    /// Number of times an asset was fetched and decoded.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    fn base_icon(&mut self, asset: &str, size: u32) -> Result<ImageHandle> {
        if let Some(base) = &self.base {
            if base.asset == asset && base.size == size {
                return Ok(base.image.clone());
            }
        }

        self.loads += 1;
        let bytes = self.resolver.load(asset)?;
        let image = decode_icon(asset, &bytes, size)?;
        log::debug!(
            "Loaded marker icon {} at {}x{}",
            asset,
            image.width(),
            image.height()
        );

        self.rotated = None;
        self.failed = None;
        self.base = Some(BaseIcon {
            asset: asset.to_string(),
            size,
            image: image.clone(),
        });
        Ok(image)
    }
}
