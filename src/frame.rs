//! Conversion of incoming frames into canvas images.
//!
//! Frames arrive either decoded (`image::DynamicImage`) or as raw packed
//! RGB888 bytes from a capture/decoder pipeline. Both end up as an
//! [`ImageHandle`] after validation.

use image::{DynamicImage, RgbImage};
use uavview_canvas::ImageHandle;

use crate::error::{Result, ViewportError};

/// Bytes per pixel of a raw frame.
pub const RAW_BYTES_PER_PIXEL: usize = 3;

/// Mirroring applied to a raw frame before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mirror {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Mirror {
    pub fn new(horizontal: bool, vertical: bool) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Borrowed packed RGB888 pixel rows.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// Bytes from the start of one row to the next; `width * 3` when `None`
    pub stride: Option<usize>,
    pub mirror: Mirror,
}

impl<'a> RawFrame<'a> {
    /// Tightly packed frame (stride = `width * 3`), no mirroring.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            stride: None,
            mirror: Mirror::default(),
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn mirrored(mut self, horizontal: bool, vertical: bool) -> Self {
        self.mirror = Mirror::new(horizontal, vertical);
        self
    }

    /// Validate dimensions against the buffer and return the effective stride.
    pub fn validate(&self) -> Result<usize> {
        if self.width == 0 || self.height == 0 {
            return Err(ViewportError::InvalidImageData(format!(
                "frame has empty dimensions {}x{}",
                self.width, self.height
            )));
        }

        let row_bytes = (self.width as usize)
            .checked_mul(RAW_BYTES_PER_PIXEL)
            .ok_or_else(|| ViewportError::InvalidImageData("frame width overflows".to_string()))?;
        let stride = self.stride.unwrap_or(row_bytes);
        if stride < row_bytes {
            return Err(ViewportError::InvalidImageData(format!(
                "stride {} is shorter than a row of {} bytes",
                stride, row_bytes
            )));
        }

        let required = stride
            .checked_mul(self.height as usize - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .ok_or_else(|| ViewportError::InvalidImageData("frame size overflows".to_string()))?;
        if self.data.len() < required {
            return Err(ViewportError::InvalidImageData(format!(
                "buffer holds {} bytes, {}x{} with stride {} needs {}",
                self.data.len(),
                self.width,
                self.height,
                stride,
                required
            )));
        }

        Ok(stride)
    }

    /// Pack, mirror and convert into a canvas image.
    pub fn to_image_handle(&self) -> Result<ImageHandle> {
        let stride = self.validate()?;
        let row_bytes = self.width as usize * RAW_BYTES_PER_PIXEL;

        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.data.chunks(stride).take(self.height as usize) {
            packed.extend_from_slice(&row[..row_bytes]);
        }

        let mut rgb = RgbImage::from_raw(self.width, self.height, packed).ok_or_else(|| {
            ViewportError::InvalidImageData("packed buffer does not match dimensions".to_string())
        })?;
        if self.mirror.horizontal {
            image::imageops::flip_horizontal_in_place(&mut rgb);
        }
        if self.mirror.vertical {
            image::imageops::flip_vertical_in_place(&mut rgb);
        }

        image_from_dynamic(&DynamicImage::ImageRgb8(rgb))
    }
}

/// Convert a decoded image of any pixel layout into a canvas image.
pub fn image_from_dynamic(image: &DynamicImage) -> Result<ImageHandle> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ViewportError::InvalidImageData(format!(
            "image has empty dimensions {}x{}",
            width, height
        )));
    }
    ImageHandle::from_rgba8(image.to_rgba8().into_raw(), width, height)
        .map_err(|e| ViewportError::InvalidImageData(e.to_string()))
}

/// Synthetic terrain-like frame with a 64 px grid, for demos without a
/// camera feed.
pub fn test_pattern(width: u32, height: u32) -> DynamicImage {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    let img = RgbImage::from_fn(width, height, |x, y| {
        if x % 64 == 0 || y % 64 == 0 {
            return image::Rgb([220, 220, 220]);
        }
        let fx = x as f32 / w;
        let fy = y as f32 / h;
        // Smooth hills from two crossed waves
        let hill = ((fx * 9.0).sin() * (fy * 7.0).cos() + 1.0) / 2.0;
        image::Rgb([
            (60.0 + 80.0 * fx) as u8,
            (90.0 + 120.0 * hill) as u8,
            (50.0 + 60.0 * fy) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}
