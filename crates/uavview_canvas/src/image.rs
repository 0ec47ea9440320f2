use std::sync::Arc;

use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint};

use crate::error::{CanvasError, Result};
use crate::geometry::Size;

/// A handle to an immutable RGBA8 bitmap.
///
/// Pixels are stored premultiplied, the layout tiny-skia draws from, so a
/// handle can be blitted without conversion. Cloning is cheap: the pixel
/// buffer is shared.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    /// Premultiplied RGBA8 pixel data
    data: Arc<Vec<u8>>,
    width: u32,
    height: u32,
}

impl ImageHandle {
    /// Create a handle from straight-alpha RGBA8 data (4 bytes per pixel).
    pub fn from_rgba8(mut data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        check_layout(data.len(), width, height)?;
        premultiply(&mut data);
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Create a handle from data that is already premultiplied.
    pub fn from_premultiplied(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        check_layout(data.len(), width, height)?;
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        let width = pixmap.width();
        let height = pixmap.height();
        Self {
            data: Arc::new(pixmap.take()),
            width,
            height,
        }
    }

    /// Premultiplied pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    /// Identity of the shared pixel buffer, stable across clones.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.data) as usize
    }

    /// Premultiplied RGBA of a single pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut data = self.data.to_vec();
        demultiply(&mut data);
        data
    }

    pub fn to_pixmap(&self) -> Result<Pixmap> {
        let size = IntSize::from_wh(self.width, self.height).ok_or(CanvasError::InvalidDimensions {
            width: self.width,
            height: self.height,
        })?;
        Pixmap::from_vec(self.data.to_vec(), size).ok_or(CanvasError::PixmapAllocation {
            width: self.width,
            height: self.height,
        })
    }

    /// Rotate clockwise by `angle_deg` about the image center.
    ///
    /// The result is sized to the rotated bounding box, so it grows for
    /// angles that are not multiples of 90 degrees. Angles are normalized to
    /// `[0, 360)` first, which makes `θ` and `θ + 360` produce identical pixels.
    pub fn rotated(&self, angle_deg: f32) -> Result<ImageHandle> {
        let angle = angle_deg.rem_euclid(360.0);
        let (sin, cos) = angle.to_radians().sin_cos();
        let w = self.width as f32;
        let h = self.height as f32;

        let new_w = snap_ceil(w * cos.abs() + h * sin.abs()).max(1.0);
        let new_h = snap_ceil(w * sin.abs() + h * cos.abs()).max(1.0);

        let mut target = new_pixmap(new_w as u32, new_h as u32)?;
        let source = self.to_pixmap()?;

        // Rotate about the source center, then move it to the target center.
        let tx = new_w / 2.0 - (cos * w / 2.0 - sin * h / 2.0);
        let ty = new_h / 2.0 - (sin * w / 2.0 + cos * h / 2.0);
        let transform = tiny_skia::Transform::from_row(cos, sin, -sin, cos, tx, ty);

        target.draw_pixmap(0, 0, source.as_ref(), &smooth_paint(), transform, None);
        Ok(ImageHandle::from_pixmap(target))
    }

    /// Scale to fit inside `max_width` x `max_height`, keeping the aspect ratio.
    pub fn resized_to_fit(&self, max_width: u32, max_height: u32) -> Result<ImageHandle> {
        if max_width == 0 || max_height == 0 {
            return Err(CanvasError::InvalidDimensions {
                width: max_width,
                height: max_height,
            });
        }

        let scale = (max_width as f32 / self.width as f32).min(max_height as f32 / self.height as f32);
        let new_w = ((self.width as f32 * scale).round() as u32).max(1);
        let new_h = ((self.height as f32 * scale).round() as u32).max(1);
        if new_w == self.width && new_h == self.height {
            return Ok(self.clone());
        }

        let mut target = new_pixmap(new_w, new_h)?;
        let source = self.to_pixmap()?;
        let transform = tiny_skia::Transform::from_scale(
            new_w as f32 / self.width as f32,
            new_h as f32 / self.height as f32,
        );
        target.draw_pixmap(0, 0, source.as_ref(), &smooth_paint(), transform, None);
        Ok(ImageHandle::from_pixmap(target))
    }
}

fn check_layout(len: usize, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(CanvasError::InvalidDimensions { width, height })?;
    if len != expected {
        return Err(CanvasError::SizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

fn new_pixmap(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height).ok_or(CanvasError::PixmapAllocation { width, height })
}

fn smooth_paint() -> PixmapPaint {
    PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    }
}

/// `ceil` that ignores float noise below a thousandth of a pixel.
fn snap_ceil(v: f32) -> f32 {
    ((v * 1000.0).round() / 1000.0).ceil()
}

/// Premultiply straight RGBA8 in place.
pub fn premultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

/// Undo [`premultiply`] in place.
pub fn demultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 || a == 0 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
