//! Software painter backed by a tiny-skia pixmap.

use std::collections::HashMap;
use std::path::Path;

use tiny_skia::{FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke};

use crate::color::Color;
use crate::error::{CanvasError, Result};
use crate::geometry::{Point, Rect, Size, Transform};
use crate::image::ImageHandle;
use crate::painter::Painter;
use crate::text::{blend_pixel, TextRasterizer};

/// Number of converted source images kept between frames.
const IMAGE_CACHE_LIMIT: usize = 8;

/// Cubic control point distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// A [`Painter`] rasterizing into an in-memory RGBA pixmap.
pub struct SkiaPainter {
    pixmap: Pixmap,
    transform: Transform,
    text: TextRasterizer,
    /// Converted pixmaps keyed by [`ImageHandle::id`]. The handle is kept so
    /// its buffer address cannot be reused while cached.
    image_cache: HashMap<usize, (ImageHandle, Pixmap)>,
}

impl SkiaPainter {
    /// Create a painter using the first system font found for text.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_text(width, height, TextRasterizer::from_system())
    }

    pub fn with_text(width: u32, height: u32, text: TextRasterizer) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(CanvasError::PixmapAllocation { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::IDENTITY,
            text,
            image_cache: HashMap::new(),
        })
    }

    /// Snapshot of the current target contents.
    pub fn to_image(&self) -> ImageHandle {
        ImageHandle::from_pixmap(self.pixmap.clone())
    }

    /// Current target contents as straight (non-premultiplied) RGBA8.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.to_image().to_straight_rgba8()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.pixmap
            .save_png(path)
            .map_err(|e| CanvasError::Png(e.to_string()))
    }

    fn paint_for(color: Color) -> Paint<'static> {
        let [r, g, b, a] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }
}

impl Painter for SkiaPainter {
    fn size(&self) -> Size {
        Size::new(self.pixmap.width() as f32, self.pixmap.height() as f32)
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    fn draw_image(&mut self, image: &ImageHandle, origin: Point) {
        let id = image.id();
        if !self.image_cache.contains_key(&id) {
            let source = match image.to_pixmap() {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("Skipping image draw: {}", e);
                    return;
                }
            };
            if self.image_cache.len() >= IMAGE_CACHE_LIMIT {
                self.image_cache.clear();
            }
            self.image_cache.insert(id, (image.clone(), source));
        }
        let Some((_, source)) = self.image_cache.get(&id) else {
            return;
        };

        let t = self.transform;
        let quality = if t.scale >= 1.0 {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let paint = PixmapPaint {
            quality,
            ..PixmapPaint::default()
        };
        let placed = tiny_skia::Transform::from_row(
            t.scale,
            0.0,
            0.0,
            t.scale,
            t.dx + origin.x * t.scale,
            t.dy + origin.y * t.scale,
        );
        self.pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, placed, None);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        let Some(path) = rounded_rect_path(rect, radius) else {
            return;
        };
        let paint = Self::paint_for(color);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, self.transform.to_skia(), None);
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, width: f32) {
        let Some(path) = rounded_rect_path(rect, radius) else {
            return;
        };
        let paint = Self::paint_for(color);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, self.transform.to_skia(), None);
    }

    fn draw_text(&mut self, text: &str, origin: Point, size: f32, color: Color) {
        let device = self.transform.map_point(origin);
        let device_size = size * self.transform.scale;
        let width = self.pixmap.width() as i32;
        let height = self.pixmap.height() as i32;
        let data = self.pixmap.data_mut();

        self.text.rasterize(text, device.x, device.y, device_size, |px| {
            if px.x < 0 || px.y < 0 || px.x >= width || px.y >= height {
                return;
            }
            let idx = ((px.y * width + px.x) * 4) as usize;
            blend_pixel(&mut data[idx..idx + 4], color, px.coverage);
        });
    }
}

/// Closed rounded-rectangle path; `None` for empty rectangles.
fn rounded_rect_path(rect: Rect, radius: f32) -> Option<tiny_skia::Path> {
    if rect.is_empty() {
        return None;
    }
    let r = radius.max(0.0).min(rect.width / 2.0).min(rect.height / 2.0);
    if r <= 0.0 {
        let sk_rect = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)?;
        return Some(PathBuilder::from_rect(sk_rect));
    }

    let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}
