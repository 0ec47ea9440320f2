//! Glyph rasterization for the software painter.
//!
//! Fonts are looked up at a handful of well-known system locations. When none
//! is found text drawing becomes a no-op and a warning is logged once.

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};

use crate::color::Color;
use crate::error::{CanvasError, Result};

/// Font files tried in order by [`TextRasterizer::from_system`].
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/Carlito-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A single covered pixel produced while rasterizing text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPixel {
    pub x: i32,
    pub y: i32,
    /// Coverage in 0.0..=1.0
    pub coverage: f32,
}

/// Lays out and rasterizes text with an optional font.
pub struct TextRasterizer {
    font: Option<FontArc>,
    warned: bool,
}

impl TextRasterizer {
    /// Rasterizer without a font: every draw is skipped.
    pub fn none() -> Self {
        Self {
            font: None,
            warned: false,
        }
    }

    pub fn from_font_data(data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(data).map_err(|e| CanvasError::Font(e.to_string()))?;
        Ok(Self {
            font: Some(font),
            warned: false,
        })
    }

    /// Load the first readable font from the usual system locations.
    pub fn from_system() -> Self {
        for path in SYSTEM_FONT_PATHS {
            let Ok(data) = std::fs::read(path) else {
                continue;
            };
            match Self::from_font_data(data) {
                Ok(rasterizer) => {
                    log::debug!("Loaded font from {}", path);
                    return rasterizer;
                }
                Err(e) => log::warn!("Failed to parse font {}: {}", path, e),
            }
        }
        Self::none()
    }

    /// Vertical distance between consecutive baselines at `size` pixels.
    pub fn line_height(&self, size: f32) -> f32 {
        match &self.font {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                scaled.height() + scaled.line_gap()
            }
            None => size * 1.2,
        }
    }

    /// Rasterize `text` with its top-left corner at (`x`, `y`).
    ///
    /// Newlines start a new line. `emit` receives every pixel with non-zero
    /// coverage in target coordinates.
    pub fn rasterize(&mut self, text: &str, x: f32, y: f32, size: f32, mut emit: impl FnMut(GlyphPixel)) {
        let Some(font) = &self.font else {
            if !self.warned {
                log::warn!("No font available, skipping text rendering");
                self.warned = true;
            }
            return;
        };

        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);
        let line_height = scaled.height() + scaled.line_gap();

        for (line_index, line) in text.lines().enumerate() {
            let baseline = y + scaled.ascent() + line_index as f32 * line_height;
            let mut caret = x;
            let mut previous = None;

            for ch in line.chars() {
                let id = scaled.glyph_id(ch);
                if let Some(prev) = previous {
                    caret += scaled.kern(prev, id);
                }
                let glyph = id.with_scale_and_position(scale, point(caret, baseline));
                caret += scaled.h_advance(id);
                previous = Some(id);

                let Some(outlined) = font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    if coverage > 0.0 {
                        emit(GlyphPixel {
                            x: bounds.min.x as i32 + gx as i32,
                            y: bounds.min.y as i32 + gy as i32,
                            coverage: coverage.min(1.0),
                        });
                    }
                });
            }
        }
    }
}

/// Blend a straight-alpha color with `coverage` over a premultiplied pixel.
pub fn blend_pixel(dst: &mut [u8], color: Color, coverage: f32) {
    let [r, g, b, a] = color.to_rgba8();
    let src_a = f32::from(a) / 255.0 * coverage;
    if src_a <= 0.0 {
        return;
    }
    let inv = 1.0 - src_a;
    let channel = |src: u8, dst: u8| (f32::from(src) * src_a + f32::from(dst) * inv).round().min(255.0) as u8;
    dst[0] = channel(r, dst[0]);
    dst[1] = channel(g, dst[1]);
    dst[2] = channel(b, dst[2]);
    dst[3] = (src_a * 255.0 + f32::from(dst[3]) * inv).round().min(255.0) as u8;
}
