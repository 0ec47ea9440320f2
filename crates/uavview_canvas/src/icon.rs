//! SVG icon rasterization.
//!
//! Icons are rasterized at runtime using resvg/tiny-skia into an
//! [`ImageHandle`] that fits a square of the requested size.

use crate::error::{CanvasError, Result};
use crate::image::ImageHandle;

/// Rasterize SVG bytes so the larger side equals `size` pixels.
///
/// `currentColor` in the document is replaced by `color` when given.
pub fn rasterize_svg(svg_data: &[u8], size: u32, color: Option<[u8; 4]>) -> Result<ImageHandle> {
    let svg_str = std::str::from_utf8(svg_data).map_err(|e| CanvasError::Svg(e.to_string()))?;
    let svg_str = match color {
        Some(c) => svg_str.replace("currentColor", &format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])),
        None => svg_str.to_string(),
    };

    log::debug!("Rasterizing SVG: {} bytes, target size: {}", svg_data.len(), size);

    let tree = resvg::usvg::Tree::from_str(&svg_str, &resvg::usvg::Options::default())
        .map_err(|e| CanvasError::Svg(e.to_string()))?;

    // Calculate scaling to fit in target size
    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());
    let width = ((svg_size.width() * scale).ceil() as u32).max(1);
    let height = ((svg_size.height() * scale).ceil() as u32).max(1);

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(CanvasError::PixmapAllocation { width, height })?;
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(ImageHandle::from_pixmap(pixmap))
}
