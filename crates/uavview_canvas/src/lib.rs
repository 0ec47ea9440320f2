//! uavview_canvas - a small 2-D drawing abstraction with a software backend
//!
//! The viewport core paints through the [`Painter`] trait. [`SkiaPainter`]
//! rasterizes with tiny-skia, [`CommandRecorder`] records the calls so a host
//! toolkit can replay them.

mod color;
mod error;
mod geometry;
mod icon;
mod image;
mod painter;
mod skia;
mod text;

pub use color::Color;
pub use error::{CanvasError, Result};
pub use geometry::{Point, Rect, Size, Transform};
pub use icon::rasterize_svg;
pub use image::{demultiply, premultiply, ImageHandle};
pub use painter::{CommandRecorder, DrawCommand, Painter};
pub use skia::SkiaPainter;
pub use text::{GlyphPixel, TextRasterizer};
