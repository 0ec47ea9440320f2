//! View transform mathematics: zoom-to-cursor, panning and fitting.
//!
//! Kept free of viewport state so the math can be tested on its own.

use uavview_canvas::{Point, Rect, Size, Transform};

use crate::error::ViewportError;

/// Inclusive range the view scale is kept in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
}

impl ScaleBounds {
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Check a requested scale without modifying it.
    pub fn check(&self, requested: f32) -> Result<f32, ViewportError> {
        if requested.is_finite() && requested >= self.min && requested <= self.max {
            Ok(requested)
        } else {
            Err(ViewportError::TransformOutOfBounds {
                requested,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Clamp a requested scale into range, logging when it had to.
    pub fn clamp(&self, requested: f32) -> f32 {
        match self.check(requested) {
            Ok(scale) => scale,
            Err(e) => {
                log::debug!("{}, clamping", e);
                if requested.is_nan() {
                    self.min
                } else {
                    requested.clamp(self.min, self.max)
                }
            }
        }
    }
}

/// Mapping from canvas to viewport coordinates:
/// `viewport = canvas * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl ViewTransform {
    pub fn new(scale: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Scale 1, no offset.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn map_to_viewport(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.offset_x,
            canvas.y * self.scale + self.offset_y,
        )
    }

    pub fn map_to_canvas(&self, viewport: Point) -> Point {
        Point::new(
            (viewport.x - self.offset_x) / self.scale,
            (viewport.y - self.offset_y) / self.scale,
        )
    }

    /// Change the scale while keeping the canvas point under `anchor` fixed.
    ///
    /// The algorithm:
    /// 1. Find the canvas point under the anchor
    /// 2. After scaling, move the offset so that point maps back to the anchor
    pub fn scaled_at(&self, new_scale: f32, anchor: Point) -> ViewTransform {
        let canvas = self.map_to_canvas(anchor);
        ViewTransform {
            scale: new_scale,
            offset_x: anchor.x - canvas.x * new_scale,
            offset_y: anchor.y - canvas.y * new_scale,
        }
    }

    /// Multiply the scale by `factor` around `anchor`, clamped to `bounds`.
    pub fn zoom_at(&self, factor: f32, anchor: Point, bounds: ScaleBounds) -> ViewTransform {
        let new_scale = bounds.clamp(self.scale * factor);
        self.scaled_at(new_scale, anchor)
    }

    /// Apply a pan delta in viewport pixels.
    pub fn pan_by(&self, dx: f32, dy: f32) -> ViewTransform {
        ViewTransform {
            scale: self.scale,
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
        }
    }

    /// Transform showing all of `rect` inside `viewport`, aspect ratio kept
    /// and centered. `None` when either side is empty.
    pub fn fit_rect(rect: Rect, viewport: Size, bounds: ScaleBounds) -> Option<ViewTransform> {
        if rect.is_empty() || viewport.is_empty() {
            return None;
        }
        let scale = bounds.clamp((viewport.width / rect.width).min(viewport.height / rect.height));
        let center = rect.center();
        Some(ViewTransform {
            scale,
            offset_x: viewport.width / 2.0 - center.x * scale,
            offset_y: viewport.height / 2.0 - center.y * scale,
        })
    }

    /// Region of the canvas visible through a viewport of `viewport` size.
    pub fn visible_canvas_rect(&self, viewport: Size) -> Rect {
        Rect::from_corners(
            self.map_to_canvas(Point::ORIGIN),
            self.map_to_canvas(Point::new(viewport.width, viewport.height)),
        )
    }

    /// Same mapping expressed as a painter transform.
    pub fn to_painter(self) -> Transform {
        Transform::new(self.scale, self.offset_x, self.offset_y)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
