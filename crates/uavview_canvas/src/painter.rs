//! The drawing surface abstraction shared by every backend.

use crate::color::Color;
use crate::geometry::{Point, Rect, Size, Transform};
use crate::image::ImageHandle;

/// High-level drawing primitives a viewport paints with.
///
/// Coordinates passed to the drawing methods are mapped through the current
/// [`Transform`]. Stroke widths and font sizes scale with it as well.
pub trait Painter {
    /// Size of the drawing target in device pixels.
    fn size(&self) -> Size;

    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);

    fn reset_transform(&mut self) {
        self.set_transform(Transform::IDENTITY);
    }

    /// Fill the whole target, ignoring the transform.
    fn clear(&mut self, color: Color);

    /// Draw an image with its top-left corner at `origin`.
    fn draw_image(&mut self, image: &ImageHandle, origin: Point);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, width: f32);

    /// Draw possibly multi-line text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, size: f32, color: Color);
}

/// A recorded drawing call together with the transform active at the time.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Image {
        image: ImageHandle,
        origin: Point,
        transform: Transform,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        color: Color,
        transform: Transform,
    },
    StrokeRoundedRect {
        rect: Rect,
        radius: f32,
        color: Color,
        width: f32,
        transform: Transform,
    },
    Text {
        text: String,
        origin: Point,
        size: f32,
        color: Color,
        transform: Transform,
    },
}

impl DrawCommand {
    /// Transform the command was issued under (identity for `Clear`).
    pub fn transform(&self) -> Transform {
        match self {
            DrawCommand::Clear { .. } => Transform::IDENTITY,
            DrawCommand::Image { transform, .. }
            | DrawCommand::FillRoundedRect { transform, .. }
            | DrawCommand::StrokeRoundedRect { transform, .. }
            | DrawCommand::Text { transform, .. } => *transform,
        }
    }

    /// Device-space bounds of the command, if it has a position.
    pub fn device_bounds(&self) -> Option<Rect> {
        match self {
            DrawCommand::Clear { .. } => None,
            DrawCommand::Image {
                image,
                origin,
                transform,
            } => Some(transform.map_rect(Rect::new(
                origin.x,
                origin.y,
                image.width() as f32,
                image.height() as f32,
            ))),
            DrawCommand::FillRoundedRect { rect, transform, .. }
            | DrawCommand::StrokeRoundedRect { rect, transform, .. } => Some(transform.map_rect(*rect)),
            DrawCommand::Text {
                origin, transform, ..
            } => {
                let p = transform.map_point(*origin);
                Some(Rect::new(p.x, p.y, 0.0, 0.0))
            }
        }
    }
}

/// A painter that draws nothing and records every call.
///
/// Hosts can replay the commands onto their own toolkit; tests use it to
/// inspect draw order and transforms.
#[derive(Debug, Clone)]
pub struct CommandRecorder {
    size: Size,
    transform: Transform,
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            transform: Transform::IDENTITY,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Replay the recorded commands onto another painter.
    pub fn replay(&self, target: &mut dyn Painter) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear { color } => target.clear(*color),
                DrawCommand::Image {
                    image,
                    origin,
                    transform,
                } => {
                    target.set_transform(*transform);
                    target.draw_image(image, *origin);
                }
                DrawCommand::FillRoundedRect {
                    rect,
                    radius,
                    color,
                    transform,
                } => {
                    target.set_transform(*transform);
                    target.fill_rounded_rect(*rect, *radius, *color);
                }
                DrawCommand::StrokeRoundedRect {
                    rect,
                    radius,
                    color,
                    width,
                    transform,
                } => {
                    target.set_transform(*transform);
                    target.stroke_rounded_rect(*rect, *radius, *color, *width);
                }
                DrawCommand::Text {
                    text,
                    origin,
                    size,
                    color,
                    transform,
                } => {
                    target.set_transform(*transform);
                    target.draw_text(text, *origin, *size, *color);
                }
            }
        }
        target.reset_transform();
    }
}

impl Painter for CommandRecorder {
    fn size(&self) -> Size {
        self.size
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn draw_image(&mut self, image: &ImageHandle, origin: Point) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            origin,
            transform: self.transform,
        });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillRoundedRect {
            rect,
            radius,
            color,
            transform: self.transform,
        });
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeRoundedRect {
            rect,
            radius,
            color,
            width,
            transform: self.transform,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            size,
            color,
            transform: self.transform,
        });
    }
}
