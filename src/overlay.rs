//! Overlays composited on top of the canvas image.
//!
//! Painting is split in two passes. [`OverlayRenderer::render_on_canvas`] runs
//! under the view transform, so whatever it draws pans and zooms with the
//! image. [`OverlayRenderer::render_on_viewport`] runs with an identity
//! transform and stays pinned to the viewport.

use serde::{Deserialize, Serialize};
use uavview_canvas::{Color, Painter, Point, Rect, Size};

use crate::assets::AssetResolver;
use crate::constants;
use crate::marker::{MarkerIconCache, MarkerState};
use crate::uav::Uav;
use crate::zoom_math::ViewTransform;

/// Per-paint information for the canvas pass.
#[derive(Debug, Clone, Copy)]
pub struct OverlayFrame<'a> {
    /// Canvas bounds, zero when no image is loaded
    pub canvas_size: Size,
    pub marker: &'a MarkerState,
    pub view: &'a ViewTransform,
}

/// Draws the viewport overlays.
pub trait OverlayRenderer {
    /// Draw in canvas coordinates.
    fn render_on_canvas(&mut self, painter: &mut dyn Painter, frame: &OverlayFrame<'_>);

    /// Draw in viewport coordinates.
    fn render_on_viewport(&mut self, painter: &mut dyn Painter, viewport_size: Size);

    /// Tooltip for the canvas point under the pointer.
    fn tooltip(&self, _canvas_point: Point) -> Option<String> {
        None
    }
}

/// Look of the info panel. Colors are straight RGBA8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelStyle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    /// Applied to fill, border and text
    pub opacity: f32,
    pub fill: [u8; 4],
    pub border: [u8; 4],
    pub border_width: f32,
    pub text_color: [u8; 4],
    pub text_size: f32,
    /// Text offset from the panel's top-left corner
    pub text_inset: [f32; 2],
}

impl PanelStyle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Default for PanelStyle {
    fn default() -> Self {
        let [x, y, width, height] = constants::PANEL_RECT;
        Self {
            x,
            y,
            width,
            height,
            corner_radius: constants::PANEL_CORNER_RADIUS,
            opacity: constants::PANEL_OPACITY,
            fill: [255, 255, 255, 255],
            border: [0, 0, 0, 255],
            border_width: 1.0,
            text_color: [0, 0, 0, 255],
            text_size: constants::PANEL_TEXT_SIZE,
            text_inset: constants::PANEL_TEXT_INSET,
        }
    }
}

/// What the default overlay shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayContent {
    pub show_marker: bool,
    /// Asset name of the marker icon
    pub marker_asset: String,
    /// Icon is scaled to fit a square of this size, in canvas pixels
    pub marker_size: u32,
    pub show_panel: bool,
    /// One entry per panel line
    pub panel_lines: Vec<String>,
    pub panel: PanelStyle,
}

impl Default for OverlayContent {
    fn default() -> Self {
        Self {
            show_marker: true,
            marker_asset: constants::DEFAULT_MARKER_ASSET.to_string(),
            marker_size: constants::DEFAULT_MARKER_SIZE,
            show_panel: true,
            panel_lines: vec!["Weather: Clear".to_string(), "Wind: Southeast".to_string()],
            panel: PanelStyle::default(),
        }
    }
}

impl OverlayContent {
    /// Use the aircraft's icon for the marker and name it in the panel.
    pub fn with_uav(mut self, uav: &Uav) -> Self {
        if !uav.image_file.is_empty() {
            self.marker_asset = uav.image_file.clone();
        }
        if !uav.name.is_empty() {
            self.panel_lines.insert(0, uav.name.clone());
        }
        self
    }

    pub fn panel_text(&self) -> String {
        self.panel_lines.join("\n")
    }
}

/// Heading marker on the canvas and a translucent info panel in the corner.
pub struct DefaultOverlay {
    content: OverlayContent,
    icons: MarkerIconCache,
}

impl DefaultOverlay {
    pub fn new(content: OverlayContent, resolver: Box<dyn AssetResolver>) -> Self {
        Self {
            content,
            icons: MarkerIconCache::new(resolver),
        }
    }

    /// Replace the content. The icon is reloaded if the asset changed.
    pub fn set_content(&mut self, content: OverlayContent) {
        if content.marker_asset != self.content.marker_asset {
            self.icons.reload();
        }
        self.content = content;
    }
}

impl OverlayRenderer for DefaultOverlay {
    fn render_on_canvas(&mut self, painter: &mut dyn Painter, frame: &OverlayFrame<'_>) {
        if !self.content.show_marker || frame.canvas_size.is_empty() {
            return;
        }
        let Some(icon) = self.icons.icon(
            &self.content.marker_asset,
            self.content.marker_size,
            frame.marker.angle_deg,
        ) else {
            return;
        };

        // Rotated bounding box centered on the anchor
        let origin = Point::new(
            frame.marker.position.x - icon.width() as f32 / 2.0,
            frame.marker.position.y - icon.height() as f32 / 2.0,
        );
        painter.draw_image(&icon, origin);
    }

    fn render_on_viewport(&mut self, painter: &mut dyn Painter, _viewport_size: Size) {
        if !self.content.show_panel {
            return;
        }
        let style = &self.content.panel;
        let rect = style.rect();

        painter.fill_rounded_rect(
            rect,
            style.corner_radius,
            Color::from_rgba8(style.fill).with_opacity(style.opacity),
        );
        painter.stroke_rounded_rect(
            rect,
            style.corner_radius,
            Color::from_rgba8(style.border).with_opacity(style.opacity),
            style.border_width,
        );

        if !self.content.panel_lines.is_empty() {
            let text_origin = Point::new(rect.x + style.text_inset[0], rect.y + style.text_inset[1]);
            painter.draw_text(
                &self.content.panel_text(),
                text_origin,
                style.text_size,
                Color::from_rgba8(style.text_color).with_opacity(style.opacity),
            );
        }
    }
}
