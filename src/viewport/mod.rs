//! The image viewport: a zoomable, pannable view of one canvas image with
//! overlays drawn on top.
//!
//! The viewport is toolkit-agnostic. A host forwards input as
//! [`ViewportEvent`]s, applies the returned [`EventOutcome`] (cursor, menu,
//! repaint) and calls [`ImageViewport::paint`] with any [`Painter`].

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use uavview_canvas::{Color, ImageHandle, Painter, Point, Rect, Size};

use crate::assets::default_resolver;
use crate::config::{ViewportConfig, ZoomConfig};
use crate::context_menu::{ContextMenu, ViewportAction};
use crate::error::Result;
use crate::event::{CursorShape, EventOutcome, PointerButton, ViewportEvent};
use crate::frame::{image_from_dynamic, RawFrame};
use crate::marker::MarkerState;
use crate::overlay::{DefaultOverlay, OverlayFrame, OverlayRenderer};
use crate::zoom_math::ViewTransform;

/// When scrollbars may take space from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollbarPolicy {
    /// Shown on an axis whose content overflows the viewport
    #[default]
    AsNeeded,
    /// Never shown
    AlwaysOff,
}

/// Which scrollbars are currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarVisibility {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Pan drag interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging with last pointer position (viewport space)
    Panning { last: Point },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Panning { .. })
    }
}

/// Zoomable, pannable image view with marker and panel overlays.
pub struct ImageViewport {
    config: ViewportConfig,
    canvas: Option<ImageHandle>,
    view: ViewTransform,
    /// Last size reported by the host, `None` before the first layout
    viewport_size: Option<Size>,
    marker: MarkerState,
    overlay: Box<dyn OverlayRenderer>,
    scrollbar_policy: ScrollbarPolicy,
    drag: DragState,
    /// Canvas point under the pointer
    hover: Option<Point>,
    needs_repaint: bool,
}

impl ImageViewport {
    /// Create a viewport with the default overlay drawing `config.overlay`.
    pub fn new(config: ViewportConfig) -> Self {
        let overlay = DefaultOverlay::new(
            config.overlay.clone(),
            Box::new(default_resolver(config.asset_dir.clone())),
        );
        Self::with_overlay(config, Box::new(overlay))
    }

    /// Create a viewport drawing overlays with a custom renderer.
    ///
    /// Invalid zoom settings are replaced by the defaults.
    pub fn with_overlay(mut config: ViewportConfig, overlay: Box<dyn OverlayRenderer>) -> Self {
        if let Err(e) = config.zoom.validate() {
            log::warn!("{}, using default zoom settings", e);
            config.zoom = ZoomConfig::default();
        }
        Self {
            scrollbar_policy: config.scrollbars.policy,
            config,
            canvas: None,
            view: ViewTransform::identity(),
            viewport_size: None,
            marker: MarkerState::default(),
            overlay,
            drag: DragState::Idle,
            hover: None,
            needs_repaint: true,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Canvas image
    // ---------------------------------------------------------------

    /// Replace the canvas with a decoded image.
    ///
    /// On failure the previous frame stays on screen.
    pub fn set_image(&mut self, image: &image::DynamicImage) -> Result<()> {
        let handle = image_from_dynamic(image).inspect_err(|e| {
            log::warn!("Rejected frame, keeping previous one: {}", e);
        })?;
        self.set_canvas_image(handle);
        Ok(())
    }

    /// Replace the canvas with a raw RGB888 frame.
    ///
    /// On failure the previous frame stays on screen.
    pub fn set_image_from_raw(&mut self, frame: RawFrame<'_>) -> Result<()> {
        let handle = frame.to_image_handle().inspect_err(|e| {
            log::warn!("Rejected raw frame, keeping previous one: {}", e);
        })?;
        self.set_canvas_image(handle);
        Ok(())
    }

    /// Replace the canvas with an already converted image.
    pub fn set_canvas_image(&mut self, image: ImageHandle) {
        if self.canvas.as_ref().map(ImageHandle::size) != Some(image.size()) {
            log::debug!("Canvas bounds now {}x{}", image.width(), image.height());
        }
        self.canvas = Some(image);
        self.needs_repaint = true;
    }

    pub fn canvas_image(&self) -> Option<&ImageHandle> {
        self.canvas.as_ref()
    }

    /// Canvas extent, zero when no image has been set.
    pub fn canvas_size(&self) -> Size {
        self.canvas.as_ref().map(ImageHandle::size).unwrap_or(Size::ZERO)
    }

    /// Canvas rectangle anchored at the origin, `None` when empty.
    pub fn canvas_bounds(&self) -> Option<Rect> {
        let size = self.canvas_size();
        (!size.is_empty()).then(|| Rect::from_size(size))
    }

    // ---------------------------------------------------------------
    // View transform
    // ---------------------------------------------------------------

    pub fn view_transform(&self) -> ViewTransform {
        self.view
    }

    pub fn scale(&self) -> f32 {
        self.view.scale
    }

    pub fn map_to_canvas(&self, viewport_point: Point) -> Point {
        self.view.map_to_canvas(viewport_point)
    }

    pub fn map_to_viewport(&self, canvas_point: Point) -> Point {
        self.view.map_to_viewport(canvas_point)
    }

    /// Show the whole canvas, centered, as large as the viewport allows.
    ///
    /// Scrollbars are switched off while fitting so their extent does not
    /// shrink the target area.
    pub fn fit_to_view(&mut self) {
        let Some(bounds) = self.canvas_bounds() else {
            return;
        };
        if self.viewport_size.is_none() {
            return;
        }

        let saved = self.scrollbar_policy;
        self.scrollbar_policy = ScrollbarPolicy::AlwaysOff;
        let target = self.effective_viewport_size();
        self.fit_region(bounds, target);
        self.scrollbar_policy = saved;
    }

    /// Zoom one wheel step around `anchor` (viewport coordinates).
    ///
    /// Positive `delta` zooms in, negative zooms out, zero does nothing.
    /// `precise` selects the fine step.
    pub fn zoom(&mut self, delta: f32, precise: bool, anchor: Point) {
        if delta == 0.0 || delta.is_nan() {
            return;
        }
        let step = if precise {
            self.config.zoom.precise_step
        } else {
            self.config.zoom.step
        };
        let factor = if delta > 0.0 { step } else { 1.0 / step };

        self.view = self.view.zoom_at(factor, anchor, self.config.zoom.bounds());
        self.needs_repaint = true;
        log::debug!(
            "Zoom {} at ({:.1}, {:.1}): scale {:.4}",
            if delta > 0.0 { "in" } else { "out" },
            anchor.x,
            anchor.y,
            self.view.scale
        );
    }

    /// Translate the view by a delta in viewport pixels.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.view = self.view.pan_by(dx, dy);
        self.needs_repaint = true;
    }

    fn fit_region(&mut self, region: Rect, target: Size) {
        if let Some(view) = ViewTransform::fit_rect(region, target, self.config.zoom.bounds()) {
            log::debug!(
                "Fit {:?} into {}x{}: scale {:.4}",
                region,
                target.width,
                target.height,
                view.scale
            );
            self.view = view;
            self.needs_repaint = true;
        }
    }

    // ---------------------------------------------------------------
    // Viewport size and scrollbars
    // ---------------------------------------------------------------

    pub fn viewport_size(&self) -> Option<Size> {
        self.viewport_size
    }

    /// React to the host resizing the viewport.
    ///
    /// The canvas region visible through the old viewport is kept in view:
    /// it is clamped to the canvas and fitted into the new size, less any
    /// scrollbars the fit brings up. Nothing is refitted on the first layout
    /// (`old` is `None`).
    pub fn on_viewport_resize(&mut self, old: Option<Size>, new: Size) {
        self.viewport_size = Some(new);
        let Some(old) = old else {
            log::debug!("Initial viewport size {}x{}", new.width, new.height);
            return;
        };
        let Some(bounds) = self.canvas_bounds() else {
            return;
        };

        let visible = self
            .view
            .visible_canvas_rect(self.effective_size_for(old))
            .intersect(&bounds);
        let region = if visible.is_empty() { bounds } else { visible };
        self.fit_region(region, new);

        // Scrollbars raised by the new scale take room from the target
        let effective = self.effective_size_for(new);
        if effective != new {
            self.fit_region(region, effective);
        }
    }

    /// Resize using the last known size as the old one.
    pub fn resize(&mut self, new: Size) {
        let old = self.viewport_size;
        self.on_viewport_resize(old, new);
    }

    pub fn scrollbar_policy(&self) -> ScrollbarPolicy {
        self.scrollbar_policy
    }

    pub fn set_scrollbar_policy(&mut self, policy: ScrollbarPolicy) {
        self.scrollbar_policy = policy;
        self.needs_repaint = true;
    }

    /// Scrollbars shown for the current viewport size and transform.
    pub fn visible_scrollbars(&self) -> ScrollbarVisibility {
        self.viewport_size
            .map(|size| self.scrollbars_for(size))
            .unwrap_or_default()
    }

    /// Viewport area left for the canvas once scrollbars take their space.
    pub fn effective_viewport_size(&self) -> Size {
        self.viewport_size
            .map(|size| self.effective_size_for(size))
            .unwrap_or(Size::ZERO)
    }

    fn effective_size_for(&self, viewport: Size) -> Size {
        let bars = self.scrollbars_for(viewport);
        let extent = self.config.scrollbars.extent;
        Size::new(
            if bars.vertical { (viewport.width - extent).max(0.0) } else { viewport.width },
            if bars.horizontal { (viewport.height - extent).max(0.0) } else { viewport.height },
        )
    }

    fn scrollbars_for(&self, viewport: Size) -> ScrollbarVisibility {
        if self.scrollbar_policy == ScrollbarPolicy::AlwaysOff || self.canvas.is_none() {
            return ScrollbarVisibility::default();
        }
        let canvas = self.canvas_size();
        let content = Size::new(canvas.width * self.view.scale, canvas.height * self.view.scale);
        let extent = self.config.scrollbars.extent;

        let mut horizontal = content.width > viewport.width;
        let mut vertical = content.height > viewport.height;
        // One bar can make the other axis overflow
        if horizontal && !vertical {
            vertical = content.height > viewport.height - extent;
        }
        if vertical && !horizontal {
            horizontal = content.width > viewport.width - extent;
        }
        ScrollbarVisibility {
            horizontal,
            vertical,
        }
    }

    // ---------------------------------------------------------------
    // Marker
    // ---------------------------------------------------------------

    /// Set the heading marker's rotation (degrees, clockwise) and its canvas
    /// anchor.
    pub fn set_marker(&mut self, angle_deg: f32, position: Point) {
        self.marker = MarkerState::new(angle_deg, position);
        self.needs_repaint = true;
    }

    pub fn marker(&self) -> MarkerState {
        self.marker
    }

    // ---------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Tooltip for the canvas point last hovered.
    pub fn tooltip(&self) -> Option<String> {
        self.hover.and_then(|point| self.overlay.tooltip(point))
    }

    pub fn handle_event(&mut self, event: ViewportEvent) -> EventOutcome {
        match event {
            ViewportEvent::PointerPressed { button, position } => {
                if button != PointerButton::Primary {
                    return EventOutcome::ignored();
                }
                self.drag = DragState::Panning { last: position };
                EventOutcome {
                    consumed: true,
                    cursor: Some(CursorShape::ClosedHand),
                    ..EventOutcome::default()
                }
            }
            ViewportEvent::PointerMoved { position } => self.pointer_moved(position),
            ViewportEvent::PointerReleased { button, .. } => {
                if button != PointerButton::Primary || !self.drag.is_dragging() {
                    return EventOutcome::ignored();
                }
                self.drag = DragState::Idle;
                EventOutcome {
                    consumed: true,
                    cursor: Some(CursorShape::Default),
                    ..EventOutcome::default()
                }
            }
            ViewportEvent::Wheel {
                delta,
                position,
                modifiers,
            } => {
                if delta == 0.0 || delta.is_nan() {
                    return EventOutcome::ignored();
                }
                self.zoom(delta, modifiers.ctrl, position);
                EventOutcome::repaint()
            }
            ViewportEvent::Resized { old, new } => {
                self.on_viewport_resize(old, new);
                EventOutcome::repaint()
            }
            ViewportEvent::ContextMenuRequested { position } => {
                if !self.config.context_menu {
                    return EventOutcome::ignored();
                }
                EventOutcome {
                    consumed: true,
                    context_menu: Some(ContextMenu::reset_view(
                        position,
                        &self.config.reset_view_label,
                    )),
                    ..EventOutcome::default()
                }
            }
        }
    }

    fn pointer_moved(&mut self, position: Point) -> EventOutcome {
        let canvas_point = self.view.map_to_canvas(position);
        self.hover = Some(canvas_point);
        let tooltip = self.overlay.tooltip(canvas_point);

        let DragState::Panning { last } = self.drag else {
            return EventOutcome {
                tooltip,
                ..EventOutcome::default()
            };
        };

        self.pan_by(position.x - last.x, position.y - last.y);
        self.drag = DragState::Panning { last: position };
        EventOutcome {
            tooltip,
            ..EventOutcome::repaint()
        }
    }

    /// Run a context menu action.
    pub fn perform(&mut self, action: ViewportAction) {
        match action {
            ViewportAction::FitToView => self.fit_to_view(),
        }
    }

    // ---------------------------------------------------------------
    // Painting
    // ---------------------------------------------------------------

    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Paint background, canvas, canvas overlays and viewport overlays.
    pub fn paint(&mut self, painter: &mut dyn Painter) {
        let start = web_time::Instant::now();

        painter.reset_transform();
        painter.clear(Color::from_rgba8(self.config.background));

        painter.set_transform(self.view.to_painter());
        if let Some(canvas) = &self.canvas {
            painter.draw_image(canvas, Point::ORIGIN);
        }
        let frame = OverlayFrame {
            canvas_size: self.canvas_size(),
            marker: &self.marker,
            view: &self.view,
        };
        self.overlay.render_on_canvas(painter, &frame);

        painter.reset_transform();
        let viewport_size = self.viewport_size.unwrap_or_else(|| painter.size());
        self.overlay.render_on_viewport(painter, viewport_size);

        self.needs_repaint = false;
        log::trace!("Viewport painted in {:?}", start.elapsed());
    }
}
