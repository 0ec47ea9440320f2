use image::DynamicImage;
use uavview_canvas::{CommandRecorder, DrawCommand, Painter, Point, Rect, Size, SkiaPainter, TextRasterizer};

use super::*;
use crate::assets::EmbeddedAssets;
use crate::error::ViewportError;
use crate::event::Modifiers;
use crate::overlay::OverlayContent;

const EPSILON: f32 = 0.0001;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn config() -> ViewportConfig {
    let mut config = ViewportConfig::default();
    config.zoom.step = 1.2;
    config
}

/// Viewport whose overlay only reads the built-in assets.
fn viewport(config: ViewportConfig) -> ImageViewport {
    let overlay = DefaultOverlay::new(config.overlay.clone(), Box::new(EmbeddedAssets::builtin()));
    ImageViewport::with_overlay(config, Box::new(overlay))
}

fn viewport_with_image(width: u32, height: u32, view: Size) -> ImageViewport {
    let mut vp = viewport(config());
    vp.set_image(&DynamicImage::new_rgb8(width, height)).unwrap();
    vp.on_viewport_resize(None, view);
    vp
}

fn record(vp: &mut ImageViewport) -> Vec<DrawCommand> {
    let mut rec = CommandRecorder::new(vp.viewport_size().unwrap_or(Size::new(640.0, 480.0)));
    vp.paint(&mut rec);
    rec.take_commands()
}

fn panel_rect(commands: &[DrawCommand]) -> Option<Rect> {
    commands.iter().find_map(|c| match c {
        DrawCommand::FillRoundedRect { .. } => c.device_bounds(),
        _ => None,
    })
}

fn marker_image(commands: &[DrawCommand]) -> Option<(ImageHandle, Rect)> {
    // First image is the canvas, the second the marker
    commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Image { image, .. } => Some((image.clone(), c.device_bounds()?)),
            _ => None,
        })
        .nth(1)
}

#[test]
fn test_set_image_sets_canvas_bounds() {
    let mut vp = viewport(config());
    assert_eq!(vp.canvas_bounds(), None);

    vp.set_image(&DynamicImage::new_rgb8(64, 48)).unwrap();
    assert_eq!(vp.canvas_bounds(), Some(Rect::new(0.0, 0.0, 64.0, 48.0)));
    assert!(vp.needs_repaint());
}

#[test]
fn test_zoom_then_fit_scenario() {
    let mut vp = viewport(config());
    vp.set_image(&DynamicImage::new_rgb8(64, 48)).unwrap();
    vp.on_viewport_resize(None, Size::new(640.0, 480.0));
    let initial = vp.scale();

    vp.zoom(1.0, false, Point::ORIGIN);
    vp.zoom(1.0, false, Point::ORIGIN);
    assert!(approx_eq(vp.scale(), initial * 1.44));

    vp.fit_to_view();
    assert!(approx_eq(vp.scale(), 10.0));
    let t = vp.view_transform();
    assert!(approx_eq(t.offset_x, 0.0));
    assert!(approx_eq(t.offset_y, 0.0));
}

#[test]
fn test_fit_centers_letterboxed_image() {
    let mut vp = viewport_with_image(100, 50, Size::new(400.0, 400.0));
    vp.fit_to_view();
    let t = vp.view_transform();
    assert!(approx_eq(t.scale, 4.0));
    assert!(approx_eq(t.offset_x, 0.0));
    assert!(approx_eq(t.offset_y, 100.0));
}

#[test]
fn test_zoom_in_out_is_invertible() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    vp.fit_to_view();
    let before = vp.view_transform();

    let anchor = Point::new(123.0, 45.0);
    vp.zoom(1.0, false, anchor);
    vp.zoom(-1.0, false, anchor);
    let after = vp.view_transform();
    assert!(approx_eq(before.scale, after.scale));
    assert!(approx_eq(before.offset_x, after.offset_x));
    assert!(approx_eq(before.offset_y, after.offset_y));
}

#[test]
fn test_precise_zoom_uses_fine_step() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    vp.zoom(1.0, true, Point::ORIGIN);
    assert!(approx_eq(vp.scale(), 1.01));
}

#[test]
fn test_zero_delta_does_nothing() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    let before = vp.view_transform();
    vp.zoom(0.0, false, Point::new(10.0, 10.0));
    assert_eq!(vp.view_transform(), before);
}

#[test]
fn test_nan_wheel_delta_is_ignored() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    let before = vp.view_transform();
    let outcome = vp.handle_event(ViewportEvent::Wheel {
        delta: f32::NAN,
        position: Point::new(10.0, 10.0),
        modifiers: Modifiers::default(),
    });
    assert!(!outcome.consumed);
    assert!(!outcome.repaint);
    assert_eq!(vp.view_transform(), before);
}

#[test]
fn test_invalid_zoom_step_falls_back_to_default() {
    let mut cfg = config();
    cfg.zoom.step = 0.5;
    let mut vp = viewport(cfg);
    vp.set_image(&DynamicImage::new_rgb8(10, 10)).unwrap();

    assert_eq!(vp.config().zoom, ZoomConfig::default());
    vp.zoom(1.0, false, Point::ORIGIN);
    assert!(vp.scale() > 1.0);
    assert!(approx_eq(vp.scale(), 1.15));
}

#[test]
fn test_zoom_keeps_anchor_fixed() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    vp.fit_to_view();
    let anchor = Point::new(200.0, 150.0);
    let before = vp.map_to_canvas(anchor);
    vp.zoom(1.0, false, anchor);
    let after = vp.map_to_canvas(anchor);
    assert!(approx_eq(before.x, after.x));
    assert!(approx_eq(before.y, after.y));
}

#[test]
fn test_zoom_clamped_to_bounds() {
    let mut cfg = config();
    cfg.zoom.max_scale = 2.0;
    let mut vp = viewport(cfg);
    vp.set_image(&DynamicImage::new_rgb8(10, 10)).unwrap();
    for _ in 0..20 {
        vp.zoom(1.0, false, Point::ORIGIN);
    }
    assert_eq!(vp.scale(), 2.0);
}

#[test]
fn test_fit_is_idempotent() {
    let mut vp = viewport_with_image(64, 48, Size::new(300.0, 500.0));
    vp.zoom(1.0, false, Point::new(20.0, 30.0));
    vp.pan_by(13.0, -7.0);

    vp.fit_to_view();
    let first = vp.view_transform();
    vp.fit_to_view();
    assert_eq!(vp.view_transform(), first);
}

#[test]
fn test_fit_without_viewport_or_canvas_is_noop() {
    let mut vp = viewport(config());
    vp.on_viewport_resize(None, Size::new(100.0, 100.0));
    vp.fit_to_view();
    assert_eq!(vp.view_transform(), ViewTransform::identity());

    let mut vp = viewport(config());
    vp.set_image(&DynamicImage::new_rgb8(64, 48)).unwrap();
    vp.fit_to_view();
    assert_eq!(vp.view_transform(), ViewTransform::identity());
}

#[test]
fn test_marker_rotation_is_periodic() {
    let mut vp = viewport_with_image(640, 480, Size::new(640.0, 480.0));

    vp.set_marker(30.0, Point::new(200.0, 150.0));
    let (a, a_bounds) = marker_image(&record(&mut vp)).unwrap();

    vp.set_marker(390.0, Point::new(200.0, 150.0));
    let (b, b_bounds) = marker_image(&record(&mut vp)).unwrap();

    assert_eq!(a_bounds, b_bounds);
    assert_eq!(a.data(), b.data());
}

#[test]
fn test_marker_follows_view_transform() {
    let mut vp = viewport_with_image(640, 480, Size::new(640.0, 480.0));
    vp.set_marker(0.0, Point::new(100.0, 100.0));
    vp.zoom(1.0, false, Point::ORIGIN);

    let (_, bounds) = marker_image(&record(&mut vp)).unwrap();
    // 100x100 icon centered on (100, 100), scaled by 1.2
    assert!(approx_eq(bounds.x, 60.0));
    assert!(approx_eq(bounds.width, 120.0));
}

#[test]
fn test_panel_invariant_under_zoom_and_pan() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    let initial = panel_rect(&record(&mut vp)).unwrap();
    assert_eq!(initial, Rect::new(20.0, 20.0, 190.0, 90.0));

    vp.zoom(1.0, false, Point::new(300.0, 200.0));
    vp.pan_by(-40.0, 25.0);
    vp.zoom(-1.0, true, Point::new(10.0, 10.0));
    vp.fit_to_view();
    vp.pan_by(7.0, 7.0);

    assert_eq!(panel_rect(&record(&mut vp)), Some(initial));
}

#[test]
fn test_paint_order() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    vp.set_marker(0.0, Point::new(32.0, 24.0));
    vp.fit_to_view();
    let commands = record(&mut vp);

    assert!(matches!(commands[0], DrawCommand::Clear { .. }));
    match &commands[1] {
        DrawCommand::Image { image, transform, .. } => {
            assert_eq!(image.width(), 64);
            assert!(approx_eq(transform.scale, 10.0));
        }
        other => panic!("expected canvas image, got {:?}", other),
    }
    assert!(matches!(commands[2], DrawCommand::Image { .. }));
    for command in &commands[3..] {
        assert_eq!(command.transform(), uavview_canvas::Transform::IDENTITY);
    }
    assert!(!vp.needs_repaint());
}

#[test]
fn test_first_resize_does_not_refit() {
    let mut vp = viewport(config());
    vp.set_image(&DynamicImage::new_rgb8(64, 48)).unwrap();
    vp.on_viewport_resize(None, Size::new(640.0, 480.0));
    assert_eq!(vp.view_transform(), ViewTransform::identity());
    assert_eq!(vp.viewport_size(), Some(Size::new(640.0, 480.0)));
}

#[test]
fn test_resize_keeps_visible_region() {
    let mut vp = viewport_with_image(400, 300, Size::new(400.0, 300.0));
    vp.fit_to_view();
    assert!(approx_eq(vp.scale(), 1.0));

    vp.resize(Size::new(800.0, 600.0));
    assert!(approx_eq(vp.scale(), 2.0));
    let visible = vp.view_transform().visible_canvas_rect(Size::new(800.0, 600.0));
    assert!(approx_eq(visible.width, 400.0));
    assert!(approx_eq(visible.height, 300.0));
}

#[test]
fn test_resize_keeps_zoomed_region() {
    let mut vp = viewport(config());
    vp.set_scrollbar_policy(ScrollbarPolicy::AlwaysOff);
    vp.set_image(&DynamicImage::new_rgb8(400, 400)).unwrap();
    vp.on_viewport_resize(None, Size::new(100.0, 100.0));
    // Showing canvas region (50, 50)-(150, 150)
    vp.pan_by(-50.0, -50.0);

    vp.resize(Size::new(200.0, 200.0));
    let center = vp.map_to_canvas(Point::new(100.0, 100.0));
    assert!(approx_eq(vp.scale(), 2.0));
    assert!(approx_eq(center.x, 100.0));
    assert!(approx_eq(center.y, 100.0));
}

#[test]
fn test_resize_keeps_region_behind_scrollbars() {
    let mut vp = viewport(config());
    vp.set_image(&DynamicImage::new_rgb8(400, 400)).unwrap();
    vp.on_viewport_resize(None, Size::new(100.0, 100.0));
    vp.pan_by(-50.0, -50.0);
    let before = vp.view_transform().visible_canvas_rect(vp.effective_viewport_size());
    assert_eq!(before, Rect::new(50.0, 50.0, 88.0, 88.0));

    vp.resize(Size::new(200.0, 200.0));
    let bars = vp.visible_scrollbars();
    assert!(bars.horizontal && bars.vertical);
    let after = vp.view_transform().visible_canvas_rect(vp.effective_viewport_size());
    assert!(approx_eq(vp.scale(), 188.0 / 88.0));
    assert!(after.x <= before.x + 0.01 && after.y <= before.y + 0.01);
    assert!(after.right() >= before.right() - 0.01);
    assert!(after.bottom() >= before.bottom() - 0.01);
}

#[test]
fn test_resize_with_region_off_canvas_fits_whole_canvas() {
    let mut vp = viewport_with_image(100, 100, Size::new(100.0, 100.0));
    vp.pan_by(-5000.0, 0.0);

    vp.resize(Size::new(200.0, 200.0));
    assert!(approx_eq(vp.scale(), 2.0));
    assert!(approx_eq(vp.view_transform().offset_x, 0.0));
}

#[test]
fn test_scrollbars_appear_on_overflow() {
    let mut vp = viewport_with_image(400, 300, Size::new(400.0, 300.0));
    vp.fit_to_view();
    assert_eq!(vp.visible_scrollbars(), ScrollbarVisibility::default());

    vp.zoom(1.0, false, Point::ORIGIN);
    assert_eq!(
        vp.visible_scrollbars(),
        ScrollbarVisibility {
            horizontal: true,
            vertical: true
        }
    );
    assert_eq!(vp.effective_viewport_size(), Size::new(388.0, 288.0));
}

#[test]
fn test_fit_ignores_scrollbar_extent() {
    let mut vp = viewport_with_image(400, 300, Size::new(400.0, 300.0));
    vp.zoom(1.0, false, Point::ORIGIN);
    vp.zoom(1.0, false, Point::ORIGIN);
    assert!(vp.visible_scrollbars().horizontal);

    vp.fit_to_view();
    assert!(approx_eq(vp.scale(), 1.0));
    assert_eq!(vp.scrollbar_policy(), ScrollbarPolicy::AsNeeded);
}

#[test]
fn test_drag_pans_with_primary_button() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    let before = vp.view_transform();

    let pressed = vp.handle_event(ViewportEvent::PointerPressed {
        button: PointerButton::Primary,
        position: Point::new(10.0, 10.0),
    });
    assert_eq!(pressed.cursor, Some(CursorShape::ClosedHand));

    let moved = vp.handle_event(ViewportEvent::PointerMoved {
        position: Point::new(25.0, 5.0),
    });
    assert!(moved.repaint);

    let released = vp.handle_event(ViewportEvent::PointerReleased {
        button: PointerButton::Primary,
        position: Point::new(25.0, 5.0),
    });
    assert_eq!(released.cursor, Some(CursorShape::Default));
    assert!(!vp.drag_state().is_dragging());

    let after = vp.view_transform();
    assert_eq!(after.offset_x, before.offset_x + 15.0);
    assert_eq!(after.offset_y, before.offset_y - 5.0);
    assert_eq!(after.scale, before.scale);
}

#[test]
fn test_other_buttons_do_not_drag() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    let before = vp.view_transform();

    for button in [PointerButton::Secondary, PointerButton::Middle, PointerButton::Other(4)] {
        let outcome = vp.handle_event(ViewportEvent::PointerPressed {
            button,
            position: Point::ORIGIN,
        });
        assert!(!outcome.consumed);
        vp.handle_event(ViewportEvent::PointerMoved {
            position: Point::new(50.0, 50.0),
        });
    }
    assert_eq!(vp.view_transform(), before);
}

#[test]
fn test_wheel_event_zooms() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    let outcome = vp.handle_event(ViewportEvent::Wheel {
        delta: 120.0,
        position: Point::ORIGIN,
        modifiers: Modifiers::default(),
    });
    assert!(outcome.repaint);
    assert!(approx_eq(vp.scale(), 1.2));

    vp.handle_event(ViewportEvent::Wheel {
        delta: -120.0,
        position: Point::ORIGIN,
        modifiers: Modifiers::ctrl(),
    });
    assert!(approx_eq(vp.scale(), 1.2 / 1.01));
}

#[test]
fn test_context_menu_resets_view() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    vp.zoom(1.0, false, Point::new(100.0, 100.0));

    let outcome = vp.handle_event(ViewportEvent::ContextMenuRequested {
        position: Point::new(5.0, 6.0),
    });
    let menu = outcome.context_menu.unwrap();
    assert_eq!(menu.items[0].label, "Reset view");

    vp.perform(menu.action_at(0).unwrap());
    assert!(approx_eq(vp.scale(), 10.0));
}

#[test]
fn test_context_menu_can_be_disabled() {
    let mut cfg = config();
    cfg.context_menu = false;
    let mut vp = viewport(cfg);
    let outcome = vp.handle_event(ViewportEvent::ContextMenuRequested {
        position: Point::ORIGIN,
    });
    assert!(outcome.context_menu.is_none());
    assert!(!outcome.consumed);
}

#[test]
fn test_rejected_frame_keeps_previous() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    let previous = vp.canvas_image().unwrap().id();

    let short = vec![0u8; 10];
    let err = vp.set_image_from_raw(RawFrame::new(&short, 4, 4)).unwrap_err();
    assert!(matches!(err, ViewportError::InvalidImageData(_)));
    assert_eq!(vp.canvas_image().unwrap().id(), previous);
    assert_eq!(vp.canvas_bounds(), Some(Rect::new(0.0, 0.0, 64.0, 48.0)));
}

#[test]
fn test_raw_frame_replaces_canvas() {
    let mut vp = viewport(config());
    let data = vec![128u8; 8 * 6 * 3];
    vp.set_image_from_raw(RawFrame::new(&data, 8, 6)).unwrap();
    assert_eq!(vp.canvas_bounds(), Some(Rect::new(0.0, 0.0, 8.0, 6.0)));
}

#[test]
fn test_missing_marker_asset_still_paints_frame() {
    let mut cfg = config();
    cfg.overlay = OverlayContent {
        marker_asset: "missing.png".to_string(),
        ..OverlayContent::default()
    };
    let mut vp = viewport(cfg);
    vp.set_image(&DynamicImage::new_rgb8(64, 48)).unwrap();
    vp.on_viewport_resize(None, Size::new(640.0, 480.0));

    let commands = record(&mut vp);
    assert!(marker_image(&commands).is_none());
    assert!(panel_rect(&commands).is_some());
    assert_eq!(
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
            .count(),
        1
    );
}

struct HoverOverlay;

impl OverlayRenderer for HoverOverlay {
    fn render_on_canvas(&mut self, _painter: &mut dyn Painter, _frame: &OverlayFrame<'_>) {}

    fn render_on_viewport(&mut self, _painter: &mut dyn Painter, _viewport_size: Size) {}

    fn tooltip(&self, canvas_point: Point) -> Option<String> {
        Some(format!("{:.0},{:.0}", canvas_point.x, canvas_point.y))
    }
}

#[test]
fn test_hover_tooltip_uses_canvas_coordinates() {
    let mut vp = ImageViewport::with_overlay(config(), Box::new(HoverOverlay));
    vp.set_image(&DynamicImage::new_rgb8(64, 48)).unwrap();
    vp.on_viewport_resize(None, Size::new(640.0, 480.0));
    vp.fit_to_view();

    let outcome = vp.handle_event(ViewportEvent::PointerMoved {
        position: Point::new(100.0, 50.0),
    });
    assert_eq!(outcome.tooltip.as_deref(), Some("10,5"));
    assert_eq!(vp.tooltip().as_deref(), Some("10,5"));
}

#[test]
fn test_default_overlay_has_no_tooltip() {
    let mut vp = viewport_with_image(64, 48, Size::new(640.0, 480.0));
    let outcome = vp.handle_event(ViewportEvent::PointerMoved {
        position: Point::new(1.0, 1.0),
    });
    assert!(outcome.tooltip.is_none());
}

#[test]
fn test_skia_paint_draws_canvas_and_panel() {
    let mut vp = viewport_with_image(4, 4, Size::new(40.0, 40.0));
    vp.fit_to_view();
    // Marker well outside the target
    vp.set_marker(0.0, Point::new(1000.0, 1000.0));
    let mut painter = SkiaPainter::with_text(40, 40, TextRasterizer::none()).unwrap();
    vp.paint(&mut painter);

    let out = painter.to_image();
    // Canvas is black, panel starts at (20, 20) and covers it with
    // half-transparent white
    let canvas_px = out.pixel(5, 5).unwrap();
    assert_eq!(&canvas_px[..3], &[0, 0, 0]);
    let panel_px = out.pixel(35, 35).unwrap();
    assert!(panel_px[0] > 100);
}
