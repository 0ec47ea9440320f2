//! Default values for the image viewport.

/// Scale multiplier per wheel notch
pub const DEFAULT_ZOOM_FACTOR: f32 = 1.15;

/// Scale multiplier per wheel notch while Ctrl is held
pub const DEFAULT_ZOOM_CTRL_FACTOR: f32 = 1.01;

/// Smallest allowed view scale
pub const DEFAULT_MIN_SCALE: f32 = 0.01;

/// Largest allowed view scale
pub const DEFAULT_MAX_SCALE: f32 = 100.0;

/// Thickness reserved by a visible scrollbar, in viewport pixels
pub const DEFAULT_SCROLLBAR_EXTENT: f32 = 12.0;

/// Marker icon is scaled to fit a square of this many canvas pixels
pub const DEFAULT_MARKER_SIZE: u32 = 100;

/// Asset name of the marker icon
pub const DEFAULT_MARKER_ASSET: &str = "uav.svg";

/// Directory searched for assets before the built-in ones
pub const DEFAULT_ASSET_DIR: &str = "images";

/// Label of the context menu entry that fits the image
pub const RESET_VIEW_LABEL: &str = "Reset view";

/// Viewport background
pub const BACKGROUND_RGBA: [u8; 4] = [30, 30, 34, 255];

/// Info panel geometry in viewport pixels (x, y, width, height)
pub const PANEL_RECT: [f32; 4] = [20.0, 20.0, 190.0, 90.0];

pub const PANEL_CORNER_RADIUS: f32 = 10.0;

pub const PANEL_OPACITY: f32 = 0.5;

pub const PANEL_TEXT_SIZE: f32 = 15.0;

/// Text offset from the panel's top-left corner
pub const PANEL_TEXT_INSET: [f32; 2] = [5.0, 5.0];
