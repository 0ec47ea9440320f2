//! uavview - UAV image viewport
//!
//! A zoomable, pannable view of a UAV camera frame with a heading marker
//! drawn on the image and an info panel pinned to the viewport corner.
//! Rendering goes through the [`uavview_canvas::Painter`] trait, so the same
//! viewport can drive a software rasterizer or any host toolkit.

pub mod assets;
pub mod config;
pub mod constants;
pub mod context_menu;
pub mod error;
pub mod event;
pub mod frame;
pub mod marker;
pub mod overlay;
pub mod uav;
pub mod viewport;
pub mod zoom_math;

pub use assets::{AssetResolver, DirectoryAssets, EmbeddedAssets, FallbackAssets};
pub use config::{ConfigError, LogLevel, ViewportConfig};
pub use context_menu::{ContextMenu, MenuItem, ViewportAction};
pub use error::{Result, ViewportError};
pub use event::{CursorShape, EventOutcome, Modifiers, PointerButton, ViewportEvent};
pub use frame::{Mirror, RawFrame};
pub use marker::{MarkerIconCache, MarkerState};
pub use overlay::{DefaultOverlay, OverlayContent, OverlayFrame, OverlayRenderer, PanelStyle};
pub use uav::Uav;
pub use viewport::{DragState, ImageViewport, ScrollbarPolicy, ScrollbarVisibility};
pub use zoom_math::{ScaleBounds, ViewTransform};

pub use uavview_canvas as canvas;
