//! Input events delivered by the host and the outcome it gets back.

use uavview_canvas::{Point, Size};

use crate::context_menu::ContextMenu;

/// Input delivered to the viewport by its host toolkit.
#[derive(Debug, Clone)]
pub enum ViewportEvent {
    /// Pointer button pressed.
    PointerPressed { button: PointerButton, position: Point },
    /// Pointer button released.
    PointerReleased { button: PointerButton, position: Point },
    /// Pointer moved, with or without buttons held.
    PointerMoved { position: Point },
    /// Wheel scrolled. Positive `delta` zooms in.
    Wheel {
        delta: f32,
        position: Point,
        modifiers: Modifiers,
    },
    /// The viewport changed size. `old` is `None` on the first layout.
    Resized { old: Option<Size>, new: Size },
    /// The host asked for a context menu (usually a secondary click).
    ContextMenuRequested { position: Point },
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }
}

/// Cursor shape the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    /// Drag-to-pan in progress
    ClosedHand,
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, Default)]
pub struct EventOutcome {
    /// The event was used by the viewport
    pub consumed: bool,
    /// The viewport must be repainted
    pub repaint: bool,
    /// New cursor shape, if it changed
    pub cursor: Option<CursorShape>,
    /// Menu to pop up at the requested position
    pub context_menu: Option<ContextMenu>,
    /// Tooltip for the canvas point under the pointer
    pub tooltip: Option<String>,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn repaint() -> Self {
        Self {
            consumed: true,
            repaint: true,
            ..Self::default()
        }
    }
}
