//! The viewport's context menu.
//!
//! The host toolkit shows the menu; the viewport only describes its items
//! and performs the chosen action.

use uavview_canvas::Point;

/// Actions a menu item can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportAction {
    /// Fit the whole canvas into the viewport
    FitToView,
}

/// A menu entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Display label
    pub label: String,
    /// Action performed on activation
    pub action: ViewportAction,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: ViewportAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// A popup menu anchored at a viewport position.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub position: Point,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    /// The standard single-entry menu resetting the view.
    pub fn reset_view(position: Point, label: &str) -> Self {
        Self {
            position,
            items: vec![MenuItem::new(label, ViewportAction::FitToView)],
        }
    }

    /// Action of the item at `index`, if any.
    pub fn action_at(&self, index: usize) -> Option<ViewportAction> {
        self.items.get(index).map(|item| item.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_view_menu() {
        let menu = ContextMenu::reset_view(Point::new(3.0, 4.0), "Reset view");
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.items[0].label, "Reset view");
        assert_eq!(menu.action_at(0), Some(ViewportAction::FitToView));
        assert_eq!(menu.action_at(1), None);
    }
}
