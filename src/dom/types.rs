//! Geometry and rendering-state value types shared by the document contract

use serde::{Deserialize, Serialize};

/// A rectangle in some coordinate space (client, page or anchor-relative)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// A rectangle with neither width nor height renders nothing
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Check whether two rectangles touch or overlap.
    ///
    /// Edges that merely touch count as intersecting, so zero-size boxes
    /// sitting on the boundary of a window are kept.
    pub fn touches(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.bottom() < other.y
            || self.x > other.right()
            || self.y > other.bottom())
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Move the rectangle by the given deltas
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Width and height of a scrollable or offset box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The window a document is rendered into
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub inner_width: f64,
    pub inner_height: f64,
}

impl Viewport {
    pub fn new(inner_width: f64, inner_height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            inner_width,
            inner_height,
        }
    }

    /// Set the scroll position
    pub fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// The currently visible part of the page, in page coordinates
    pub fn visible_window(&self) -> Rect {
        Rect::new(
            self.scroll_x,
            self.scroll_y,
            self.inner_width,
            self.inner_height,
        )
    }
}

/// Computed `position` of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    /// Whether the node starts a new positioning context for its descendants
    pub fn establishes_context(self) -> bool {
        matches!(
            self,
            Position::Relative | Position::Absolute | Position::Fixed
        )
    }
}

/// Computed `overflow` of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Scroll,
    Auto,
}

impl Overflow {
    /// Whether a box with this overflow scrolls its own content
    pub fn scrolls(self) -> bool {
        matches!(self, Overflow::Hidden | Overflow::Scroll | Overflow::Auto)
    }
}

/// Loading state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadyState {
    Loading,
    Interactive,
    #[default]
    Complete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_count_as_intersection() {
        let window = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(Rect::new(800.0, 600.0, 0.0, 0.0).touches(&window));
        assert!(Rect::new(-10.0, -10.0, 10.0, 10.0).touches(&window));
        assert!(!Rect::new(0.0, 601.0, 10.0, 10.0).touches(&window));
        assert!(!Rect::new(-20.0, 0.0, 10.0, 10.0).touches(&window));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 20.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 25.0));
    }

    #[test]
    fn only_overflowing_modes_scroll() {
        assert!(Overflow::Auto.scrolls());
        assert!(Overflow::Hidden.scrolls());
        assert!(!Overflow::Visible.scrolls());
        assert!(!Overflow::Clip.scrolls());
    }
}
