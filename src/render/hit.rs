//! Pointer queries against a slide: layer hit-testing and selection handle geometry.
//!
//! Pointer coordinates arrive in screen pixels and are divided by `zoom` to reach the
//! logical canvas. Rotation is ignored; hit boxes are the unrotated transform rectangles.

use crate::foundation::core::{Point, Rect};
use crate::scene::layer::Layer;
use crate::scene::slide::Slide;

/// Screen point to logical canvas point.
pub fn to_logical(screen: Point, zoom: f64) -> Point {
    let z = if zoom > 0.0 { zoom } else { 1.0 };
    Point::new(screen.x / z, screen.y / z)
}

fn contains_inclusive(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

/// Topmost visible non-background layer under the screen point, if any.
///
/// Layers are tried in descending zIndex; among equal zIndex the later list entry is on top,
/// mirroring paint order. The background never hits.
pub fn hit_test(slide: &Slide, screen: Point, zoom: f64) -> Option<&Layer> {
    let p = to_logical(screen, zoom);
    slide
        .paint_order()
        .into_iter()
        .rev()
        .filter(|l| l.is_visible())
        .find(|l| l.transform().is_some_and(|t| contains_inclusive(t.rect(), p)))
}

/// One of the eight resize handles of a selection box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// Top-left corner.
    Nw,
    /// Top edge midpoint.
    N,
    /// Top-right corner.
    Ne,
    /// Right edge midpoint.
    E,
    /// Bottom-right corner.
    Se,
    /// Bottom edge midpoint.
    S,
    /// Bottom-left corner.
    Sw,
    /// Left edge midpoint.
    W,
}

impl ResizeHandle {
    /// Hit priority: corners before edges so small boxes stay resizable diagonally.
    pub const PRIORITY: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Se,
        ResizeHandle::Sw,
        ResizeHandle::N,
        ResizeHandle::E,
        ResizeHandle::S,
        ResizeHandle::W,
    ];

    /// Drags the top edge.
    pub fn moves_north(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::N | ResizeHandle::Ne)
    }

    /// Drags the bottom edge.
    pub fn moves_south(self) -> bool {
        matches!(self, ResizeHandle::Sw | ResizeHandle::S | ResizeHandle::Se)
    }

    /// Drags the left edge.
    pub fn moves_west(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::W | ResizeHandle::Sw)
    }

    /// Drags the right edge.
    pub fn moves_east(self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::E | ResizeHandle::Se)
    }

    /// Handle centre on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        let cx = (rect.x0 + rect.x1) / 2.0;
        let cy = (rect.y0 + rect.y1) / 2.0;
        match self {
            ResizeHandle::Nw => Point::new(rect.x0, rect.y0),
            ResizeHandle::N => Point::new(cx, rect.y0),
            ResizeHandle::Ne => Point::new(rect.x1, rect.y0),
            ResizeHandle::E => Point::new(rect.x1, cy),
            ResizeHandle::Se => Point::new(rect.x1, rect.y1),
            ResizeHandle::S => Point::new(cx, rect.y1),
            ResizeHandle::Sw => Point::new(rect.x0, rect.y1),
            ResizeHandle::W => Point::new(rect.x0, cy),
        }
    }

    /// CSS-style suffix (`"nw"`, `"e"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::Nw => "nw",
            ResizeHandle::N => "n",
            ResizeHandle::Ne => "ne",
            ResizeHandle::E => "e",
            ResizeHandle::Se => "se",
            ResizeHandle::S => "s",
            ResizeHandle::Sw => "sw",
            ResizeHandle::W => "w",
        }
    }
}

/// Logical-space square of a handle centred at `center` that renders `handle_px` wide on
/// screen at `zoom`.
pub fn handle_box(center: Point, zoom: f64, handle_px: f64) -> Rect {
    let half = handle_px / zoom.max(f64::EPSILON) / 2.0;
    Rect::new(center.x - half, center.y - half, center.x + half, center.y + half)
}

/// All eight handle boxes of `rect`, in [`ResizeHandle::PRIORITY`] order.
pub fn handle_boxes(rect: Rect, zoom: f64, handle_px: f64) -> Vec<(ResizeHandle, Rect)> {
    ResizeHandle::PRIORITY
        .iter()
        .map(|&h| (h, handle_box(h.position(rect), zoom, handle_px)))
        .collect()
}

/// Handle of `rect` under the screen point, if any.
pub fn handle_at(rect: Rect, screen: Point, zoom: f64, handle_px: f64) -> Option<ResizeHandle> {
    let p = to_logical(screen, zoom);
    handle_boxes(rect, zoom, handle_px)
        .into_iter()
        .find(|(_, b)| contains_inclusive(*b, p))
        .map(|(h, _)| h)
}

#[cfg(test)]
#[path = "../../tests/unit/render/hit.rs"]
mod tests;
