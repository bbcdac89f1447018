pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Side length of the logical slide canvas. Layer geometry is always expressed in this
/// square, whatever the on-screen zoom.
pub const CANVAS_SIZE: f64 = 1080.0;

/// Smallest width/height a resize drag may produce, in logical units.
pub const MIN_LAYER_SIZE: f64 = 20.0;

/// Screen-space side length of a selection handle, in pixels.
pub const HANDLE_SIZE_PX: f64 = 10.0;

/// Number of grid cells along one canvas edge.
pub const GRID_DIVISIONS: u32 = 20;

/// Logical canvas bounds `[0, CANVAS_SIZE]²`.
pub fn canvas_rect() -> Rect {
    Rect::new(0.0, 0.0, CANVAS_SIZE, CANVAS_SIZE)
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as a `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
