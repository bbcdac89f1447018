use crate::scene::color::Color;
use crate::scene::layer::{Gradient, GradientKind, GradientStop};

/// Color at offset `t` in `[0, 1]` along sorted `stops` (positions in percent).
///
/// Before the first stop the first color holds, after the last stop the last color holds.
pub fn sample_stops(stops: &[GradientStop], t: f64) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    let pos = |s: &GradientStop| (s.position / 100.0).clamp(0.0, 1.0);
    if t <= pos(first) {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (pa, pb) = (pos(a), pos(b));
        if t <= pb {
            if pb - pa <= f64::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (t - pa) / (pb - pa));
        }
    }
    stops.last().map_or(first.color, |s| s.color)
}

/// Rasterise `gradient` into a `w × h` premultiplied RGBA8 buffer spanning the whole buffer.
///
/// Linear gradients follow the CSS convention: direction `(cos(θ-90°), sin(θ-90°))` through
/// the centre, with the gradient line long enough that the corners hit offsets 0 and 1.
/// Radial gradients run from the centre out to `max(w, h) / 2`.
pub fn rasterize_gradient(gradient: &Gradient, w: u32, h: u32) -> Vec<u8> {
    let mut stops = gradient.stops.clone();
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));

    let (wf, hf) = (f64::from(w), f64::from(h));
    let (cx, cy) = (wf / 2.0, hf / 2.0);
    let rad = (gradient.angle - 90.0).to_radians();
    let (dx, dy) = (rad.cos(), rad.sin());
    let line_len = (wf * dx).abs() + (hf * dy).abs();
    let radius = wf.max(hf) / 2.0;

    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    for y in 0..h {
        let py = f64::from(y) + 0.5 - cy;
        for x in 0..w {
            let px = f64::from(x) + 0.5 - cx;
            let t = match gradient.kind {
                GradientKind::Linear if line_len > 0.0 => (px * dx + py * dy) / line_len + 0.5,
                GradientKind::Linear => 0.0,
                GradientKind::Radial if radius > 0.0 => (px * px + py * py).sqrt() / radius,
                GradientKind::Radial => 0.0,
            };
            let c = sample_stops(&stops, t.clamp(0.0, 1.0)).to_premul();
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&c.to_array());
        }
    }
    bytes
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
