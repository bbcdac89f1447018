use super::*;

#[test]
fn premul_scales_channels_by_alpha() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
}

#[test]
fn opaque_premul_is_identity() {
    let c = Rgba8Premul::from_straight_rgba(12, 34, 56, 255);
    assert_eq!(c.to_array(), [12, 34, 56, 255]);
}

#[test]
fn canvas_rect_is_square() {
    let r = canvas_rect();
    assert_eq!(r.width(), CANVAS_SIZE);
    assert_eq!(r.height(), CANVAS_SIZE);
    assert_eq!(CANVAS_SIZE / f64::from(GRID_DIVISIONS), 54.0);
}
