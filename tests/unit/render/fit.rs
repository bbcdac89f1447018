use super::*;

fn approx(a: Rect, b: Rect) -> bool {
    (a.x0 - b.x0).abs() < 1e-9
        && (a.y0 - b.y0).abs() < 1e-9
        && (a.x1 - b.x1).abs() < 1e-9
        && (a.y1 - b.y1).abs() < 1e-9
}

#[test]
fn cover_crops_wide_image_centered() {
    let dest = Rect::new(0.0, 0.0, 100.0, 100.0);
    let p = fit_image(ImageFit::Cover, dest, 200, 100);
    assert!(approx(p.draw, Rect::new(-50.0, 0.0, 150.0, 100.0)));
    assert_eq!(p.clip, dest);
}

#[test]
fn contain_letterboxes_wide_image() {
    let dest = Rect::new(10.0, 10.0, 110.0, 110.0);
    let p = fit_image(ImageFit::Contain, dest, 200, 100);
    assert!(approx(p.draw, Rect::new(10.0, 35.0, 110.0, 85.0)));
}

#[test]
fn fill_stretches() {
    let dest = Rect::new(0.0, 0.0, 300.0, 50.0);
    assert_eq!(fit_image(ImageFit::Fill, dest, 7, 9).draw, dest);
}
