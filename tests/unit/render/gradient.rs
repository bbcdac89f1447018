use super::*;

fn stop(color: Color, position: f64) -> GradientStop {
    GradientStop { color, position }
}

fn px(buf: &[u8], w: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * w + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn sample_stops_clamps_and_interpolates() {
    let stops = vec![stop(Color::BLACK, 20.0), stop(Color::WHITE, 80.0)];
    assert_eq!(sample_stops(&stops, 0.0), Color::BLACK);
    assert_eq!(sample_stops(&stops, 1.0), Color::WHITE);
    assert_eq!(sample_stops(&stops, 0.5), Color::rgb(128, 128, 128));
    assert_eq!(sample_stops(&[], 0.5), Color::TRANSPARENT);
}

#[test]
fn linear_180_runs_top_to_bottom() {
    let g = Gradient {
        kind: GradientKind::Linear,
        angle: 180.0,
        stops: vec![stop(Color::BLACK, 0.0), stop(Color::WHITE, 100.0)],
    };
    let buf = rasterize_gradient(&g, 10, 100);
    let top = px(&buf, 10, 5, 0);
    let bottom = px(&buf, 10, 5, 99);
    assert!(top[0] < 5, "{top:?}");
    assert!(bottom[0] > 250, "{bottom:?}");
    // Constant along a row.
    assert_eq!(px(&buf, 10, 0, 50), px(&buf, 10, 9, 50));
}

#[test]
fn linear_90_runs_left_to_right() {
    let g = Gradient {
        kind: GradientKind::Linear,
        angle: 90.0,
        stops: vec![stop(Color::rgb(255, 0, 0), 0.0), stop(Color::rgb(0, 0, 255), 100.0)],
    };
    let buf = rasterize_gradient(&g, 100, 10);
    assert!(px(&buf, 100, 0, 5)[0] > 250);
    assert!(px(&buf, 100, 99, 5)[2] > 250);
}

#[test]
fn radial_is_center_out() {
    let g = Gradient {
        kind: GradientKind::Radial,
        angle: 0.0,
        stops: vec![stop(Color::WHITE, 0.0), stop(Color::BLACK, 100.0)],
    };
    let buf = rasterize_gradient(&g, 100, 100);
    assert!(px(&buf, 100, 50, 50)[0] > 250);
    assert!(px(&buf, 100, 0, 50)[0] < 5);
    assert_eq!(px(&buf, 100, 0, 0), [0, 0, 0, 255]);
}

#[test]
fn unsorted_stops_are_sorted() {
    let g = Gradient {
        kind: GradientKind::Linear,
        angle: 180.0,
        stops: vec![stop(Color::WHITE, 100.0), stop(Color::BLACK, 0.0)],
    };
    let buf = rasterize_gradient(&g, 1, 100);
    assert!(px(&buf, 1, 0, 0)[0] < 5);
}
