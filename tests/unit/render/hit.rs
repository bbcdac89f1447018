use super::*;
use crate::scene::layer::{ShapeLayer, ShapeType, Transform};
use crate::scene::slide::SlideType;

fn shape(x: f64, y: f64, w: f64, h: f64, z: i32) -> Layer {
    let mut s = ShapeLayer::new(ShapeType::Rectangle);
    s.transform = Transform::new(x, y, w, h, z);
    Layer::Shape(s)
}

fn slide_with(layers: Vec<Layer>) -> Slide {
    let mut s = Slide::new(SlideType::Content, 1);
    s.layers.extend(layers);
    s
}

#[test]
fn empty_canvas_hits_nothing() {
    let s = slide_with(vec![]);
    assert!(hit_test(&s, Point::new(540.0, 540.0), 1.0).is_none());
}

#[test]
fn topmost_z_wins_regardless_of_list_order() {
    let top = shape(0.0, 0.0, 100.0, 100.0, 5);
    let top_id = top.id().to_owned();
    let s = slide_with(vec![top, shape(0.0, 0.0, 100.0, 100.0, 1)]);
    assert_eq!(hit_test(&s, Point::new(50.0, 50.0), 1.0).map(Layer::id), Some(top_id.as_str()));
}

#[test]
fn pointer_is_divided_by_zoom() {
    let l = shape(100.0, 100.0, 100.0, 100.0, 1);
    let id = l.id().to_owned();
    let s = slide_with(vec![l]);
    // Screen (75, 75) at zoom 0.5 is logical (150, 150).
    assert_eq!(hit_test(&s, Point::new(75.0, 75.0), 0.5).map(Layer::id), Some(id.as_str()));
    assert!(hit_test(&s, Point::new(75.0, 75.0), 1.0).is_none());
}

#[test]
fn hidden_layers_are_skipped() {
    let mut hidden = ShapeLayer::new(ShapeType::Rectangle);
    hidden.transform = Transform::new(0.0, 0.0, 100.0, 100.0, 9);
    hidden.visible = false;
    let under = shape(0.0, 0.0, 100.0, 100.0, 1);
    let under_id = under.id().to_owned();
    let s = slide_with(vec![Layer::Shape(hidden), under]);
    assert_eq!(hit_test(&s, Point::new(10.0, 10.0), 1.0).map(Layer::id), Some(under_id.as_str()));
}

#[test]
fn handle_boxes_keep_constant_screen_size() {
    let r = Rect::new(100.0, 100.0, 300.0, 200.0);
    let b1 = handle_box(ResizeHandle::Nw.position(r), 1.0, 10.0);
    let b2 = handle_box(ResizeHandle::Nw.position(r), 2.0, 10.0);
    assert_eq!(b1.width(), 10.0);
    assert_eq!(b2.width(), 5.0);
    assert_eq!(ResizeHandle::E.position(r), Point::new(300.0, 150.0));
    assert_eq!(handle_boxes(r, 1.0, 10.0).len(), 8);
}

#[test]
fn handle_at_finds_each_handle() {
    let r = Rect::new(100.0, 100.0, 300.0, 200.0);
    assert_eq!(handle_at(r, Point::new(103.0, 98.0), 1.0, 10.0), Some(ResizeHandle::Nw));
    assert_eq!(handle_at(r, Point::new(200.0, 204.0), 1.0, 10.0), Some(ResizeHandle::S));
    assert_eq!(handle_at(r, Point::new(300.0, 150.0), 1.0, 10.0), Some(ResizeHandle::E));
    assert_eq!(handle_at(r, Point::new(200.0, 150.0), 1.0, 10.0), None);
    // Screen (200, 200) at zoom 2 is logical (100, 100), the nw corner.
    assert_eq!(handle_at(r, Point::new(200.0, 200.0), 2.0, 10.0), Some(ResizeHandle::Nw));
}

#[test]
fn corners_win_over_edges_on_tiny_boxes() {
    let r = Rect::new(0.0, 0.0, 4.0, 4.0);
    assert_eq!(handle_at(r, Point::new(0.0, 0.0), 1.0, 10.0), Some(ResizeHandle::Nw));
}

#[test]
fn direction_letters() {
    assert!(ResizeHandle::Nw.moves_north() && ResizeHandle::Nw.moves_west());
    assert!(!ResizeHandle::N.moves_east() && !ResizeHandle::N.moves_west());
    assert!(ResizeHandle::Se.moves_south() && ResizeHandle::Se.moves_east());
    assert_eq!(ResizeHandle::Sw.as_str(), "sw");
}
