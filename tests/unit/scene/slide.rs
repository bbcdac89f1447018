use std::collections::HashSet;

use serde_json::json;

use super::*;
use crate::scene::layer::{ShapeLayer, ShapeType};

fn shape_at(z: i32) -> Layer {
    let mut s = ShapeLayer::new(ShapeType::Rectangle);
    s.transform.z_index = z;
    Layer::Shape(s)
}

#[test]
fn new_slide_has_single_background() {
    let s = Slide::new(SlideType::Hook, 1);
    assert_eq!(s.layers.len(), 1);
    assert_eq!(s.background().map(|b| b.color), Some(Color::BLACK));
    assert!(s.id.starts_with("slide_"));
    assert_eq!(s.next_z_index(), 1);
}

#[test]
fn paint_order_background_first_then_ascending_z() {
    let mut s = Slide::new(SlideType::Content, 1);
    let bg_id = s.layers[0].id().to_owned();
    // Background deliberately not first in the list.
    s.layers.insert(0, shape_at(3));
    s.layers.push(shape_at(1));
    s.layers.push(shape_at(2));
    let order: Vec<Option<i32>> = s.paint_order().iter().map(|l| l.z_index()).collect();
    assert_eq!(order, vec![None, Some(1), Some(2), Some(3)]);
    assert_eq!(s.paint_order()[0].id(), bg_id);
}

#[test]
fn paint_order_is_stable_on_ties() {
    let mut s = Slide::new(SlideType::Content, 1);
    let a = shape_at(1);
    let b = shape_at(1);
    let (ida, idb) = (a.id().to_owned(), b.id().to_owned());
    s.layers.push(a);
    s.layers.push(b);
    let order = s.paint_order();
    assert_eq!(order[1].id(), ida);
    assert_eq!(order[2].id(), idb);
}

#[test]
fn duplicate_shares_no_ids() {
    let mut s = Slide::new(SlideType::Content, 1);
    s.layers.push(shape_at(1));
    let d = s.duplicate();
    assert_ne!(d.id, s.id);
    assert_eq!(d.layers.len(), s.layers.len());
    let ids: HashSet<&str> = s.layers.iter().map(Layer::id).collect();
    assert!(d.layers.iter().all(|l| !ids.contains(l.id())));
}

#[test]
fn legacy_slide_migrates_to_layer_stack() {
    let legacy: Vec<LegacySlide> = serde_json::from_value(json!([
        {"slideNumber": 2, "slideType": "content", "content": "Body"},
        {"slideNumber": 1, "slideType": "hook", "title": "Hook!", "backgroundColor": "#112233"}
    ]))
    .unwrap();
    let slides = migrate_legacy(&legacy);
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].slide_type, SlideType::Hook);
    assert_eq!(slides[0].slide_number, 1);
    assert_eq!(
        slides[0].background().map(|b| b.color),
        Some(Color::rgb(0x11, 0x22, 0x33))
    );
    match &slides[0].layers[1] {
        Layer::Text(t) => {
            assert_eq!(t.content, "Hook!");
            assert_eq!(t.style.color, Color::WHITE);
            assert_eq!(t.transform.z_index, 1);
        }
        other => panic!("expected title text, got {other:?}"),
    }
    assert_eq!(slides[1].layers.len(), 2);
}

#[test]
fn slide_json_uses_camel_case_and_defaults_timestamps() {
    let s: Slide = serde_json::from_value(json!({
        "id": "s1",
        "slideNumber": 1,
        "slideType": "cta",
        "layers": [{"type": "background", "id": "bg"}]
    }))
    .unwrap();
    assert!(!s.is_edited);
    assert_eq!(s.background().map(|b| b.color), Some(Color::WHITE));
    let v = serde_json::to_value(&s).unwrap();
    assert!(v.get("createdAt").is_some());
    assert_eq!(v["slideType"], json!("cta"));
}
