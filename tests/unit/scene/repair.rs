use super::*;
use crate::scene::color::Color;
use crate::scene::layer::{ShapeLayer, ShapeType};

#[test]
fn clean_list_is_untouched() {
    let slides = vec![Slide::new(SlideType::Hook, 1), Slide::new(SlideType::Cta, 2)];
    let (out, report) = repair_slides(slides.clone());
    assert!(report.is_clean());
    assert_eq!(out, slides);
    assert!(validate_slides(&out).is_ok());
}

#[test]
fn injects_missing_background_and_drops_extras() {
    let mut missing = Slide::new(SlideType::Content, 1);
    missing.layers.clear();
    missing
        .layers
        .push(Layer::Shape(ShapeLayer::new(ShapeType::Circle)));

    let mut doubled = Slide::new(SlideType::Content, 2);
    let first_bg = doubled.layers[0].id().to_owned();
    doubled
        .layers
        .push(Layer::Background(BackgroundLayer::solid(Color::BLACK)));

    assert!(validate_slides(&[missing.clone(), doubled.clone()]).is_err());

    let (out, report) = repair_slides(vec![missing, doubled]);
    assert_eq!(report.injected_backgrounds, 1);
    assert_eq!(report.dropped_backgrounds, 1);
    assert!(out[0].layers[0].is_background());
    assert_eq!(out[0].background().map(|b| b.color), Some(Color::WHITE));
    assert_eq!(out[1].background().map(|b| b.id.as_str()), Some(first_bg.as_str()));
    assert!(validate_slides(&out).is_ok());
}

#[test]
fn regenerates_duplicate_ids_and_renumbers() {
    let a = Slide::new(SlideType::Content, 7);
    let mut b = a.clone();
    b.slide_number = 7;
    let (out, report) = repair_slides(vec![a, b]);
    // One slide id plus every layer id of the copy.
    assert_eq!(report.regenerated_ids, 2);
    assert!(report.renumbered);
    assert_ne!(out[0].id, out[1].id);
    assert_ne!(out[0].layers[0].id(), out[1].layers[0].id());
    assert_eq!(out[0].slide_number, 1);
    assert_eq!(out[1].slide_number, 2);
}

#[test]
fn empty_list_gets_a_slide() {
    let (out, report) = repair_slides(Vec::new());
    assert!(report.injected_slide);
    assert_eq!(out.len(), 1);
    assert!(validate_slides(&[]).is_err());
}
