use super::*;
use crate::render::text::ApproxMeasure;
use crate::scene::layer::{GradientKind, GradientStop, Transform};
use crate::scene::slide::SlideType;

fn shape(z: i32) -> ShapeLayer {
    let mut s = ShapeLayer::new(ShapeType::Rectangle);
    s.transform.z_index = z;
    s
}

fn compile(slide: &Slide, viewport: &Viewport) -> RenderPlan {
    compile_slide(slide, viewport, &mut ApproxMeasure)
}

#[test]
fn z_order_background_then_ascending() {
    let mut slide = Slide::new(SlideType::Content, 1);
    let bg_id = slide.layers[0].id().to_owned();
    let (a, b, c) = (shape(3), shape(1), shape(2));
    let ids = [b.id.clone(), c.id.clone(), a.id.clone()];
    slide.layers.insert(0, Layer::Shape(a));
    slide.layers.push(Layer::Shape(b));
    slide.layers.push(Layer::Shape(c));

    let plan = compile(&slide, &Viewport::export());
    assert_eq!(
        plan.layer_sequence(),
        vec![bg_id.as_str(), ids[0].as_str(), ids[1].as_str(), ids[2].as_str()]
    );
}

#[test]
fn hidden_layers_are_not_compiled() {
    let mut slide = Slide::new(SlideType::Content, 1);
    let mut s = shape(1);
    s.visible = false;
    slide.layers.push(Layer::Shape(s));
    assert_eq!(compile(&slide, &Viewport::export()).layer_sequence().len(), 1);
}

#[test]
fn export_has_no_overlays_editor_view_does() {
    let mut slide = Slide::new(SlideType::Content, 1);
    let s = shape(1);
    let sel = s.id.clone();
    slide.layers.push(Layer::Shape(s));

    let export = compile(&slide, &Viewport::export());
    assert!(export.ops.iter().all(|op| op.layer_id().is_some()));
    assert_eq!((export.width, export.height, export.scale), (1080, 1080, 1.0));

    let editor = compile(&slide, &Viewport::editor(0.5, true, Some(sel)));
    assert_eq!((editor.width, editor.height), (540, 540));
    let overlays = editor.ops.iter().filter(|op| op.layer_id().is_none()).count();
    // 19 grid positions × 2 directions, selection outline, 8 handles × (fill + border).
    assert_eq!(overlays, 19 * 2 + 1 + 16);
}

#[test]
fn selection_of_background_draws_nothing() {
    let slide = Slide::new(SlideType::Content, 1);
    let bg = slide.layers[0].id().to_owned();
    let plan = compile(&slide, &Viewport::editor(1.0, false, Some(bg)));
    assert!(plan.ops.iter().all(|op| op.layer_id().is_some()));
}

#[test]
fn gradient_background_emits_gradient_op() {
    let mut slide = Slide::new(SlideType::Content, 1);
    if let Some(bg) = slide.background_mut() {
        bg.background_type = BackgroundType::Gradient;
        bg.gradient = Some(Gradient {
            kind: GradientKind::Radial,
            angle: 0.0,
            stops: vec![
                GradientStop { color: Color::WHITE, position: 0.0 },
                GradientStop { color: Color::BLACK, position: 100.0 },
            ],
        });
    }
    let plan = compile(&slide, &Viewport::export());
    assert!(matches!(plan.ops[0], DrawOp::Gradient { .. }));
}

#[test]
fn image_background_paints_color_then_image() {
    let mut slide = Slide::new(SlideType::Content, 1);
    if let Some(bg) = slide.background_mut() {
        bg.background_type = BackgroundType::Image;
        bg.image_url = Some("bg.png".into());
        bg.image_opacity = 0.5;
    }
    let plan = compile(&slide, &Viewport::export());
    assert!(matches!(plan.ops[0], DrawOp::FillPath { .. }));
    match &plan.ops[1] {
        DrawOp::Image { fit, opacity, dest, .. } => {
            assert_eq!(*fit, ImageFit::Cover);
            assert_eq!(*opacity, 0.5);
            assert_eq!(*dest, canvas_rect());
        }
        other => panic!("expected image op, got {other:?}"),
    }
    assert_eq!(plan.image_urls(), vec!["bg.png"]);
}

#[test]
fn circle_is_centered_with_min_radius() {
    let mut slide = Slide::new(SlideType::Content, 1);
    let mut c = ShapeLayer::new(ShapeType::Circle);
    c.transform = Transform::new(0.0, 0.0, 200.0, 100.0, 1);
    slide.layers.push(Layer::Shape(c));
    let plan = compile(&slide, &Viewport::export());
    let DrawOp::FillPath { path, .. } = &plan.ops[1] else {
        panic!("expected circle fill");
    };
    let bb = path.bounding_box();
    assert!((bb.x0 - 50.0).abs() < 0.5 && (bb.x1 - 150.0).abs() < 0.5);
    assert!((bb.y0 - 0.0).abs() < 0.5 && (bb.y1 - 100.0).abs() < 0.5);
}

#[test]
fn line_is_stroked_between_corners() {
    let mut slide = Slide::new(SlideType::Content, 1);
    let mut l = ShapeLayer::new(ShapeType::Line);
    l.transform = Transform::new(100.0, 100.0, 200.0, 0.0, 1);
    l.stroke_width = 10.0;
    slide.layers.push(Layer::Shape(l));
    let plan = compile(&slide, &Viewport::export());
    assert_eq!(plan.ops.len(), 2);
    let DrawOp::FillPath { path, .. } = &plan.ops[1] else {
        panic!("expected stroke");
    };
    let bb = path.bounding_box();
    assert!((bb.x0 - 100.0).abs() < 0.5 && (bb.x1 - 300.0).abs() < 0.5);
    assert!((bb.y0 - 95.0).abs() < 0.5 && (bb.y1 - 105.0).abs() < 0.5);
}

#[test]
fn rotation_and_opacity_flow_into_ops() {
    let mut slide = Slide::new(SlideType::Content, 1);
    let mut s = shape(1);
    s.transform.rotation = Some(45.0);
    s.transform.opacity = Some(0.25);
    slide.layers.push(Layer::Shape(s));
    let plan = compile(&slide, &Viewport::export());
    let DrawOp::FillPath { transform, opacity, .. } = &plan.ops[1] else {
        panic!("expected fill");
    };
    assert_ne!(*transform, Affine::IDENTITY);
    assert_eq!(*opacity, 0.25);
}

#[test]
fn empty_text_is_skipped() {
    let mut slide = Slide::new(SlideType::Content, 1);
    slide.layers.push(Layer::Text(TextLayer::new("   ")));
    slide.layers.push(Layer::Text(TextLayer::new("Hi")));
    let plan = compile(&slide, &Viewport::export());
    assert_eq!(plan.layer_sequence().len(), 2);
}
