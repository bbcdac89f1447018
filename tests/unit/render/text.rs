use super::*;
use crate::scene::layer::Transform;

/// Every character advances by 10 units.
struct FixedAdvance;

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, text: &str, _style: &TextStyle) -> f64 {
        text.chars().count() as f64 * 10.0
    }
}

fn text_layer(content: &str, width: f64) -> TextLayer {
    let mut t = TextLayer::new(content);
    t.transform = Transform::new(100.0, 100.0, width, 400.0, 1);
    t
}

#[test]
fn wraps_two_words_per_line() {
    let style = TextStyle::default();
    let lines = wrap_text("a b c d e f g h", 30.0, &style, &mut FixedAdvance);
    assert_eq!(lines, vec!["a b", "c d", "e f", "g h"]);
}

#[test]
fn max_lines_with_ellipsis_truncates() {
    let mut layer = text_layer("a b c d e f g h", 30.0);
    layer.max_lines = Some(2);
    layer.overflow = Some(TextOverflow::Ellipsis);
    let block = layout_text_block(&layer, &mut FixedAdvance);
    let texts: Vec<&str> = block.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], "a b");
    assert!(texts[1].ends_with("..."));
}

#[test]
fn max_lines_without_ellipsis_just_drops() {
    let lines = vec!["one".to_owned(), "two".to_owned(), "three".to_owned()];
    assert_eq!(
        limit_lines(lines.clone(), Some(2), Some(TextOverflow::Hidden)),
        vec!["one", "two"]
    );
    assert_eq!(limit_lines(lines.clone(), Some(5), None), lines);
    assert_eq!(limit_lines(lines.clone(), Some(0), None), lines);
}

#[test]
fn ellipsis_is_char_aware() {
    let lines = vec!["héllo wörld".to_owned(), "x".to_owned()];
    let out = limit_lines(lines, Some(1), Some(TextOverflow::Ellipsis));
    assert_eq!(out, vec!["héllo wö..."]);
}

#[test]
fn long_word_stays_on_its_own_line() {
    let style = TextStyle::default();
    let lines = wrap_text("a enormous b", 30.0, &style, &mut FixedAdvance);
    assert_eq!(lines, vec!["a", "enormous", "b"]);
}

#[test]
fn newline_forces_break() {
    let style = TextStyle::default();
    let lines = wrap_text("a\nb c", 1000.0, &style, &mut FixedAdvance);
    assert_eq!(lines, vec!["a", "b c"]);
}

#[test]
fn block_is_vertically_centred_with_line_pitch() {
    let mut layer = text_layer("a b c d", 30.0);
    layer.style.font_size = 50.0;
    layer.style.line_height = Some(1.2);
    let block = layout_text_block(&layer, &mut FixedAdvance);
    assert_eq!(block.lines.len(), 2);
    assert!((block.pitch - 60.0).abs() < 1e-9);
    // y + (h - n*pitch)/2 = 100 + (400 - 120)/2
    assert!((block.lines[0].top - 240.0).abs() < 1e-9);
    assert!((block.lines[1].top - 300.0).abs() < 1e-9);
    assert!((block.lines[0].center_y - 270.0).abs() < 1e-9);
}

#[test]
fn anchor_follows_alignment() {
    let mut layer = text_layer("a", 200.0);
    layer.style.text_align = TextAlign::Left;
    assert_eq!(layout_text_block(&layer, &mut FixedAdvance).lines[0].anchor_x, 100.0);
    layer.style.text_align = TextAlign::Center;
    assert_eq!(layout_text_block(&layer, &mut FixedAdvance).lines[0].anchor_x, 200.0);
    layer.style.text_align = TextAlign::Right;
    assert_eq!(layout_text_block(&layer, &mut FixedAdvance).lines[0].anchor_x, 300.0);

    assert_eq!(line_left(TextAlign::Right, 300.0, 40.0), 260.0);
    assert_eq!(line_left(TextAlign::Center, 200.0, 40.0), 180.0);
}

#[test]
fn text_transform_variants() {
    assert_eq!(
        apply_text_transform("hello big world", Some(TextTransform::Capitalize)),
        "Hello Big World"
    );
    assert_eq!(apply_text_transform("Ab", Some(TextTransform::Uppercase)), "AB");
    assert_eq!(apply_text_transform("Ab", Some(TextTransform::Lowercase)), "ab");
    assert_eq!(apply_text_transform("Ab", None), "Ab");
}

#[test]
fn uppercase_is_applied_before_wrapping() {
    let mut layer = text_layer("ab cd", 1000.0);
    layer.style.text_transform = Some(TextTransform::Uppercase);
    let block = layout_text_block(&layer, &mut FixedAdvance);
    assert_eq!(block.lines[0].text, "AB CD");
}

#[test]
fn approx_measure_grows_with_size_and_spacing() {
    let mut style = TextStyle::default();
    let base = ApproxMeasure.measure("Hello", &style);
    style.font_size *= 2.0;
    assert!(ApproxMeasure.measure("Hello", &style) > base * 1.9);
    style.letter_spacing = Some(5.0);
    let spaced = ApproxMeasure.measure("Hello", &style);
    style.letter_spacing = None;
    assert!((spaced - ApproxMeasure.measure("Hello", &style) - 25.0).abs() < 1e-9);
}
