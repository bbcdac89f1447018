//! Text preparation: case transform, greedy word wrap, line limits and block placement.
//!
//! Everything here works in logical units and is independent of the raster backend; glyph
//! shaping happens later in [`crate::render::cpu`].

use crate::scene::layer::{TextAlign, TextLayer, TextOverflow, TextStyle, TextTransform};

/// Measures the advance width of a single line of text.
pub trait TextMeasure {
    /// Width of `text` laid out on one line with `style`, in logical units.
    fn measure(&mut self, text: &str, style: &TextStyle) -> f64;
}

/// Font-free approximation of proportional sans-serif advances.
///
/// Used when no face is registered for a family so that wrapping still behaves plausibly.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMeasure;

impl ApproxMeasure {
    fn advance_em(c: char) -> f64 {
        match c {
            ' ' => 0.28,
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.27,
            'f' | 't' | 'r' | '(' | ')' | '-' => 0.36,
            'm' | 'w' => 0.82,
            'M' | 'W' => 0.9,
            c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.64,
            _ => 0.54,
        }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure(&mut self, text: &str, style: &TextStyle) -> f64 {
        let bold = if style.font_weight.0 >= 600 { 1.05 } else { 1.0 };
        let spacing = style.letter_spacing.unwrap_or(0.0);
        text.chars()
            .map(|c| Self::advance_em(c) * style.font_size * bold + spacing)
            .sum()
    }
}

/// Apply a case transformation to a copy of `content`.
pub fn apply_text_transform(content: &str, transform: Option<TextTransform>) -> String {
    match transform.unwrap_or_default() {
        TextTransform::None => content.to_owned(),
        TextTransform::Uppercase => content.to_uppercase(),
        TextTransform::Lowercase => content.to_lowercase(),
        TextTransform::Capitalize => {
            let mut out = String::with_capacity(content.len());
            let mut at_word_start = true;
            for c in content.chars() {
                if at_word_start && c.is_alphabetic() {
                    out.extend(c.to_uppercase());
                    at_word_start = false;
                } else {
                    out.push(c);
                    if c.is_whitespace() {
                        at_word_start = true;
                    } else if c.is_alphanumeric() {
                        at_word_start = false;
                    }
                }
            }
            out
        }
    }
}

/// Greedy word wrap.
///
/// Words are separated by single spaces; `\n` starts a new paragraph. A word is appended to
/// the current line unless the resulting test line measures wider than `max_width`, in which
/// case the current line is emitted first. A single word wider than the box stays on its
/// own line.
pub fn wrap_text(
    text: &str,
    max_width: f64,
    style: &TextStyle,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ') {
            let test = if line.is_empty() {
                word.to_owned()
            } else {
                format!("{line} {word}")
            };
            if !line.is_empty() && measure.measure(&test, style) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_owned()));
            } else {
                line = test;
            }
        }
        lines.push(line);
    }
    lines
}

/// Apply a `maxLines` limit. Under [`TextOverflow::Ellipsis`] the last kept line loses its
/// final three characters in favour of `...`. A limit of zero means no limit.
pub fn limit_lines(
    mut lines: Vec<String>,
    max_lines: Option<u32>,
    overflow: Option<TextOverflow>,
) -> Vec<String> {
    let Some(max) = max_lines.map(|m| m as usize).filter(|&m| m > 0) else {
        return lines;
    };
    if lines.len() <= max {
        return lines;
    }
    lines.truncate(max);
    if overflow == Some(TextOverflow::Ellipsis)
        && let Some(last) = lines.last_mut()
    {
        let keep = last.chars().count().saturating_sub(3);
        let mut cut: String = last.chars().take(keep).collect();
        cut.push_str("...");
        *last = cut;
    }
    lines
}

/// One placed line of a text block.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Line content after transform, wrap and truncation.
    pub text: String,
    /// Horizontal anchor; its meaning follows [`TextBlock::align`].
    pub anchor_x: f64,
    /// Top of the line box.
    pub top: f64,
    /// Vertical middle of the line box.
    pub center_y: f64,
    /// Measured advance width.
    pub width: f64,
}

/// A text layer laid out into lines, vertically centred in its box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    /// Lines top to bottom.
    pub lines: Vec<TextLine>,
    /// Distance between consecutive line tops.
    pub pitch: f64,
    /// Horizontal anchoring.
    pub align: TextAlign,
}

impl TextBlock {
    /// Total height of all line boxes.
    pub fn height(&self) -> f64 {
        self.pitch * self.lines.len() as f64
    }
}

/// Lay out a text layer: transform, wrap to the box width, limit lines, centre vertically.
pub fn layout_text_block(layer: &TextLayer, measure: &mut dyn TextMeasure) -> TextBlock {
    let style = &layer.style;
    let t = &layer.transform;
    let content = apply_text_transform(&layer.content, style.text_transform);
    let lines = wrap_text(&content, t.width, style, measure);
    let lines = limit_lines(lines, layer.max_lines, layer.overflow);

    let pitch = style.line_pitch();
    let start_y = t.y + (t.height - pitch * lines.len() as f64) / 2.0;
    let anchor_x = match style.text_align {
        TextAlign::Left => t.x,
        TextAlign::Center => t.x + t.width / 2.0,
        TextAlign::Right => t.x + t.width,
    };

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let top = start_y + pitch * i as f64;
            let width = measure.measure(&text, style);
            TextLine {
                text,
                anchor_x,
                top,
                center_y: top + pitch / 2.0,
                width,
            }
        })
        .collect();

    TextBlock {
        lines,
        pitch,
        align: style.text_align,
    }
}

/// Left edge of a line of `width` anchored at `anchor_x`.
pub fn line_left(align: TextAlign, anchor_x: f64, width: f64) -> f64 {
    match align {
        TextAlign::Left => anchor_x,
        TextAlign::Center => anchor_x - width / 2.0,
        TextAlign::Right => anchor_x - width,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
