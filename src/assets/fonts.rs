use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use crate::foundation::error::{SlideError, SlideResult};
use crate::render::text::{ApproxMeasure, TextMeasure};
use crate::scene::layer::{FontWeight, TextStyle};

#[derive(Clone)]
struct RegisteredFace {
    weight: FontWeight,
    /// Family name as reported by the font collection.
    family_name: String,
    data: vello_cpu::peniko::FontData,
}

/// One glyph positioned relative to the line layout's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlacedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// A single shaped line, ready for `vello_cpu::RenderContext::glyph_run`.
#[derive(Clone)]
pub(crate) struct ShapedLine {
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) font_size: f32,
    pub(crate) glyphs: Vec<PlacedGlyph>,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

/// Registered font faces plus the Parley contexts used to shape and measure with them.
///
/// Faces are looked up by family name (case-insensitive) and the closest registered weight.
/// A family without faces of its own uses the first family registered; with nothing
/// registered, text is measured with [`ApproxMeasure`] and not painted.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: HashMap<String, Vec<RegisteredFace>>,
    fallback: Option<String>,
    warned_missing: std::collections::HashSet<String>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Empty font book.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
            fallback: None,
            warned_missing: std::collections::HashSet::new(),
        }
    }

    /// Register a font file's bytes as `weight`. Returns the family name it registered under.
    pub fn register(&mut self, bytes: Vec<u8>, weight: FontWeight) -> SlideResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SlideError::decode("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SlideError::decode("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        let key = family_name.to_lowercase();
        self.fallback.get_or_insert_with(|| key.clone());
        let faces = self.faces.entry(key).or_default();
        faces.retain(|f| f.weight != weight);
        faces.push(RegisteredFace {
            weight,
            family_name: family_name.clone(),
            data,
        });
        tracing::debug!(family = %family_name, weight = weight.0, "font registered");
        Ok(family_name)
    }

    /// Read and register a font file.
    pub fn register_file(&mut self, path: &Path, weight: FontWeight) -> SlideResult<String> {
        let bytes = std::fs::read(path).map_err(|e| {
            SlideError::decode(format!("failed to read font '{}': {e}", path.display()))
        })?;
        self.register(bytes, weight)
    }

    /// Whether any face is registered for `family`.
    pub fn has_family(&self, family: &str) -> bool {
        self.faces.contains_key(&family.to_lowercase())
    }

    /// Registered weights for `family`, ascending.
    pub fn weights(&self, family: &str) -> Vec<FontWeight> {
        let mut out: Vec<FontWeight> = self
            .faces
            .get(&family.to_lowercase())
            .map(|v| v.iter().map(|f| f.weight).collect())
            .unwrap_or_default();
        out.sort();
        out
    }

    /// Family painted in place of unregistered ones, if any font is registered.
    pub fn fallback_family(&self) -> Option<&str> {
        let key = self.fallback.as_ref()?;
        self.faces.get(key)?.first().map(|f| f.family_name.as_str())
    }

    fn resolve(&self, family: &str, weight: FontWeight) -> Option<&RegisteredFace> {
        let faces = self
            .faces
            .get(&family.to_lowercase())
            .or_else(|| self.fallback.as_ref().and_then(|key| self.faces.get(key)))?;
        closest_weight(faces.iter().map(|f| f.weight), weight)
            .and_then(|w| faces.iter().find(|f| f.weight == w))
    }

    fn build_layout(
        &mut self,
        text: &str,
        style: &TextStyle,
        face_family: String,
        face_weight: FontWeight,
    ) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face_family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(
            style.font_size as f32,
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face_weight.0)),
        ));
        if let Some(spacing) = style.letter_spacing {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                spacing as f32,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Shape one line of text. `None` when no font is registered at all.
    pub(crate) fn shape_line(&mut self, text: &str, style: &TextStyle) -> Option<ShapedLine> {
        if !self.has_family(&style.font_family)
            && self.warned_missing.insert(style.font_family.to_lowercase())
        {
            match self.fallback_family() {
                Some(fallback) => tracing::warn!(
                    family = %style.font_family,
                    fallback,
                    "font family not registered; using fallback"
                ),
                None => tracing::warn!(
                    family = %style.font_family,
                    "no font registered; text not painted"
                ),
            }
        }
        let face = self.resolve(&style.font_family, style.font_weight)?.clone();

        let layout = self.build_layout(text, style, face.family_name, face.weight);
        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Some(ShapedLine {
            font: face.data,
            font_size: style.font_size as f32,
            glyphs,
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
        })
    }
}

impl TextMeasure for FontBook {
    fn measure(&mut self, text: &str, style: &TextStyle) -> f64 {
        match self.resolve(&style.font_family, style.font_weight) {
            Some(face) => {
                let (family, weight) = (face.family_name.clone(), face.weight);
                f64::from(self.build_layout(text, style, family, weight).width())
            }
            None => ApproxMeasure.measure(text, style),
        }
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.faces.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Closest available weight to `wanted`; ties go to the heavier face.
pub fn closest_weight(
    available: impl IntoIterator<Item = FontWeight>,
    wanted: FontWeight,
) -> Option<FontWeight> {
    available.into_iter().min_by_key(|w| {
        let d = (i32::from(w.0) - i32::from(wanted.0)).abs();
        (d, std::cmp::Reverse(w.0))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
