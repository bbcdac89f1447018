//! Structural repair of slide lists that arrive from outside the editor.

use std::collections::HashSet;

use crate::foundation::error::{SlideError, SlideResult};
use crate::foundation::ids::fresh_id;
use crate::scene::layer::{BackgroundLayer, Layer};
use crate::scene::slide::{Slide, SlideType, renumber};

/// What [`repair_slides`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// A default slide was added because the list was empty.
    pub injected_slide: bool,
    /// Slides that had no background and got a default one.
    pub injected_backgrounds: usize,
    /// Extra backgrounds removed (the first one per slide is kept).
    pub dropped_backgrounds: usize,
    /// Slide or layer ids replaced because they were empty or already used.
    pub regenerated_ids: usize,
    /// `slide_number` was not the dense `1..=len` sequence.
    pub renumbered: bool,
}

impl RepairReport {
    /// `true` when the input was already valid.
    pub fn is_clean(&self) -> bool {
        *self == RepairReport::default()
    }
}

/// Bring a slide list back to the document invariants.
///
/// Ensures at least one slide, exactly one background per slide, unique non-empty slide
/// ids and layer ids across the whole list, and dense 1-based numbering.
pub fn repair_slides(mut slides: Vec<Slide>) -> (Vec<Slide>, RepairReport) {
    let mut report = RepairReport::default();

    if slides.is_empty() {
        slides.push(Slide::new(SlideType::Hook, 1));
        report.injected_slide = true;
    }

    let mut slide_ids: HashSet<String> = HashSet::new();
    let mut layer_ids: HashSet<String> = HashSet::new();

    for slide in &mut slides {
        if slide.id.is_empty() || !slide_ids.insert(slide.id.clone()) {
            slide.id = fresh_id("slide");
            slide_ids.insert(slide.id.clone());
            report.regenerated_ids += 1;
        }

        let mut seen_background = false;
        let before = slide.layers.len();
        slide.layers.retain(|l| {
            if !l.is_background() {
                return true;
            }
            let keep = !seen_background;
            seen_background = true;
            keep
        });
        report.dropped_backgrounds += before - slide.layers.len();
        if !seen_background {
            slide
                .layers
                .insert(0, Layer::Background(BackgroundLayer::for_slide_type(slide.slide_type)));
            report.injected_backgrounds += 1;
        }

        for layer in &mut slide.layers {
            if layer.id().is_empty() || !layer_ids.insert(layer.id().to_owned()) {
                layer.refresh_id();
                layer_ids.insert(layer.id().to_owned());
                report.regenerated_ids += 1;
            }
        }
    }

    report.renumbered = slides
        .iter()
        .enumerate()
        .any(|(i, s)| s.slide_number != (i + 1) as u32);
    renumber(&mut slides);

    if !report.is_clean() {
        tracing::warn!(?report, "repaired slide list");
    }
    (slides, report)
}

/// Check a slide list against the document invariants without changing it.
pub fn validate_slides(slides: &[Slide]) -> SlideResult<()> {
    if slides.is_empty() {
        return Err(SlideError::validation("slide list is empty"));
    }
    let mut layer_ids: HashSet<&str> = HashSet::new();
    let mut slide_ids: HashSet<&str> = HashSet::new();
    for (i, slide) in slides.iter().enumerate() {
        if slide.slide_number != (i + 1) as u32 {
            return Err(SlideError::validation(format!(
                "slide {} has slideNumber {}",
                i + 1,
                slide.slide_number
            )));
        }
        if !slide_ids.insert(slide.id.as_str()) {
            return Err(SlideError::validation(format!(
                "duplicate slide id \"{}\"",
                slide.id
            )));
        }
        let backgrounds = slide.layers.iter().filter(|l| l.is_background()).count();
        if backgrounds != 1 {
            return Err(SlideError::validation(format!(
                "slide {} has {backgrounds} background layers",
                i + 1
            )));
        }
        for layer in &slide.layers {
            if !layer_ids.insert(layer.id()) {
                return Err(SlideError::validation(format!(
                    "duplicate layer id \"{}\"",
                    layer.id()
                )));
            }
            if let Some(t) = layer.transform()
                && (t.width.is_nan() || t.height.is_nan() || t.width <= 0.0 || t.height <= 0.0)
            {
                return Err(SlideError::validation(format!(
                    "layer \"{}\" has non-positive size {}x{}",
                    layer.id(),
                    t.width,
                    t.height
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/repair.rs"]
mod tests;
