use serde::{Deserialize, Serialize};

use crate::scene::repair::repair_slides;
use crate::scene::slide::{LegacySlide, Slide, SlideType, migrate_legacy, renumber};

/// The editable unit: ordered slides plus the editing cursor.
///
/// Invariants kept by every operation: at least one slide, `slide_number` dense and 1-based,
/// `current_slide_index < slides.len()`, and `selected_layer_id` (when set) names a layer of
/// the current slide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    slides: Vec<Slide>,
    current_slide_index: usize,
    selected_layer_id: Option<String>,
}

impl Document {
    /// Load a slide list, repairing structural problems.
    pub fn new(slides: Vec<Slide>) -> Self {
        let (slides, _) = repair_slides(slides);
        Self {
            slides,
            current_slide_index: 0,
            selected_layer_id: None,
        }
    }

    /// Load a flat legacy list.
    pub fn from_legacy(legacy: &[LegacySlide]) -> Self {
        Self::new(migrate_legacy(legacy))
    }

    /// All slides in order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Consume into the slide list.
    pub fn into_slides(self) -> Vec<Slide> {
        self.slides
    }

    /// Index of the slide being edited.
    pub fn current_slide_index(&self) -> usize {
        self.current_slide_index
    }

    /// Slide being edited.
    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current_slide_index]
    }

    pub(crate) fn current_slide_mut(&mut self) -> &mut Slide {
        &mut self.slides[self.current_slide_index]
    }

    /// Selected layer id on the current slide.
    pub fn selected_layer_id(&self) -> Option<&str> {
        self.selected_layer_id.as_deref()
    }

    /// Replace the slide list wholesale; the cursor is clamped and a stale selection cleared.
    pub(crate) fn replace_slides(&mut self, slides: Vec<Slide>) {
        self.slides = slides;
        if self.slides.is_empty() {
            self.slides.push(Slide::new(SlideType::Hook, 1));
        }
        renumber(&mut self.slides);
        self.current_slide_index = self.current_slide_index.min(self.slides.len() - 1);
        self.drop_stale_selection();
    }

    /// Move the cursor; out-of-range indices are ignored. Clears the layer selection.
    pub fn set_current_slide(&mut self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        if index != self.current_slide_index {
            self.selected_layer_id = None;
        }
        self.current_slide_index = index;
        true
    }

    /// Select a layer of the current slide, or clear with `None`. Unknown ids clear.
    pub fn select_layer(&mut self, id: Option<&str>) {
        self.selected_layer_id = id
            .filter(|id| self.current_slide().layer(id).is_some())
            .map(str::to_owned);
    }

    /// Insert a fresh slide after the current one and move to it.
    pub fn add_slide(&mut self, slide_type: SlideType) {
        let at = self.current_slide_index + 1;
        self.slides.insert(at, Slide::new(slide_type, 0));
        renumber(&mut self.slides);
        self.current_slide_index = at;
        self.selected_layer_id = None;
    }

    /// Remove a slide. No-op for the last remaining slide or an out-of-range index.
    pub fn delete_slide(&mut self, index: usize) -> bool {
        if self.slides.len() <= 1 || index >= self.slides.len() {
            return false;
        }
        self.slides.remove(index);
        renumber(&mut self.slides);
        self.current_slide_index = index.min(self.slides.len() - 1);
        self.drop_stale_selection();
        true
    }

    /// Deep-copy a slide with fresh ids, insert it after the original and move to it.
    pub fn duplicate_slide(&mut self, index: usize) -> bool {
        let Some(copy) = self.slides.get(index).map(Slide::duplicate) else {
            return false;
        };
        self.slides.insert(index + 1, copy);
        renumber(&mut self.slides);
        self.current_slide_index = index + 1;
        self.selected_layer_id = None;
        true
    }

    /// Move a slide from `from` to `to`; the cursor follows the slide it pointed at.
    pub fn reorder_slides(&mut self, from: usize, to: usize) -> bool {
        let len = self.slides.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let current_id = self.current_slide().id.clone();
        let slide = self.slides.remove(from);
        self.slides.insert(to, slide);
        renumber(&mut self.slides);
        if let Some(i) = self.slides.iter().position(|s| s.id == current_id) {
            self.current_slide_index = i;
        }
        true
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selected_layer_id.as_deref()
            && self.current_slide().layer(id).is_none()
        {
            self.selected_layer_id = None;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(vec![Slide::new(SlideType::Hook, 1)])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
