use crate::render::plan::Viewport;
use crate::scene::document::Document;
use crate::scene::layer::{
    BackgroundLayer, ImageLayer, Layer, ShapeLayer, ShapeType, TextLayer, Transform,
};
use crate::scene::repair::{RepairReport, repair_slides};
use crate::scene::slide::{LegacySlide, Slide, SlideType, migrate_legacy};
use crate::session::bulk_edit::{BrandContext, BulkEditRequest};
use crate::session::history::History;
use crate::session::opts::EditorOpts;

/// Offset applied to a duplicated layer, logical units.
const DUPLICATE_OFFSET: f64 = 20.0;

/// Single source of truth for an editing session.
///
/// Owns the [`Document`], view state (zoom, grid, preview) and the undo [`History`]. Every
/// mutating method commits exactly one history entry when it changes something; no-ops
/// commit nothing. Drags are bracketed by [`EditorStore::begin_gesture`] and
/// [`EditorStore::end_gesture`] so a whole drag is one entry.
#[derive(Clone, Debug)]
pub struct EditorStore {
    doc: Document,
    history: History,
    opts: EditorOpts,
    zoom: f64,
    show_grid: bool,
    preview_mode: bool,
    gesture: bool,
}

impl EditorStore {
    /// Store over `slides` with [`EditorOpts::from_env`].
    pub fn new(slides: Vec<Slide>) -> Self {
        Self::with_opts(slides, EditorOpts::from_env())
    }

    /// Store over `slides` with explicit options.
    pub fn with_opts(slides: Vec<Slide>, opts: EditorOpts) -> Self {
        let doc = Document::new(slides);
        let history = History::new(doc.slides().to_vec(), opts.history_cap);
        Self {
            doc,
            history,
            opts,
            zoom: opts.clamp_zoom(1.0),
            show_grid: false,
            preview_mode: false,
            gesture: false,
        }
    }

    /// Store over a migrated legacy flat list.
    pub fn from_legacy(legacy: &[LegacySlide]) -> Self {
        Self::new(migrate_legacy(legacy))
    }

    // ---- read access ----

    /// The document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// All slides, for saving.
    pub fn slides(&self) -> &[Slide] {
        self.doc.slides()
    }

    /// Consume into the slide list.
    pub fn into_slides(self) -> Vec<Slide> {
        self.doc.into_slides()
    }

    /// Slide being edited.
    pub fn current_slide(&self) -> &Slide {
        self.doc.current_slide()
    }

    /// Index of the slide being edited.
    pub fn current_slide_index(&self) -> usize {
        self.doc.current_slide_index()
    }

    /// Selected layer id.
    pub fn selected_layer_id(&self) -> Option<&str> {
        self.doc.selected_layer_id()
    }

    /// Selected layer.
    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected_layer_id()
            .and_then(|id| self.current_slide().layer(id))
    }

    /// Zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Whether the grid overlay is on.
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Whether preview mode (no overlays) is on.
    pub fn preview_mode(&self) -> bool {
        self.preview_mode
    }

    /// Options.
    pub fn opts(&self) -> &EditorOpts {
        &self.opts
    }

    /// Undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether [`EditorStore::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`EditorStore::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Viewport for painting the current slide on screen.
    pub fn viewport(&self) -> Viewport {
        let selected = if self.preview_mode {
            None
        } else {
            self.selected_layer_id().map(str::to_owned)
        };
        Viewport::editor(self.zoom, self.show_grid && !self.preview_mode, selected)
            .with_handle_px(self.opts.handle_size_px)
    }

    // ---- cursor & view state (no history) ----

    /// Move to slide `index`. Out of range is ignored.
    pub fn set_current_slide(&mut self, index: usize) -> bool {
        self.doc.set_current_slide(index)
    }

    /// Select a layer of the current slide, or clear with `None`.
    pub fn select_layer(&mut self, id: Option<&str>) {
        self.doc.select_layer(id);
    }

    /// Set the zoom, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.opts.clamp_zoom(zoom);
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(round_zoom(self.zoom + self.opts.zoom_step));
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(round_zoom(self.zoom - self.opts.zoom_step));
    }

    /// Flip the grid overlay.
    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    /// Flip preview mode.
    pub fn toggle_preview(&mut self) {
        self.preview_mode = !self.preview_mode;
    }

    /// Discard the session: one default slide, fresh history, default view.
    pub fn reset(&mut self) {
        self.doc = Document::default();
        self.history.reset(self.doc.slides().to_vec());
        self.zoom = self.opts.clamp_zoom(1.0);
        self.show_grid = false;
        self.preview_mode = false;
        self.gesture = false;
    }

    // ---- history ----

    /// Restore the previous committed state. No-op at the oldest entry.
    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        let Some(slides) = self.history.undo().map(<[Slide]>::to_vec) else {
            return false;
        };
        self.doc.replace_slides(slides);
        true
    }

    /// Restore the next committed state. No-op at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        let Some(slides) = self.history.redo().map(<[Slide]>::to_vec) else {
            return false;
        };
        self.doc.replace_slides(slides);
        true
    }

    /// Start a drag. Live updates through [`EditorStore::set_live_transform`] are not
    /// recorded until [`EditorStore::end_gesture`].
    pub fn begin_gesture(&mut self) {
        self.gesture = true;
    }

    /// Whether a drag is in progress.
    pub fn in_gesture(&self) -> bool {
        self.gesture
    }

    /// Finish a drag, committing one entry if the drag changed anything.
    pub fn end_gesture(&mut self) -> bool {
        if !std::mem::take(&mut self.gesture) {
            return false;
        }
        let changed = self
            .history
            .current()
            .is_none_or(|e| e.slides.as_slice() != self.doc.slides());
        if changed {
            self.commit();
        }
        changed
    }

    /// Overwrite a layer transform without recording history. Used while dragging.
    pub fn set_live_transform(&mut self, id: &str, transform: Transform) -> bool {
        let slide = self.doc.current_slide_mut();
        let Some(t) = slide.layer_mut(id).and_then(Layer::transform_mut) else {
            return false;
        };
        if *t == transform {
            return false;
        }
        *t = transform;
        slide.touch();
        true
    }

    fn commit(&mut self) {
        self.gesture = false;
        self.history.commit(self.doc.slides().to_vec());
    }

    fn edit_document(&mut self, f: impl FnOnce(&mut Document) -> bool) -> bool {
        let changed = f(&mut self.doc);
        if changed {
            self.commit();
        }
        changed
    }

    fn edit_slide(&mut self, f: impl FnOnce(&mut Slide) -> bool) -> bool {
        let slide = self.doc.current_slide_mut();
        let changed = f(slide);
        if changed {
            slide.touch();
            self.commit();
        }
        changed
    }

    // ---- slides ----

    /// Insert a new slide after the current one and move to it.
    pub fn add_slide(&mut self, slide_type: SlideType) {
        self.edit_document(|doc| {
            doc.add_slide(slide_type);
            true
        });
    }

    /// Delete slide `index`. No-op for the last slide.
    pub fn delete_slide(&mut self, index: usize) -> bool {
        self.edit_document(|doc| doc.delete_slide(index))
    }

    /// Duplicate slide `index` with fresh ids and move to the copy.
    pub fn duplicate_slide(&mut self, index: usize) -> bool {
        self.edit_document(|doc| doc.duplicate_slide(index))
    }

    /// Move slide `from` to position `to`.
    pub fn reorder_slides(&mut self, from: usize, to: usize) -> bool {
        self.edit_document(|doc| doc.reorder_slides(from, to))
    }

    /// Replace the whole slide list (e.g. with a bulk-edit answer), repairing it first.
    #[tracing::instrument(skip(self, slides), fields(count = slides.len()))]
    pub fn set_slides(&mut self, slides: Vec<Slide>) -> RepairReport {
        let (slides, report) = repair_slides(slides);
        self.doc.replace_slides(slides);
        self.commit();
        report
    }

    /// Apply the slide list returned by a bulk-edit collaborator.
    pub fn apply_bulk_edit(&mut self, slides: Vec<Slide>) -> RepairReport {
        self.set_slides(slides)
    }

    /// Build the request for a bulk-edit collaborator from the current state.
    pub fn bulk_edit_request(
        &self,
        instruction: impl Into<String>,
        brand: BrandContext,
    ) -> BulkEditRequest {
        BulkEditRequest {
            slides: self.slides().to_vec(),
            slide_index: self.current_slide_index(),
            brand,
            instruction: instruction.into(),
        }
    }

    // ---- background ----

    /// Edit the current slide's background in place. Its id is preserved.
    pub fn set_background(&mut self, f: impl FnOnce(&mut BackgroundLayer)) -> bool {
        self.edit_slide(|slide| {
            let Some(bg) = slide.background_mut() else {
                return false;
            };
            let before = bg.clone();
            f(bg);
            bg.id.clone_from(&before.id);
            *bg != before
        })
    }

    // ---- layers ----

    /// Put `layer` on top of the current slide and select it. Background layers are refused.
    pub fn add_layer(&mut self, mut layer: Layer) -> Option<String> {
        if layer.is_background() {
            return None;
        }
        let slide = self.doc.current_slide_mut();
        if slide.layer(layer.id()).is_some() {
            layer.refresh_id();
        }
        let z = slide.next_z_index();
        if let Some(t) = layer.transform_mut() {
            t.z_index = z;
        }
        let id = layer.id().to_owned();
        slide.layers.push(layer);
        slide.touch();
        self.doc.select_layer(Some(&id));
        self.commit();
        Some(id)
    }

    /// Add a default text layer with `content`.
    pub fn add_text_layer(&mut self, content: impl Into<String>) -> Option<String> {
        self.add_layer(Layer::Text(TextLayer::new(content)))
    }

    /// Add a default image layer showing `src`.
    pub fn add_image_layer(&mut self, src: impl Into<String>) -> Option<String> {
        self.add_layer(Layer::Image(ImageLayer::new(src)))
    }

    /// Add a default shape layer.
    pub fn add_shape_layer(&mut self, shape_type: ShapeType) -> Option<String> {
        self.add_layer(Layer::Shape(ShapeLayer::new(shape_type)))
    }

    /// Edit a layer in place.
    ///
    /// The id is preserved and a non-positive or NaN size is clamped to the minimum layer
    /// size. Changing a layer into or out of a background is refused.
    pub fn update_layer(&mut self, id: &str, f: impl FnOnce(&mut Layer)) -> bool {
        let min = self.opts.min_layer_size;
        self.edit_slide(|slide| {
            let Some(layer) = slide.layer_mut(id) else {
                return false;
            };
            let before = layer.clone();
            let mut edited = before.clone();
            f(&mut edited);
            if edited.is_background() != before.is_background() {
                tracing::warn!(layer = id, "layer kind change across background refused");
                return false;
            }
            if edited.id() != id {
                set_layer_id(&mut edited, id);
            }
            if let Some(t) = edited.transform_mut() {
                sanitize_size(t, min);
            }
            if edited == before {
                return false;
            }
            *layer = edited;
            true
        })
    }

    /// Replace a layer's transform.
    pub fn update_layer_transform(&mut self, id: &str, transform: Transform) -> bool {
        self.update_layer(id, |layer| {
            if let Some(t) = layer.transform_mut() {
                *t = transform;
            }
        })
    }

    /// Remove a layer. No-op for the background.
    pub fn delete_layer(&mut self, id: &str) -> bool {
        let removed = self.edit_slide(|slide| match slide.layer_index(id) {
            Some(i) if !slide.layers[i].is_background() => {
                slide.layers.remove(i);
                true
            }
            _ => false,
        });
        if removed && self.selected_layer_id() == Some(id) {
            self.doc.select_layer(None);
        }
        removed
    }

    /// Copy a layer with a fresh id, offset it and put it on top. No-op for the background.
    pub fn duplicate_layer(&mut self, id: &str) -> Option<String> {
        let slide = self.current_slide();
        let source = slide.layer(id).filter(|l| !l.is_background())?;
        let mut copy = source.with_fresh_id();
        if let Some(t) = copy.transform_mut() {
            t.translate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        }
        set_layer_name(&mut copy, &format!("{} copy", source.name()));
        self.add_layer(copy)
    }

    /// Move the layer at paint position `from` to `to` (background excluded, 0 = bottom) and
    /// renumber zIndex `1..=n` in the new order.
    pub fn reorder_layers(&mut self, from: usize, to: usize) -> bool {
        self.edit_slide(|slide| {
            let mut order = stacking_order(slide);
            if from >= order.len() || to >= order.len() || from == to {
                return false;
            }
            let id = order.remove(from);
            order.insert(to, id);
            restack(slide, &order);
            true
        })
    }

    /// Set the layer's zIndex to one above every other layer.
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.edit_slide(|slide| {
            let Some(max) = others_z(slide, id).map(|zs| zs.into_iter().max()) else {
                return false;
            };
            set_z(slide, id, max.map_or(1, |z| z + 1))
        })
    }

    /// Set the layer's zIndex to one below every other layer, but never below 1.
    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.edit_slide(|slide| {
            let Some(min) = others_z(slide, id).map(|zs| zs.into_iter().min()) else {
                return false;
            };
            set_z(slide, id, min.map_or(1, |z| (z - 1).max(1)))
        })
    }

    /// Swap the layer with the one directly above it.
    pub fn bring_forward(&mut self, id: &str) -> bool {
        let order = stacking_order(self.current_slide());
        match order.iter().position(|l| l == id) {
            Some(i) if i + 1 < order.len() => self.reorder_layers(i, i + 1),
            _ => false,
        }
    }

    /// Swap the layer with the one directly below it.
    pub fn send_backward(&mut self, id: &str) -> bool {
        let order = stacking_order(self.current_slide());
        match order.iter().position(|l| l == id) {
            Some(i) if i > 0 => self.reorder_layers(i, i - 1),
            _ => false,
        }
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn round_zoom(z: f64) -> f64 {
    (z * 100.0).round() / 100.0
}

fn sanitize_size(t: &mut Transform, min: f64) {
    if t.width.is_nan() || t.width <= 0.0 {
        t.width = min;
    }
    if t.height.is_nan() || t.height <= 0.0 {
        t.height = min;
    }
}

/// Non-background layer ids in paint order.
fn stacking_order(slide: &Slide) -> Vec<String> {
    slide
        .paint_order()
        .into_iter()
        .filter(|l| !l.is_background())
        .map(|l| l.id().to_owned())
        .collect()
}

fn restack(slide: &mut Slide, order: &[String]) {
    for (i, id) in order.iter().enumerate() {
        if let Some(t) = slide.layer_mut(id).and_then(Layer::transform_mut) {
            t.z_index = i as i32 + 1;
        }
    }
}

/// zIndex of every non-background layer other than `id`, or `None` when `id` is not a
/// non-background layer of `slide`.
fn others_z(slide: &Slide, id: &str) -> Option<Vec<i32>> {
    slide.layer(id)?.z_index()?;
    Some(
        slide
            .layers
            .iter()
            .filter(|l| l.id() != id)
            .filter_map(Layer::z_index)
            .collect(),
    )
}

fn set_z(slide: &mut Slide, id: &str, z: i32) -> bool {
    match slide.layer_mut(id).and_then(Layer::transform_mut) {
        Some(t) if t.z_index != z => {
            t.z_index = z;
            true
        }
        _ => false,
    }
}

fn set_layer_id(layer: &mut Layer, id: &str) {
    let slot = match layer {
        Layer::Background(l) => &mut l.id,
        Layer::Text(l) => &mut l.id,
        Layer::Image(l) => &mut l.id,
        Layer::Shape(l) => &mut l.id,
    };
    id.clone_into(slot);
}

fn set_layer_name(layer: &mut Layer, name: &str) {
    let slot = match layer {
        Layer::Background(l) => &mut l.name,
        Layer::Text(l) => &mut l.name,
        Layer::Image(l) => &mut l.name,
        Layer::Shape(l) => &mut l.name,
    };
    name.clone_into(slot);
}

#[cfg(test)]
#[path = "../../tests/unit/session/store.rs"]
mod tests;
