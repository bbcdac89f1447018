//! Pointer-driven move/resize state machine.
//!
//! The controller holds only gesture state; the layer data lives in the
//! [`EditorStore`], which is passed into every event.

use std::fmt;

use crate::foundation::core::{Point, Vec2};
use crate::render::hit::{ResizeHandle, handle_at, hit_test};
use crate::scene::layer::{Layer, Transform};
use crate::session::store::EditorStore;

/// Current drag mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Idle.
    #[default]
    None,
    /// Translating the selected layer.
    Move,
    /// Dragging one of the eight handles.
    Resize(ResizeHandle),
}

impl DragMode {
    /// `"none"`, `"move"` or `"resize-<dir>"`.
    pub fn as_str(self) -> &'static str {
        match self {
            DragMode::None => "none",
            DragMode::Move => "move",
            DragMode::Resize(h) => match h {
                ResizeHandle::Nw => "resize-nw",
                ResizeHandle::N => "resize-n",
                ResizeHandle::Ne => "resize-ne",
                ResizeHandle::E => "resize-e",
                ResizeHandle::Se => "resize-se",
                ResizeHandle::S => "resize-s",
                ResizeHandle::Sw => "resize-sw",
                ResizeHandle::W => "resize-w",
            },
        }
    }
}

impl fmt::Display for DragMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer cursor to show, named after the CSS keywords.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Arrow.
    #[default]
    Default,
    /// Over a selectable layer.
    Pointer,
    /// Moving a layer.
    Grabbing,
    /// Diagonal resize, top-left to bottom-right.
    NwseResize,
    /// Diagonal resize, top-right to bottom-left.
    NeswResize,
    /// Vertical resize.
    NsResize,
    /// Horizontal resize.
    EwResize,
}

impl Cursor {
    /// CSS keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
            Cursor::Grabbing => "grabbing",
            Cursor::NwseResize => "nwse-resize",
            Cursor::NeswResize => "nesw-resize",
            Cursor::NsResize => "ns-resize",
            Cursor::EwResize => "ew-resize",
        }
    }

    /// Resize cursor for a handle.
    pub fn for_handle(handle: ResizeHandle) -> Self {
        match handle {
            ResizeHandle::Nw | ResizeHandle::Se => Cursor::NwseResize,
            ResizeHandle::Ne | ResizeHandle::Sw => Cursor::NeswResize,
            ResizeHandle::N | ResizeHandle::S => Cursor::NsResize,
            ResizeHandle::E | ResizeHandle::W => Cursor::EwResize,
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
struct Drag {
    layer_id: String,
    start: Point,
    initial: Transform,
}

/// Move/resize state machine for the current slide.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    mode: DragMode,
    drag: Option<Drag>,
}

impl InteractionController {
    /// Idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer pressed at screen point `at`.
    ///
    /// A handle of the selected layer starts a resize; otherwise the topmost layer under the
    /// pointer is selected and moved; empty canvas clears the selection.
    pub fn pointer_down(&mut self, store: &mut EditorStore, at: Point) -> DragMode {
        if self.is_dragging() {
            self.pointer_up(store);
        }
        let zoom = store.zoom();
        let handle_px = store.opts().handle_size_px;

        let on_handle = store.selected_layer().and_then(|layer| {
            let t = layer.transform()?;
            let handle = handle_at(t.rect(), at, zoom, handle_px)?;
            Some((layer.id().to_owned(), t.clone(), handle))
        });
        if let Some((layer_id, initial, handle)) = on_handle {
            return self.start(layer_id, at, initial, DragMode::Resize(handle));
        }

        let hit = hit_test(store.current_slide(), at, zoom)
            .and_then(|layer| Some((layer.id().to_owned(), layer.transform()?.clone())));
        match hit {
            Some((layer_id, initial)) => {
                store.select_layer(Some(&layer_id));
                self.start(layer_id, at, initial, DragMode::Move)
            }
            None => {
                store.select_layer(None);
                self.mode = DragMode::None;
                self.mode
            }
        }
    }

    fn start(&mut self, layer_id: String, at: Point, initial: Transform, mode: DragMode) -> DragMode {
        tracing::trace!(layer = %layer_id, mode = %mode, "drag started");
        self.drag = Some(Drag {
            layer_id,
            start: at,
            initial,
        });
        self.mode = mode;
        mode
    }

    /// Pointer moved to screen point `at`. Returns whether the layer changed.
    pub fn pointer_move(&mut self, store: &mut EditorStore, at: Point) -> bool {
        let Some(drag) = self.drag.as_ref() else {
            return false;
        };
        let zoom = store.zoom().max(f64::EPSILON);
        let delta = (at - drag.start) / zoom;
        let next = apply_drag(self.mode, &drag.initial, delta, store.opts().min_layer_size);

        let unchanged = store
            .current_slide()
            .layer(&drag.layer_id)
            .and_then(Layer::transform)
            .is_none_or(|t| *t == next);
        if unchanged {
            return false;
        }
        // An undo or redo mid-drag closes the open gesture; reopen it.
        if !store.in_gesture() {
            store.begin_gesture();
        }
        store.set_live_transform(&drag.layer_id, next)
    }

    /// Pointer released. Ends the drag; returns whether a history entry was committed.
    pub fn pointer_up(&mut self, store: &mut EditorStore) -> bool {
        self.mode = DragMode::None;
        self.drag.take().is_some() && store.end_gesture()
    }

    /// Pointer left the canvas. Same as [`InteractionController::pointer_up`].
    pub fn pointer_leave(&mut self, store: &mut EditorStore) -> bool {
        self.pointer_up(store)
    }

    /// Double click at `at`: selects a text layer under the pointer and returns its id.
    pub fn double_click(&mut self, store: &mut EditorStore, at: Point) -> Option<String> {
        let id = match hit_test(store.current_slide(), at, store.zoom()) {
            Some(Layer::Text(text)) => text.id.clone(),
            _ => return None,
        };
        store.select_layer(Some(&id));
        Some(id)
    }

    /// Escape key: clears the selection unless a drag is in progress.
    pub fn escape(&mut self, store: &mut EditorStore) -> bool {
        if self.is_dragging() || store.selected_layer_id().is_none() {
            return false;
        }
        store.select_layer(None);
        true
    }

    /// Cursor for the current mode.
    pub fn cursor(&self) -> Cursor {
        match self.mode {
            DragMode::None => Cursor::Default,
            DragMode::Move => Cursor::Grabbing,
            DragMode::Resize(h) => Cursor::for_handle(h),
        }
    }

    /// Cursor to show while hovering at `at` without a button pressed.
    pub fn hover_cursor(&self, store: &EditorStore, at: Point) -> Cursor {
        if self.is_dragging() {
            return self.cursor();
        }
        let zoom = store.zoom();
        if let Some(t) = store.selected_layer().and_then(Layer::transform)
            && let Some(h) = handle_at(t.rect(), at, zoom, store.opts().handle_size_px)
        {
            return Cursor::for_handle(h);
        }
        if hit_test(store.current_slide(), at, zoom).is_some() {
            Cursor::Pointer
        } else {
            Cursor::Default
        }
    }
}

/// Transform produced by dragging `initial` by a logical `delta` in `mode`.
///
/// Resizing moves only the edges named by the handle and clamps width and height to
/// `min_size`, keeping the opposite edge in place.
pub fn apply_drag(mode: DragMode, initial: &Transform, delta: Vec2, min_size: f64) -> Transform {
    let mut t = initial.clone();
    let handle = match mode {
        DragMode::None => return t,
        DragMode::Move => {
            t.translate(delta.x, delta.y);
            return t;
        }
        DragMode::Resize(h) => h,
    };

    if handle.moves_west() {
        t.x = initial.x + delta.x;
        t.width = initial.width - delta.x;
    } else if handle.moves_east() {
        t.width = initial.width + delta.x;
    }
    if handle.moves_north() {
        t.y = initial.y + delta.y;
        t.height = initial.height - delta.y;
    } else if handle.moves_south() {
        t.height = initial.height + delta.y;
    }

    if t.width.is_nan() || t.width < min_size {
        t.width = min_size;
        if handle.moves_west() {
            t.x = initial.x + initial.width - min_size;
        }
    }
    if t.height.is_nan() || t.height < min_size {
        t.height = min_size;
        if handle.moves_north() {
            t.y = initial.y + initial.height - min_size;
        }
    }
    t
}

#[cfg(test)]
#[path = "../../tests/unit/session/interaction.rs"]
mod tests;
