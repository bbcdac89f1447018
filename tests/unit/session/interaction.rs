use super::*;
use crate::scene::layer::{ShapeLayer, ShapeType};
use crate::session::opts::EditorOpts;

/// Store with one 200×100 rectangle at (100, 100), not selected.
fn setup() -> (EditorStore, String) {
    let mut store = EditorStore::with_opts(Vec::new(), EditorOpts::default());
    let mut shape = ShapeLayer::new(ShapeType::Rectangle);
    shape.transform = Transform::new(100.0, 100.0, 200.0, 100.0, 1);
    let id = store.add_layer(Layer::Shape(shape)).unwrap();
    store.select_layer(None);
    (store, id)
}

fn transform(store: &EditorStore, id: &str) -> Transform {
    store
        .current_slide()
        .layer(id)
        .and_then(Layer::transform)
        .cloned()
        .unwrap()
}

#[test]
fn click_selects_and_drag_moves() {
    let (mut store, id) = setup();
    let mut ctl = InteractionController::new();
    assert_eq!(ctl.pointer_down(&mut store, Point::new(150.0, 150.0)), DragMode::Move);
    assert_eq!(store.selected_layer_id(), Some(id.as_str()));
    assert_eq!(ctl.cursor(), Cursor::Grabbing);

    assert!(ctl.pointer_move(&mut store, Point::new(160.0, 170.0)));
    assert!(ctl.pointer_move(&mut store, Point::new(170.0, 190.0)));
    let t = transform(&store, &id);
    assert_eq!((t.x, t.y), (120.0, 140.0));
    assert!(ctl.pointer_up(&mut store));
    assert_eq!(ctl.mode(), DragMode::None);
}

#[test]
fn drag_is_one_history_entry() {
    let (mut store, id) = setup();
    let before = store.history().len();
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&mut store, Point::new(150.0, 150.0));
    for i in 1..=10 {
        ctl.pointer_move(&mut store, Point::new(150.0 + f64::from(i), 150.0));
    }
    ctl.pointer_up(&mut store);
    assert_eq!(store.history().len(), before + 1);
    assert!(store.undo());
    assert_eq!(transform(&store, &id).x, 100.0);
}

#[test]
fn undo_mid_drag_keeps_the_rest_of_the_drag_undoable() {
    let (mut store, id) = setup();
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&mut store, Point::new(150.0, 150.0));
    ctl.pointer_move(&mut store, Point::new(170.0, 150.0));

    assert!(store.undo());
    assert_eq!(transform(&store, &id).x, 100.0);
    assert!(!store.in_gesture());

    assert!(ctl.pointer_move(&mut store, Point::new(250.0, 150.0)));
    assert!(store.in_gesture());
    assert!(ctl.pointer_up(&mut store));
    assert_eq!(transform(&store, &id).x, 200.0);
    assert!(!store.can_redo());

    assert!(store.undo());
    assert_eq!(transform(&store, &id).x, 100.0);
    assert!(store.redo());
    assert_eq!(transform(&store, &id).x, 200.0);
}

#[test]
fn click_without_motion_records_nothing() {
    let (mut store, _) = setup();
    let before = store.history().len();
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&mut store, Point::new(150.0, 150.0));
    ctl.pointer_move(&mut store, Point::new(150.0, 150.0));
    assert!(!ctl.pointer_up(&mut store));
    assert_eq!(store.history().len(), before);
}

#[test]
fn delta_is_divided_by_zoom() {
    let (mut store, id) = setup();
    store.set_zoom(0.5);
    let mut ctl = InteractionController::new();
    // Logical (150, 150) is screen (75, 75) at zoom 0.5.
    assert_eq!(ctl.pointer_down(&mut store, Point::new(75.0, 75.0)), DragMode::Move);
    ctl.pointer_move(&mut store, Point::new(85.0, 75.0));
    assert_eq!(transform(&store, &id).x, 120.0);
}

#[test]
fn handle_of_selected_layer_starts_resize() {
    let (mut store, id) = setup();
    store.select_layer(Some(&id));
    let mut ctl = InteractionController::new();
    let mode = ctl.pointer_down(&mut store, Point::new(300.0, 200.0));
    assert_eq!(mode, DragMode::Resize(ResizeHandle::Se));
    assert_eq!(mode.as_str(), "resize-se");
    assert_eq!(ctl.cursor(), Cursor::NwseResize);
    ctl.pointer_move(&mut store, Point::new(350.0, 260.0));
    let t = transform(&store, &id);
    assert_eq!((t.x, t.y, t.width, t.height), (100.0, 100.0, 250.0, 160.0));
}

#[test]
fn resize_west_clamps_and_keeps_east_edge() {
    let initial = Transform::new(100.0, 100.0, 200.0, 100.0, 1);
    let t = apply_drag(DragMode::Resize(ResizeHandle::W), &initial, Vec2::new(500.0, 0.0), 20.0);
    assert_eq!(t.width, 20.0);
    assert_eq!(t.x + t.width, 300.0);
    assert_eq!((t.y, t.height), (100.0, 100.0));
}

#[test]
fn resize_north_clamps_and_keeps_south_edge() {
    let initial = Transform::new(100.0, 100.0, 200.0, 100.0, 1);
    let t = apply_drag(DragMode::Resize(ResizeHandle::Nw), &initial, Vec2::new(10.0, 300.0), 20.0);
    assert_eq!(t.height, 20.0);
    assert_eq!(t.y + t.height, 200.0);
    assert_eq!((t.x, t.width), (110.0, 190.0));
}

#[test]
fn resize_east_clamps_in_place() {
    let initial = Transform::new(100.0, 100.0, 200.0, 100.0, 1);
    let t = apply_drag(DragMode::Resize(ResizeHandle::E), &initial, Vec2::new(-400.0, 50.0), 20.0);
    assert_eq!((t.x, t.width, t.height), (100.0, 20.0, 100.0));
}

#[test]
fn empty_canvas_clears_selection() {
    let (mut store, id) = setup();
    store.select_layer(Some(&id));
    let mut ctl = InteractionController::new();
    assert_eq!(ctl.pointer_down(&mut store, Point::new(900.0, 900.0)), DragMode::None);
    assert_eq!(store.selected_layer_id(), None);
    assert!(!ctl.pointer_move(&mut store, Point::new(950.0, 950.0)));
}

#[test]
fn leave_ends_the_drag() {
    let (mut store, _) = setup();
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&mut store, Point::new(150.0, 150.0));
    ctl.pointer_move(&mut store, Point::new(200.0, 150.0));
    assert!(ctl.pointer_leave(&mut store));
    assert!(!ctl.is_dragging());
    assert!(!store.in_gesture());
}

#[test]
fn escape_only_when_idle() {
    let (mut store, _) = setup();
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&mut store, Point::new(150.0, 150.0));
    assert!(!ctl.escape(&mut store));
    assert!(store.selected_layer_id().is_some());
    ctl.pointer_up(&mut store);
    assert!(ctl.escape(&mut store));
    assert!(store.selected_layer_id().is_none());
}

#[test]
fn double_click_selects_text_only() {
    let (mut store, _) = setup();
    let text = store.add_text_layer("Hello").unwrap();
    store.select_layer(None);
    let mut ctl = InteractionController::new();
    // The default text box spans (90, 400) to (990, 600).
    assert_eq!(ctl.double_click(&mut store, Point::new(500.0, 500.0)), Some(text.clone()));
    assert_eq!(store.selected_layer_id(), Some(text.as_str()));
    assert_eq!(ctl.double_click(&mut store, Point::new(150.0, 150.0)), None);
}

#[test]
fn hover_cursor_reports_handles_and_layers() {
    let (mut store, id) = setup();
    let ctl = InteractionController::new();
    assert_eq!(ctl.hover_cursor(&store, Point::new(150.0, 150.0)), Cursor::Pointer);
    assert_eq!(ctl.hover_cursor(&store, Point::new(900.0, 900.0)), Cursor::Default);
    store.select_layer(Some(&id));
    assert_eq!(ctl.hover_cursor(&store, Point::new(300.0, 100.0)), Cursor::NeswResize);
    assert_eq!(ctl.hover_cursor(&store, Point::new(200.0, 100.0)), Cursor::NsResize);
    assert_eq!(Cursor::EwResize.as_str(), "ew-resize");
}
