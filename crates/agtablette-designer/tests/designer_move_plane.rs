//! Panning the workspace by dragging.

use agtablette_designer::{App, Coordinates, RecordingCanvas, Selection, ToolKind, ToolParams};
use agtablette_settings::Config;

fn app() -> App<RecordingCanvas> {
    let mut app = App::new(Config::new(), RecordingCanvas::new());
    assert!(app.set_state(ToolKind::MovePlane, ToolParams::None));
    app
}

#[test]
fn test_drag_translates_offset_and_undo_restores_it() {
    let mut app = app();
    app.mousedown(Coordinates::new(100.0, 100.0), Selection::none());
    app.mouseup(Coordinates::new(150.0, 120.0), Selection::none());
    assert_eq!(app.workspace.translate_offset(), Coordinates::new(50.0, 20.0));
    assert_eq!(app.history.len(), 1);

    assert!(app.undo());
    assert_eq!(app.workspace.translate_offset(), Coordinates::ORIGIN);
    assert!(app.history.is_empty());
}

#[test]
fn test_drag_is_measured_in_canvas_units() {
    let mut app = app();
    app.set_zoom_level(2.0);
    app.mousedown(Coordinates::new(100.0, 100.0), Selection::none());
    app.mouseup(Coordinates::new(150.0, 120.0), Selection::none());
    assert_eq!(app.workspace.translate_offset(), Coordinates::new(100.0, 40.0));
}

#[test]
fn test_drag_is_stable_while_offset_moves() {
    let mut app = app();
    app.mousedown(Coordinates::new(100.0, 100.0), Selection::none());
    // Canvas (120, 100) while the offset is still zero
    app.mousemove(Coordinates::new(120.0, 100.0));
    assert_eq!(app.workspace.translate_offset(), Coordinates::new(20.0, 0.0));
    // Canvas (150, 120), seen through the offset set by the previous move
    app.mouseup(Coordinates::new(130.0, 120.0), Selection::none());
    assert_eq!(app.workspace.translate_offset(), Coordinates::new(50.0, 20.0));
}

#[test]
fn test_click_without_drag_records_nothing() {
    let mut app = app();
    app.mousedown(Coordinates::new(100.0, 100.0), Selection::none());
    app.mouseup(Coordinates::new(100.0, 100.0), Selection::none());
    assert!(app.history.is_empty());
}

#[test]
fn test_mousemove_without_mousedown_is_ignored() {
    let mut app = app();
    app.mousemove(Coordinates::new(300.0, 300.0));
    app.mouseup(Coordinates::new(10.0, 10.0), Selection::none());
    assert_eq!(app.workspace.translate_offset(), Coordinates::ORIGIN);
}
