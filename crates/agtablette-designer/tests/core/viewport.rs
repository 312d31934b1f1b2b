use agtablette_designer::model::Coordinates;
use agtablette_designer::viewport::Viewport;
use agtablette_settings::{CanvasSize, WorkspaceSettings};

#[test]
fn test_viewport_creation() {
    let vp = Viewport::default();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.offset(), Coordinates::ORIGIN);
    assert_eq!(vp.canvas_size(), CanvasSize::new(1200.0, 800.0));
}

#[test]
fn test_zoom_is_clamped() {
    let settings = WorkspaceSettings::default();
    let mut vp = Viewport::new(&settings);
    assert_eq!(vp.set_zoom(100.0), settings.max_zoom_level);
    assert_eq!(vp.set_zoom(0.01), settings.min_zoom_level);
    assert_eq!(vp.set_zoom(1.5), 1.5);
    assert_eq!(vp.zoom(), 1.5);
}

#[test]
fn test_translate_offset_accumulates() {
    let mut vp = Viewport::default();
    vp.translate_offset(Coordinates::new(10.0, 5.0));
    vp.translate_offset(Coordinates::new(-4.0, 1.0));
    assert_eq!(vp.offset(), Coordinates::new(6.0, 6.0));
}

#[test]
fn test_reset_keeps_canvas_size() {
    let mut vp = Viewport::default();
    vp.set_canvas_size(CanvasSize::new(600.0, 400.0));
    vp.set_zoom(3.0);
    vp.set_offset(Coordinates::new(1.0, 1.0));
    vp.reset();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.offset(), Coordinates::ORIGIN);
    assert_eq!(vp.canvas_size(), CanvasSize::new(600.0, 400.0));
}

#[test]
fn test_world_origin_maps_to_offset() {
    let mut vp = Viewport::default();
    vp.set_zoom(0.5);
    vp.set_offset(Coordinates::new(40.0, 30.0));
    assert_eq!(vp.world_to_canvas(Coordinates::ORIGIN), Coordinates::new(40.0, 30.0));
    assert_eq!(
        vp.canvas_to_world(Coordinates::new(50.0, 30.0)),
        Coordinates::new(20.0, 0.0)
    );
}
