use std::sync::{Arc, Mutex};

use agtablette_core::{AppEvent, EventBus, EventFilter, LayerKind, WorkspaceEvent};
use agtablette_designer::model::Coordinates;
use agtablette_designer::workspace::Workspace;
use agtablette_settings::WorkspaceSettings;
use serde_json::json;

fn recorded_workspace() -> (Workspace, Arc<Mutex<Vec<AppEvent>>>) {
    let bus = Arc::new(EventBus::new());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    bus.subscribe(EventFilter::All, move |event| {
        sink.lock().unwrap().push(event);
    });
    (Workspace::new(&WorkspaceSettings::default(), bus), events)
}

fn canvas_ready_count(events: &Mutex<Vec<AppEvent>>) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, AppEvent::Workspace(WorkspaceEvent::CanvasReady)))
        .count()
}

fn saved_workspace() -> serde_json::Value {
    json!({
        "objects": {
            "shapes": [
                {
                    "id": 1,
                    "name": "Carré",
                    "familyName": "Formes standard",
                    "color": "#F00",
                    "x": 200.0,
                    "y": 100.0,
                    "buildSteps": [
                        {"type": "line", "x": 0.0, "y": 0.0},
                        {"type": "line", "x": 50.0, "y": 0.0},
                        {"type": "line", "x": 50.0, "y": -50.0},
                        {"type": "line", "x": 0.0, "y": -50.0}
                    ]
                },
                {
                    "id": 2,
                    "name": "Carré",
                    "familyName": "Formes standard",
                    "color": "#0F0",
                    "x": 400.0,
                    "y": 100.0,
                    "buildSteps": [
                        {"type": "line", "x": 0.0, "y": 0.0},
                        {"type": "line", "x": 50.0, "y": 0.0},
                        {"type": "line", "x": 50.0, "y": -50.0}
                    ]
                }
            ]
        },
        "canvasSize": {"width": 2400.0, "height": 1600.0},
        "zoomLevel": 2.0,
        "translateOffset": {"x": 10.0, "y": 20.0},
        "userShapeGroups": [[1, 2, 99]],
        "previousSelectedColors": ["#F00", "#00F"]
    })
}

#[test]
fn test_set_zoom_level_emits_clamped_zoom_then_refresh() {
    let (mut ws, events) = recorded_workspace();
    assert_eq!(ws.set_zoom_level(50.0), 10.0);

    let events = events.lock().unwrap();
    assert_eq!(
        events[0],
        AppEvent::Workspace(WorkspaceEvent::ZoomChanged { zoom: 10.0 })
    );
    assert_eq!(
        events[1],
        AppEvent::Workspace(WorkspaceEvent::Refresh {
            layers: LayerKind::ALL.to_vec()
        })
    );
}

#[test]
fn test_nan_zoom_keeps_previous_level() {
    let (mut ws, _) = recorded_workspace();
    ws.set_zoom_level(2.0);
    assert_eq!(ws.set_zoom_level(f64::NAN), 2.0);
    assert_eq!(ws.zoom_level(), 2.0);
    assert_eq!(ws.set_zoom_level(f64::INFINITY), 10.0);
}

#[test]
fn test_invalid_zoom_bounds_fall_back_to_defaults() {
    let defaults = WorkspaceSettings::default();
    for (min, max) in [(5.0, 1.0), (f64::NAN, 10.0), (0.2, f64::NAN)] {
        let settings = WorkspaceSettings {
            min_zoom_level: min,
            max_zoom_level: max,
            ..WorkspaceSettings::default()
        };
        let mut ws = Workspace::new(&settings, Arc::new(EventBus::new()));
        assert_eq!(ws.set_zoom_level(100.0), defaults.max_zoom_level);
        assert_eq!(ws.set_zoom_level(0.0), defaults.min_zoom_level);
    }
}

#[test]
fn test_translate_offset_emits_offset() {
    let (mut ws, events) = recorded_workspace();
    ws.translate_offset_by(Coordinates::new(5.0, -5.0));
    ws.translate_offset_by(Coordinates::new(5.0, 0.0));
    assert_eq!(ws.translate_offset(), Coordinates::new(10.0, -5.0));
    assert_eq!(
        events.lock().unwrap().last(),
        Some(&AppEvent::Workspace(WorkspaceEvent::OffsetChanged { x: 10.0, y: -5.0 }))
    );
}

#[tokio::test]
async fn test_init_without_object_resets_and_signals_once() {
    let (mut ws, events) = recorded_workspace();
    ws.init_from_object(None).await.unwrap();
    assert!(ws.main().shapes().is_empty());
    assert_eq!(canvas_ready_count(&events), 1);

    ws.init_from_object(Some(&json!("not an object"))).await.unwrap();
    assert_eq!(canvas_ready_count(&events), 2);
}

#[tokio::test]
async fn test_init_rescales_and_filters_groups() {
    let (mut ws, events) = recorded_workspace();
    ws.init_from_object(Some(&saved_workspace())).await.unwrap();

    assert_eq!(canvas_ready_count(&events), 1);
    assert_eq!(ws.main().shapes().len(), 2);
    // Saved on a canvas twice as large
    assert_eq!(ws.shape(1).unwrap().position(), Coordinates::new(100.0, 50.0));
    assert_eq!(ws.shape(2).unwrap().zoom_rate, 0.5);
    assert_eq!(ws.user_shape_groups(), &[vec![1, 2]]);
    assert_eq!(ws.zoom_level(), 2.0);
    assert_eq!(ws.translate_offset(), Coordinates::new(10.0, 20.0));
    assert_eq!(ws.previous_selected_colors(), &["#F00".to_string(), "#00F".to_string()]);
}

#[tokio::test]
async fn test_failed_load_resets_and_still_signals_once() {
    let (mut ws, events) = recorded_workspace();
    ws.init_from_object(Some(&saved_workspace())).await.unwrap();

    let broken = json!({
        "objects": {
            "shapes": [{
                "id": 1,
                "name": "Arc",
                "familyName": "Test",
                "color": "#000",
                "x": 0.0,
                "y": 0.0,
                "buildSteps": [{"type": "arc", "x": 1.0, "y": 0.0, "angle": 90.0, "direction": true}]
            }]
        },
        "canvasSize": {"width": 1200.0, "height": 800.0}
    });
    assert!(ws.init_from_object(Some(&broken)).await.is_err());
    assert!(ws.main().shapes().is_empty());
    assert!(ws.user_shape_groups().is_empty());
    assert_eq!(ws.zoom_level(), 1.0);
    assert_eq!(canvas_ready_count(&events), 2);
}

#[tokio::test]
async fn test_saved_data_loads_back_identically() {
    let (mut ws, _) = recorded_workspace();
    ws.init_from_object(Some(&saved_workspace())).await.unwrap();
    let saved = ws.data().unwrap();
    assert_eq!(saved.zoom_level, Some(2.0));
    assert_eq!(saved.objects.shapes[0].path, "M 100 50 L 125 50 L 125 25 L 100 25 Z");

    let (mut other, _) = recorded_workspace();
    let value = serde_json::to_value(&saved).unwrap();
    other.init_from_object(Some(&value)).await.unwrap();
    assert_eq!(other.data().unwrap(), saved);
}
