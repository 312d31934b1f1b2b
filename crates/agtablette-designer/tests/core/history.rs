use std::sync::{Arc, Mutex};

use agtablette_core::{AppEvent, EventBus, EventCategory, EventFilter, HistoryEvent};
use agtablette_designer::history::AppHistory;
use agtablette_designer::model::{Coordinates, Shape, ShapeStep};
use agtablette_designer::states::{ToolKind, ToolSet};
use agtablette_designer::workspace::Workspace;
use agtablette_settings::{ToolSettings, WorkspaceSettings};
use serde_json::json;

struct Fixture {
    history: AppHistory,
    tools: ToolSet,
    workspace: Workspace,
    events: Arc<Mutex<Vec<AppEvent>>>,
}

fn fixture() -> Fixture {
    let bus = Arc::new(EventBus::new());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::History]),
        move |event| sink.lock().unwrap().push(event),
    );
    Fixture {
        history: AppHistory::new(bus.clone()),
        tools: ToolSet::new(&ToolSettings::default()),
        workspace: Workspace::new(&WorkspaceSettings::default(), bus),
        events,
    }
}

fn square_at(workspace: &mut Workspace, x: f64, y: f64) -> u64 {
    let shape = Shape::from_build_steps(
        "Carré",
        "Test",
        "#F00",
        Coordinates::new(x, y),
        vec![
            ShapeStep::line(0.0, 0.0),
            ShapeStep::line(10.0, 0.0),
            ShapeStep::line(10.0, -10.0),
            ShapeStep::line(0.0, -10.0),
        ],
    )
    .unwrap();
    workspace.add_shape(shape)
}

#[test]
fn test_cancel_on_empty_history_does_nothing() {
    let mut f = fixture();
    assert!(!f.history.cancel_last_step(&mut f.tools, &mut f.workspace));
    assert!(!f.history.is_running());
    assert!(f.events.lock().unwrap().is_empty());
}

#[test]
fn test_synchronous_undo_finishes_immediately() {
    let mut f = fixture();
    let id = square_at(&mut f.workspace, 50.0, 50.0);
    f.history.add_step(
        ToolKind::Move,
        json!({"origins": [{"shapeId": id, "position": {"x": 0.0, "y": 0.0}}]}),
    );

    assert!(f.history.cancel_last_step(&mut f.tools, &mut f.workspace));
    assert!(!f.history.is_running());
    assert!(f.history.is_empty());
    assert_eq!(f.workspace.shape(id).unwrap().position(), Coordinates::ORIGIN);

    let events = f.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            AppEvent::History(HistoryEvent::StepAdded {
                action: "move_shape".to_string()
            }),
            AppEvent::History(HistoryEvent::CancelStarted {
                action: "move_shape".to_string()
            }),
            AppEvent::History(HistoryEvent::CancelFinished),
        ]
    );
}

#[test]
fn test_invalid_step_data_still_completes() {
    let mut f = fixture();
    f.history.add_step(ToolKind::Rotate, json!("garbage"));
    assert!(f.history.cancel_last_step(&mut f.tools, &mut f.workspace));
    assert!(!f.history.is_running());
    assert!(f.history.is_empty());
}

#[test]
fn test_steps_are_dropped_while_an_undo_runs() {
    let mut f = fixture();
    let id = square_at(&mut f.workspace, 50.0, 50.0);
    f.history.add_step(ToolKind::Create, json!({"shapeId": id}));
    f.history.add_step(
        ToolKind::Reverse,
        json!({"shapeIds": [id], "axis": {"kind": "V", "center": {"x": 50.0, "y": 50.0}}}),
    );

    assert!(f.history.cancel_last_step(&mut f.tools, &mut f.workspace));
    assert!(f.history.is_running());
    assert!(f.tools.is_animating());

    // A second undo is refused while the first runs
    assert!(!f.history.cancel_last_step(&mut f.tools, &mut f.workspace));
    assert!(!f.history.add_step(ToolKind::Move, json!({"origins": []})));
    assert_eq!(f.history.len(), 1);
    assert!(f.events.lock().unwrap().contains(&AppEvent::History(
        HistoryEvent::StepDropped {
            action: "move_shape".to_string()
        }
    )));

    // Aborting the animation completes the pending undo
    f.tools.reset_all();
    assert!(f.history.poll_completion());
    assert!(!f.history.poll_completion());
    assert!(!f.history.is_running());
}

#[tokio::test]
async fn test_wait_returns_once_completion_fires() {
    let mut f = fixture();
    let id = square_at(&mut f.workspace, 0.0, 0.0);
    f.history.add_step(
        ToolKind::Reverse,
        json!({"shapeIds": [id], "axis": {"kind": "H", "center": {"x": 0.0, "y": 0.0}}}),
    );
    assert!(f.history.cancel_last_step(&mut f.tools, &mut f.workspace));
    f.tools.reset_all();
    f.history.wait().await;
    assert!(!f.history.is_running());
    assert_eq!(
        f.events.lock().unwrap().last(),
        Some(&AppEvent::History(HistoryEvent::CancelFinished))
    );
}
