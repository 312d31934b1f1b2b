//! Application root: wires the workspace, the tool states, the history and
//! a view together, and forwards pointer events to the active tool.

use std::sync::Arc;

use agtablette_core::{AppEvent, EventBus, Result, ShapeError, ToolEvent};
use agtablette_settings::Config;

use crate::animation::{Clock, SystemClock};
use crate::canvas::{CanvasView, Highlight, Selection};
use crate::family::Family;
use crate::history::AppHistory;
use crate::model::Coordinates;
use crate::states::{ToolContext, ToolKind, ToolParams, ToolSet};
use crate::workspace::{Workspace, WorkspaceData};

pub struct App<V: CanvasView> {
    pub workspace: Workspace,
    pub history: AppHistory,
    pub tools: ToolSet,
    families: Vec<Family>,
    events: Arc<EventBus>,
    clock: Box<dyn Clock>,
    view: V,
    config: Config,
    mouse: Option<Coordinates>,
}

/// Splits the app into the borrows a tool needs.
macro_rules! with_context {
    ($app:expr, |$tools:ident, $ctx:ident| $body:expr) => {{
        let App {
            workspace,
            history,
            tools: $tools,
            clock,
            view,
            ..
        } = $app;
        let mut $ctx = ToolContext {
            workspace,
            history,
            view,
            now: clock.now(),
        };
        $body
    }};
}

impl<V: CanvasView> App<V> {
    pub fn new(config: Config, view: V) -> Self {
        Self::with_clock(config, view, Box::new(SystemClock::new()))
    }

    pub fn with_clock(config: Config, view: V, clock: Box<dyn Clock>) -> Self {
        let events = Arc::new(EventBus::new());
        Self {
            workspace: Workspace::new(&config.workspace, events.clone()),
            history: AppHistory::new(events.clone()),
            tools: ToolSet::new(&config.tools),
            families: vec![Family::standard(config.tools.default_family_color.clone())],
            events,
            clock,
            view,
            config,
            mouse: None,
        }
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn add_family(&mut self, family: Family) {
        self.families.push(family);
    }

    pub fn current_state(&self) -> ToolKind {
        self.tools.current()
    }

    /// Switches tool. Refused while an animation runs.
    pub fn set_state(&mut self, kind: ToolKind, params: ToolParams) -> bool {
        let switched = with_context!(self, |tools, ctx| tools.set_state(kind, params, &mut ctx));
        if switched {
            self.events.publish(AppEvent::Tool(ToolEvent::StateChanged {
                name: kind.to_string(),
            }));
        }
        switched
    }

    /// Selects the create tool with a template from a known family.
    pub fn select_template(&mut self, family_name: &str, template_name: &str) -> Result<bool> {
        let family = self
            .families
            .iter()
            .find(|f| f.name == family_name)
            .ok_or_else(|| ShapeError::TemplateNotFound {
                family: family_name.to_string(),
                name: template_name.to_string(),
            })?;
        let template = family.require_shape_data(template_name)?;
        let params = ToolParams::Template {
            family_name: family.name.clone(),
            template,
        };
        Ok(self.set_state(ToolKind::Create, params))
    }

    /// Tools ignore clicks while an undo is in progress, since anything
    /// they record would be dropped by the history.
    fn pointer_blocked(&self) -> bool {
        if self.history.is_running() {
            tracing::debug!("Pointer event ignored while undoing");
            return true;
        }
        false
    }

    pub fn click(&mut self, at: Coordinates, selection: Selection) {
        self.mouse = Some(at);
        if self.pointer_blocked() {
            return;
        }
        with_context!(self, |tools, ctx| tools.click(at, selection, &mut ctx));
    }

    pub fn mousedown(&mut self, at: Coordinates, selection: Selection) {
        self.mouse = Some(at);
        if self.pointer_blocked() {
            return;
        }
        with_context!(self, |tools, ctx| tools.mousedown(at, selection, &mut ctx));
    }

    pub fn mouseup(&mut self, at: Coordinates, selection: Selection) {
        self.mouse = Some(at);
        if self.pointer_blocked() {
            return;
        }
        with_context!(self, |tools, ctx| tools.mouseup(at, selection, &mut ctx));
    }

    pub fn mousemove(&mut self, at: Coordinates) {
        self.mouse = Some(at);
        with_context!(self, |tools, ctx| tools.mousemove(at, &mut ctx));
        self.draw();
    }

    /// Advances animations to the clock's current time and finishes an undo
    /// whose completion has fired.
    pub fn tick(&mut self) {
        with_context!(self, |tools, ctx| tools.tick(&mut ctx));
        if self.history.poll_completion() {
            self.redraw_all();
        }
    }

    /// Undoes the last step. Returns whether an undo started.
    pub fn undo(&mut self) -> bool {
        let started = self
            .history
            .cancel_last_step(&mut self.tools, &mut self.workspace);
        if started && !self.history.is_running() {
            self.redraw_all();
        }
        started
    }

    fn redraw_all(&mut self) {
        self.view.refresh_background();
        self.view.refresh(self.mouse);
    }

    /// Draws the active tool's feedback at the last pointer position.
    pub fn draw(&mut self) {
        if let Some(mouse) = self.mouse {
            self.tools.draw(&mut self.view, &self.workspace, mouse);
        }
    }

    pub fn elements_to_highlight(&self, at: Coordinates) -> Highlight {
        self.workspace
            .select_shape_at(at)
            .and_then(|id| self.workspace.shape(id))
            .map(|shape| self.tools.elements_to_highlight(shape, &self.workspace))
            .unwrap_or_default()
    }

    pub fn set_zoom_level(&mut self, zoom: f64) -> f64 {
        let stored = self.workspace.set_zoom_level(zoom);
        self.redraw_all();
        stored
    }

    /// Replaces the workspace with saved data. Tools and history start over.
    pub async fn load(&mut self, data: Option<&serde_json::Value>) -> Result<()> {
        self.tools.reset_all();
        self.history.clear();
        let result = self.workspace.init_from_object(data).await;
        self.redraw_all();
        result
    }

    pub fn save(&mut self) -> Result<WorkspaceData> {
        self.workspace.data()
    }
}
