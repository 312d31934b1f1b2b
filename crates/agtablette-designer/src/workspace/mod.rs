//! # Workspace
//!
//! Owns the three layers (main drawing, tangram background, grid), the
//! viewport, user-defined shape groups and the recently used colors.
//! Every mutation happens through `&mut self`, so loads and edits are
//! serialized by the borrow checker.

mod data;

pub use data::WorkspaceData;

use std::sync::Arc;

use agtablette_core::{
    AppEvent, Color, EventBus, LayerError, LayerKind, Result, ShapeId, WorkspaceEvent,
};
use agtablette_settings::WorkspaceSettings;

use crate::layer::{Layer, LayerData};
use crate::model::{Coordinates, Shape, SymmetryAxis};
use crate::viewport::Viewport;

/// Restricts which shapes the tools may pick.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConstraints {
    pub shapes_selectable: bool,
    pub blacklist: Vec<ShapeId>,
}

impl Default for SelectionConstraints {
    fn default() -> Self {
        Self {
            shapes_selectable: true,
            blacklist: Vec::new(),
        }
    }
}

pub struct Workspace {
    main: Layer,
    tangram: Layer,
    grid: Layer,
    viewport: Viewport,
    settings: WorkspaceSettings,
    user_shape_groups: Vec<Vec<ShapeId>>,
    previous_selected_colors: Vec<Color>,
    pub selection_constraints: SelectionConstraints,
    events: Arc<EventBus>,
}

impl Workspace {
    /// Invalid settings are logged and replaced by the defaults.
    pub fn new(settings: &WorkspaceSettings, events: Arc<EventBus>) -> Self {
        let defaults;
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                tracing::error!("Invalid workspace settings, using defaults: {}", e);
                defaults = WorkspaceSettings::default();
                &defaults
            }
        };
        Self {
            main: Layer::new(LayerKind::Main),
            tangram: Layer::new(LayerKind::Tangram),
            grid: Layer::new(LayerKind::Grid),
            viewport: Viewport::new(settings),
            settings: settings.clone(),
            user_shape_groups: Vec::new(),
            previous_selected_colors: Vec::new(),
            selection_constraints: SelectionConstraints::default(),
            events,
        }
    }

    fn emit(&self, event: WorkspaceEvent) {
        // Nobody listening is fine.
        self.events.publish(AppEvent::Workspace(event));
    }

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Main => &self.main,
            LayerKind::Tangram => &self.tangram,
            LayerKind::Grid => &self.grid,
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Main => &mut self.main,
            LayerKind::Tangram => &mut self.tangram,
            LayerKind::Grid => &mut self.grid,
        }
    }

    pub fn main(&self) -> &Layer {
        &self.main
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom_level(&self) -> f64 {
        self.viewport.zoom()
    }

    pub fn translate_offset(&self) -> Coordinates {
        self.viewport.offset()
    }

    // Shapes

    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        self.main.add_shape(shape)
    }

    /// Removes a shape from the main layer, from its user group and from
    /// the links of other shapes. Groups left with one member are dropped.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let removed = self.main.remove_shape(id)?;
        for group in &mut self.user_shape_groups {
            group.retain(|s| *s != id);
        }
        self.user_shape_groups.retain(|g| g.len() > 1);
        for other in &removed.linked_shapes {
            if let Some(shape) = self.main.shape_mut(*other) {
                shape.linked_shapes.retain(|s| *s != id);
            }
        }
        Some(removed)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.main.shape(id)
    }

    pub fn require_shape(&self, id: ShapeId) -> std::result::Result<&Shape, LayerError> {
        self.main.require_shape(id)
    }

    /// Main-layer shapes under `point`; the topmost one is last.
    pub fn shapes_on_point(&self, point: Coordinates) -> std::result::Result<Vec<ShapeId>, LayerError> {
        self.main.shapes_on_point(point)
    }

    /// Topmost selectable shape under `point`. Layer corruption is logged
    /// and treated as no hit.
    pub fn select_shape_at(&self, point: Coordinates) -> Option<ShapeId> {
        if !self.selection_constraints.shapes_selectable {
            return None;
        }
        match self.shapes_on_point(point) {
            Ok(mut hits) => {
                hits.retain(|id| !self.selection_constraints.blacklist.contains(id));
                hits.pop()
            }
            Err(e) => {
                tracing::error!("Hit-test failed at {}: {}", point, e);
                None
            }
        }
    }

    pub fn translate_shapes(
        &mut self,
        ids: &[ShapeId],
        delta: Coordinates,
    ) -> std::result::Result<(), LayerError> {
        for id in ids {
            let (shape, points) = self.main.shape_and_points(*id)?;
            shape.translate(points, delta)?;
        }
        Ok(())
    }

    pub fn move_shape_to(
        &mut self,
        id: ShapeId,
        target: Coordinates,
    ) -> std::result::Result<(), LayerError> {
        let (shape, points) = self.main.shape_and_points(id)?;
        shape.move_to(points, target)
    }

    pub fn rotate_shapes(
        &mut self,
        ids: &[ShapeId],
        angle: f64,
        center: Coordinates,
    ) -> std::result::Result<(), LayerError> {
        for id in ids {
            let (shape, points) = self.main.shape_and_points(*id)?;
            shape.rotate(points, angle, center)?;
        }
        Ok(())
    }

    pub fn reflect_shapes(
        &mut self,
        ids: &[ShapeId],
        axis: &SymmetryAxis,
    ) -> std::result::Result<(), LayerError> {
        for id in ids {
            let (shape, points) = self.main.shape_and_points(*id)?;
            shape.reflect(points, axis)?;
        }
        Ok(())
    }

    pub fn set_shape_color(&mut self, id: ShapeId, color: Color) -> std::result::Result<(), LayerError> {
        let kind = self.main.kind();
        let shape = self
            .main
            .shape_mut(id)
            .ok_or(LayerError::ShapeNotFound { layer: kind, id })?;
        shape.color = color;
        Ok(())
    }

    // User groups

    pub fn user_shape_groups(&self) -> &[Vec<ShapeId>] {
        &self.user_shape_groups
    }

    pub fn get_shape_group_index(&self, id: ShapeId) -> Option<usize> {
        self.user_shape_groups.iter().position(|g| g.contains(&id))
    }

    pub fn get_shape_group(&self, id: ShapeId) -> Option<&[ShapeId]> {
        self.get_shape_group_index(id)
            .map(|i| self.user_shape_groups[i].as_slice())
    }

    /// Adds a group. Its members leave any group they were in, so a shape
    /// belongs to at most one group. Returns the index of the new group.
    pub fn add_user_group(&mut self, requested: Vec<ShapeId>) -> Option<usize> {
        let mut members: Vec<ShapeId> = Vec::with_capacity(requested.len());
        for id in requested {
            if !members.contains(&id) {
                members.push(id);
            }
        }
        if members.len() < 2 {
            tracing::debug!("Ignoring user group with {} member(s)", members.len());
            return None;
        }
        for group in &mut self.user_shape_groups {
            group.retain(|s| !members.contains(s));
        }
        self.user_shape_groups.retain(|g| g.len() > 1);
        self.user_shape_groups.push(members);
        Some(self.user_shape_groups.len() - 1)
    }

    /// Appends `id` to the group at `index`, taking it out of any other group.
    pub fn add_to_user_group(&mut self, index: usize, id: ShapeId) -> Option<usize> {
        let mut members = self.user_shape_groups.get(index)?.clone();
        if !members.contains(&id) {
            members.push(id);
        }
        self.user_shape_groups.remove(index);
        self.add_user_group(members)
    }

    /// Merges the groups at `a` and `b` into one.
    pub fn merge_user_groups(&mut self, a: usize, b: usize) -> Option<usize> {
        if a == b {
            return Some(a);
        }
        let mut members = self.user_shape_groups.get(a)?.clone();
        members.extend(self.user_shape_groups.get(b)?.iter().copied());
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        self.user_shape_groups.remove(high);
        self.user_shape_groups.remove(low);
        self.add_user_group(members)
    }

    pub fn remove_user_group(&mut self, index: usize) -> Option<Vec<ShapeId>> {
        (index < self.user_shape_groups.len()).then(|| self.user_shape_groups.remove(index))
    }

    /// Replaces every group at once. Used to restore a snapshot.
    pub fn set_user_groups(&mut self, groups: Vec<Vec<ShapeId>>) {
        self.user_shape_groups = groups;
    }

    /// Shapes that move together with `id`: its user group (or itself),
    /// plus every shape linked to a member.
    pub fn shape_group_members(&self, id: ShapeId) -> Vec<ShapeId> {
        let mut members: Vec<ShapeId> = match self.get_shape_group(id) {
            Some(group) => group.to_vec(),
            None => vec![id],
        };
        let mut i = 0;
        while i < members.len() {
            if let Some(shape) = self.main.shape(members[i]) {
                for linked in &shape.linked_shapes {
                    if !members.contains(linked) {
                        members.push(*linked);
                    }
                }
            }
            i += 1;
        }
        members
    }

    // View state

    /// Stores `zoom` clamped to the configured bounds and asks for a redraw.
    pub fn set_zoom_level(&mut self, zoom: f64) -> f64 {
        let stored = self.viewport.set_zoom(zoom);
        if stored != zoom {
            tracing::debug!("Zoom {} clamped to {}", zoom, stored);
        }
        self.emit(WorkspaceEvent::ZoomChanged { zoom: stored });
        self.emit(WorkspaceEvent::Refresh {
            layers: LayerKind::ALL.to_vec(),
        });
        stored
    }

    pub fn set_translate_offset(&mut self, offset: Coordinates) {
        self.viewport.set_offset(offset);
        self.emit(WorkspaceEvent::OffsetChanged {
            x: offset.x,
            y: offset.y,
        });
    }

    pub fn translate_offset_by(&mut self, delta: Coordinates) {
        self.set_translate_offset(self.viewport.offset() + delta);
    }

    pub fn previous_selected_colors(&self) -> &[Color] {
        &self.previous_selected_colors
    }

    /// Records `color` as the most recent choice, without duplicates.
    pub fn push_selected_color(&mut self, color: Color) {
        let lower = color.to_lowercase();
        self.previous_selected_colors
            .retain(|c| c.to_lowercase() != lower);
        self.previous_selected_colors.insert(0, color);
        self.previous_selected_colors
            .truncate(self.settings.previous_colors_capacity);
    }

    // Persistence

    /// Empties every layer and forgets groups, colors, zoom and offset.
    pub fn reset(&mut self) {
        self.main.clear();
        self.tangram.clear();
        self.grid.clear();
        self.user_shape_groups.clear();
        self.previous_selected_colors.clear();
        self.viewport.reset();
        self.emit(WorkspaceEvent::Reset);
        tracing::info!("Workspace reset");
    }

    /// Serializable snapshot. An empty tangram layer is cleared first.
    pub fn data(&mut self) -> Result<WorkspaceData> {
        if self.tangram.is_empty() {
            self.tangram.clear();
        }
        let zoom = self.viewport.zoom();
        let offset = self.viewport.offset();
        Ok(WorkspaceData {
            objects: self.main.to_data()?,
            canvas_size: self.viewport.canvas_size(),
            back_objects: self.tangram.to_data()?,
            zoom_level: (zoom != 1.0).then_some(zoom),
            translate_offset: (!offset.is_zero()).then_some(offset),
            user_shape_groups: self.user_shape_groups.clone(),
            previous_selected_colors: self.previous_selected_colors.clone(),
        })
    }

    /// Loads a saved workspace.
    ///
    /// `None` or a non-object value resets the workspace. A load that fails
    /// part way also resets it and returns the error. In every case
    /// `CanvasReady` is published exactly once, after the background layer
    /// has been loaded.
    pub async fn init_from_object(&mut self, data: Option<&serde_json::Value>) -> Result<()> {
        let result = self.load(data).await;
        if let Err(e) = &result {
            tracing::error!("Workspace load failed, resetting: {}", e);
            self.reset();
        }
        self.emit(WorkspaceEvent::CanvasReady);
        result
    }

    async fn load(&mut self, data: Option<&serde_json::Value>) -> Result<()> {
        let value = match data {
            Some(value) if value.is_object() => value,
            _ => {
                tracing::debug!("No workspace object, starting empty");
                self.reset();
                return Ok(());
            }
        };

        let saved: WorkspaceData = serde_json::from_value(value.clone())?;
        let ratio = saved.scale_ratio(self.viewport.canvas_size());

        let mut main = Layer::from_data(LayerKind::Main, saved.objects)?;
        if ratio != 1.0 {
            tracing::info!("Rescaling saved workspace by {:.3}", ratio);
            main.rescale(ratio)?;
        }
        self.main = main;
        self.grid.clear();

        let mut tangram = load_background(saved.back_objects).await?;
        if ratio != 1.0 {
            tangram.rescale(ratio)?;
        }
        self.tangram = tangram;

        self.user_shape_groups = saved
            .user_shape_groups
            .into_iter()
            .map(|g| {
                g.into_iter()
                    .filter(|id| self.main.shape(*id).is_some())
                    .collect::<Vec<_>>()
            })
            .filter(|g| g.len() > 1)
            .collect();
        self.previous_selected_colors = saved.previous_selected_colors;
        self.previous_selected_colors
            .truncate(self.settings.previous_colors_capacity);
        self.viewport.set_zoom(saved.zoom_level.unwrap_or(1.0));
        self.viewport
            .set_offset(saved.translate_offset.unwrap_or(Coordinates::ORIGIN));

        tracing::info!(
            "Workspace loaded: {} shape(s), {} background shape(s)",
            self.main.shapes().len(),
            self.tangram.shapes().len()
        );
        self.emit(WorkspaceEvent::Refresh {
            layers: LayerKind::ALL.to_vec(),
        });
        Ok(())
    }
}

/// Loads the tangram layer. Yields first so the main-layer load never waits
/// on background content.
async fn load_background(data: LayerData) -> Result<Layer> {
    tokio::task::yield_now().await;
    Layer::from_data(LayerKind::Tangram, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeStep;

    fn workspace() -> Workspace {
        Workspace::new(&WorkspaceSettings::default(), Arc::new(EventBus::new()))
    }

    fn square(x: f64, y: f64) -> Shape {
        Shape::from_build_steps(
            "Carré",
            "f",
            "#f00",
            Coordinates::new(x, y),
            vec![
                ShapeStep::line(0.0, 0.0),
                ShapeStep::line(10.0, 0.0),
                ShapeStep::line(10.0, 10.0),
                ShapeStep::line(0.0, 10.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut ws = workspace();
        assert_eq!(ws.set_zoom_level(100.0), 10.0);
        assert_eq!(ws.zoom_level(), 10.0);
        assert_eq!(ws.set_zoom_level(0.0), 0.2);
        assert_eq!(ws.set_zoom_level(2.0), 2.0);
    }

    #[test]
    fn test_groups_are_disjoint() {
        let mut ws = workspace();
        let a = ws.add_shape(square(0.0, 0.0));
        let b = ws.add_shape(square(20.0, 0.0));
        let c = ws.add_shape(square(40.0, 0.0));
        ws.add_user_group(vec![a, b]);
        ws.add_user_group(vec![b, c]);
        assert_eq!(ws.user_shape_groups(), &[vec![b, c]]);
        assert_eq!(ws.get_shape_group_index(a), None);
        assert_eq!(ws.get_shape_group(c), Some(&[b, c][..]));
    }

    #[test]
    fn test_merge_groups() {
        let mut ws = workspace();
        let ids: Vec<ShapeId> = (0..4).map(|i| ws.add_shape(square(i as f64 * 20.0, 0.0))).collect();
        ws.add_user_group(vec![ids[0], ids[1]]);
        ws.add_user_group(vec![ids[2], ids[3]]);
        let merged = ws.merge_user_groups(0, 1).unwrap();
        assert_eq!(ws.user_shape_groups().len(), 1);
        assert_eq!(ws.user_shape_groups()[merged].len(), 4);
    }

    #[test]
    fn test_remove_shape_cleans_groups() {
        let mut ws = workspace();
        let a = ws.add_shape(square(0.0, 0.0));
        let b = ws.add_shape(square(20.0, 0.0));
        ws.add_user_group(vec![a, b]);
        ws.remove_shape(a);
        assert!(ws.user_shape_groups().is_empty());
    }

    #[test]
    fn test_group_members_follow_links() {
        let mut ws = workspace();
        let a = ws.add_shape(square(0.0, 0.0));
        let mut linked = square(20.0, 0.0);
        linked.linked_shapes = vec![a];
        let b = ws.add_shape(linked);
        ws.main.shape_mut(a).unwrap().linked_shapes = vec![b];
        assert_eq!(ws.shape_group_members(a), vec![a, b]);
    }

    #[test]
    fn test_select_respects_constraints() {
        let mut ws = workspace();
        let a = ws.add_shape(square(0.0, 0.0));
        let b = ws.add_shape(square(5.0, 5.0));
        let p = Coordinates::new(7.0, 7.0);
        assert_eq!(ws.select_shape_at(p), Some(b));
        ws.selection_constraints.blacklist = vec![b];
        assert_eq!(ws.select_shape_at(p), Some(a));
        ws.selection_constraints.shapes_selectable = false;
        assert_eq!(ws.select_shape_at(p), None);
    }

    #[test]
    fn test_previous_colors_most_recent_first() {
        let mut ws = workspace();
        for i in 0..20 {
            ws.push_selected_color(format!("#{:03}", i));
        }
        ws.push_selected_color("#005".to_string());
        let colors = ws.previous_selected_colors();
        assert_eq!(colors.len(), 16);
        assert_eq!(colors[0], "#005");
        assert_eq!(colors.iter().filter(|c| *c == "#005").count(), 1);
    }

    #[test]
    fn test_data_clears_empty_tangram() {
        let mut ws = workspace();
        ws.tangram.points_mut().insert(crate::model::Point::new(1, Coordinates::ORIGIN));
        ws.add_shape(square(0.0, 0.0));
        let data = ws.data().unwrap();
        assert!(data.back_objects.points.is_empty());
        assert_eq!(data.objects.shapes.len(), 1);
        assert_eq!(data.zoom_level, None);
        assert_eq!(data.translate_offset, None);
    }
}
