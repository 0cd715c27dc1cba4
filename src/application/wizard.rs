//! Guided placement wizard.
//!
//! The interaction state machine coordinating tree-view gestures, scene
//! point reports and the host place-mode surface against the branch tree
//! and point store. Single writer: all mutation of the tree, the points and
//! the derived geometry happens inside these handlers, each of which runs
//! to completion (tree, then points, then geometry, then events) before the
//! host dispatches the next input.

use glam::DVec3;
use tracing::{debug, instrument};

use crate::application::drawer::TreeDrawer;
use crate::application::events::WizardEvent;
use crate::application::export::BranchExport;
use crate::domain::catalog;
use crate::domain::error::TreeResult;
use crate::domain::points::PointStore;
use crate::domain::tree::{BranchTree, PlaceStatus};
use crate::infrastructure::traits::PlaceProvider;

/// Label the host scene gives a freshly added control point before the
/// wizard finalizes it with a branch node id.
const SCENE_POINT_LABEL: &str = "node";

/// Global interaction state governing which gestures are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionStatus {
    Stopped,
    Placing,
    Edit,
    InsertBefore,
}

/// Column of the tree view an item click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeColumn {
    Name,
    InsertBefore,
    Delete,
}

/// Key presses forwarded from the tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Escape,
}

/// Catalog template applied to a fresh tree at construction and on clear.
pub type SeedFn = fn(&mut BranchTree) -> TreeResult<()>;

/// Interaction state machine for guided branch node placement.
pub struct PlacementWizard {
    tree: BranchTree,
    points: PointStore,
    drawer: TreeDrawer,
    place: Box<dyn PlaceProvider>,
    seed: SeedFn,
    interaction: InteractionStatus,
    current: Option<String>,
    placing_finished: bool,
    events: Vec<WizardEvent>,
}

impl PlacementWizard {
    /// Build a wizard over a catalog-seeded tree; points start locked and
    /// placement disabled.
    pub fn new(place: Box<dyn PlaceProvider>, seed: SeedFn) -> TreeResult<Self> {
        let mut tree = BranchTree::new();
        seed(&mut tree)?;
        Ok(Self {
            tree,
            points: PointStore::new(),
            drawer: TreeDrawer::new(),
            place,
            seed,
            interaction: InteractionStatus::Stopped,
            current: None,
            placing_finished: false,
            events: Vec::new(),
        })
    }

    fn emit(&mut self, event: WizardEvent) {
        self.events.push(event);
    }

    fn emit_current(&mut self) {
        let current = self.current.clone();
        self.emit(WizardEvent::CurrentNodeChanged(current));
    }

    fn update_interaction(&mut self, interaction: InteractionStatus) {
        if self.interaction != interaction {
            debug!(?interaction, "interaction change");
            self.interaction = interaction;
            self.emit(WizardEvent::InteractionChanged(interaction));
            self.emit_current();
        }
    }

    fn current_status(&self) -> TreeResult<Option<PlaceStatus>> {
        match &self.current {
            Some(id) => Ok(Some(self.tree.status(id)?)),
            None => Ok(None),
        }
    }

    fn is_current_placed(&self) -> TreeResult<bool> {
        Ok(self.current_status()? == Some(PlaceStatus::Placed))
    }

    fn is_parent_placed(&self) -> TreeResult<bool> {
        let Some(id) = &self.current else {
            return Ok(false);
        };
        match self.tree.parent_node_id(id)? {
            Some(parent) => Ok(self.tree.status(&parent)? == PlaceStatus::Placed),
            None => Ok(false),
        }
    }

    /// Revert a half-finished gesture on the current node: Placing falls
    /// back to NotPlaced, InsertBefore back to Placed.
    fn deactivate_previous(&mut self) -> TreeResult<()> {
        let Some(id) = self.current.clone() else {
            return Ok(());
        };
        match self.tree.status(&id)? {
            PlaceStatus::Placing => self.tree.set_status(&id, PlaceStatus::NotPlaced)?,
            PlaceStatus::InsertBefore => self.tree.set_status(&id, PlaceStatus::Placed)?,
            _ => {}
        }
        Ok(())
    }

    fn refresh_geometry(&mut self) {
        self.drawer.recompute(&self.tree, &self.points);
    }

    /// Latch and announce completion the first time every node is placed.
    /// Does not re-fire on later edits until the wizard is cleared.
    fn update_placing_finished(&mut self) {
        if !self.placing_finished && self.tree.are_all_nodes_placed() {
            self.placing_finished = true;
            self.emit(WizardEvent::PlacingFinished);
        }
    }

    /// Sole cancellation path; idempotent. Reverts the pending gesture,
    /// disables scene placement and re-locks the points.
    #[instrument(level = "debug", skip(self))]
    pub fn stop_interaction(&mut self) -> TreeResult<()> {
        self.deactivate_previous()?;
        self.place.set_place_mode_enabled(false);
        self.points.set_locked(true);
        self.update_interaction(InteractionStatus::Stopped);
        Ok(())
    }

    /// Begin placing the current node when it is still unplaced.
    pub fn on_start_placing(&mut self) -> TreeResult<()> {
        if self.current_status()? != Some(PlaceStatus::NotPlaced) {
            return Ok(());
        }
        self.stop_interaction()?;
        if let Some(id) = self.current.clone() {
            self.tree.set_status(&id, PlaceStatus::Placing)?;
        }
        self.place.set_place_mode_enabled(true);
        self.update_interaction(InteractionStatus::Placing);
        Ok(())
    }

    /// Arm insert-before on the current node. Requires both the node and
    /// its parent to be placed, so the inserted point lands on an existing
    /// edge.
    pub fn on_insert_before_node(&mut self) -> TreeResult<()> {
        self.stop_interaction()?;
        if self.is_current_placed()? && self.is_parent_placed()? {
            if let Some(id) = self.current.clone() {
                self.place.set_place_mode_enabled(true);
                self.tree.set_status(&id, PlaceStatus::InsertBefore)?;
                self.update_interaction(InteractionStatus::InsertBefore);
            }
        }
        Ok(())
    }

    /// Toggle drag-editing of placed points in the scene.
    pub fn on_edit_node(&mut self, edit_enabled: bool) -> TreeResult<()> {
        self.stop_interaction()?;
        if edit_enabled {
            self.points.set_locked(false);
            self.update_interaction(InteractionStatus::Edit);
        }
        Ok(())
    }

    /// Tree-view item click. Starts placing unplaced nodes, stops an active
    /// placement when a placed node is clicked, and dispatches the action
    /// columns.
    #[instrument(level = "debug", skip(self))]
    pub fn on_item_clicked(&mut self, node_id: &str, column: TreeColumn) -> TreeResult<()> {
        self.deactivate_previous()?;
        self.current = Some(node_id.to_string());

        match column {
            TreeColumn::Delete => {
                self.delete_node(node_id)?;
            }
            TreeColumn::InsertBefore => self.on_insert_before_node()?,
            TreeColumn::Name => match self.tree.status(node_id)? {
                PlaceStatus::NotPlaced => self.on_start_placing()?,
                PlaceStatus::Placed if self.interaction == InteractionStatus::Placing => {
                    self.stop_interaction()?;
                }
                _ => {}
            },
        }

        self.refresh_geometry();
        Ok(())
    }

    /// Key press forwarded from the tree view.
    pub fn on_key_pressed(&mut self, node_id: &str, key: Key) -> TreeResult<()> {
        match key {
            Key::Delete => {
                self.delete_node(node_id)?;
            }
            Key::Escape => self.stop_interaction()?,
        }
        Ok(())
    }

    /// The scene reports a freshly placed control point.
    ///
    /// While placing: finalize the newest point with the current node id and
    /// advance to the next unplaced node; placement is disabled once none
    /// remain. While inserting before: finalize under a derived id, splice
    /// the new node ahead of the anchor and re-arm for chaining. Any other
    /// state ignores the report.
    #[instrument(level = "debug", skip(self))]
    pub fn on_point_added(&mut self, position: DVec3) -> TreeResult<()> {
        match self.interaction {
            InteractionStatus::Placing => {
                let Some(id) = self.current.clone() else {
                    return Ok(());
                };
                self.points.add(SCENE_POINT_LABEL, position);
                self.points.rename_last(&id)?;
                self.tree.set_status(&id, PlaceStatus::Placed)?;
                match self.tree.next_unplaced_node(&id)? {
                    Some(next) => {
                        self.tree.set_status(&next, PlaceStatus::Placing)?;
                        self.current = Some(next);
                        self.emit_current();
                    }
                    None => {
                        self.current = None;
                        self.emit_current();
                        self.stop_interaction()?;
                    }
                }
            }
            InteractionStatus::InsertBefore => {
                let Some(anchor) = self.current.clone() else {
                    return Ok(());
                };
                // Re-arming on the same anchor derives ids already taken by
                // earlier insertions; walk the chain until a free one.
                let mut inserted = catalog::next_inserted_id(&anchor);
                while self.tree.is_in_tree(&inserted) {
                    inserted = catalog::next_inserted_id(&inserted);
                }
                self.tree.set_status(&anchor, PlaceStatus::Placed)?;
                self.tree
                    .insert_before_node(&inserted, &anchor, PlaceStatus::Placed)?;
                self.points.add(SCENE_POINT_LABEL, position);
                self.points.rename_last(&inserted)?;
                self.current = Some(inserted);
                self.emit_current();
                self.on_insert_before_node()?;
            }
            _ => {
                debug!("scene point ignored: no placement interaction active");
                return Ok(());
            }
        }

        self.refresh_geometry();
        self.update_placing_finished();
        Ok(())
    }

    /// A placed point was dragged to a new position (edit mode).
    pub fn on_point_moved(&mut self, index: usize, position: DVec3) -> TreeResult<()> {
        self.points.set_position(index, position)?;
        self.refresh_geometry();
        Ok(())
    }

    /// A drag gesture on a point ended; geometry catches up.
    pub fn on_point_interaction_ended(&mut self) {
        self.refresh_geometry();
    }

    /// The host toggled place mode outside the wizard (e.g. Escape in the
    /// 3D view); an external disable cancels the running interaction.
    pub fn on_place_mode_changed(&mut self) -> TreeResult<()> {
        if !self.place.place_mode_enabled() {
            self.stop_interaction()?;
        }
        Ok(())
    }

    /// Tree-view drag-drop: move a subtree, then repair the single-root
    /// invariant.
    #[instrument(level = "debug", skip(self))]
    pub fn on_item_dropped(&mut self, node_id: &str, new_parent: Option<&str>) -> TreeResult<()> {
        self.tree.reparent(node_id, new_parent)?;
        self.tree.enforce_one_root();
        self.refresh_geometry();
        Ok(())
    }

    /// Rename a node and its placed point together. A name already in the
    /// tree rejects the rename with `Ok(false)`.
    #[instrument(level = "debug", skip(self))]
    pub fn rename_node(&mut self, old_id: &str, new_id: &str) -> TreeResult<bool> {
        if !self.tree.rename_node(old_id, new_id)? {
            return Ok(false);
        }
        if self.points.index_of(old_id).is_some() {
            self.points.rename(old_id, new_id)?;
        }
        if self.current.as_deref() == Some(old_id) {
            self.current = Some(new_id.to_string());
            self.emit_current();
        }
        Ok(true)
    }

    /// Delete a node: remove it from the tree, drop its placed point and
    /// refresh visibility. Root deletion is refused and returns `Ok(false)`
    /// with the point kept.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_node(&mut self, node_id: &str) -> TreeResult<bool> {
        self.stop_interaction()?;
        let removed = self.tree.remove_node(node_id)?;
        if removed {
            self.points.remove(node_id);
            self.update_node_visibility()?;
            if self.current.as_deref() == Some(node_id) {
                self.current = None;
                self.emit_current();
            }
        }
        self.update_placing_finished();
        Ok(removed)
    }

    /// Hide points whose node is no longer part of the tree.
    pub fn update_node_visibility(&mut self) -> TreeResult<()> {
        for label in self.points.labels() {
            let in_tree = self.tree.is_in_tree(&label);
            self.points.set_visible(&label, in_tree)?;
        }
        self.refresh_geometry();
        Ok(())
    }

    /// Show or hide the skeleton and the placed points in the scene.
    pub fn set_visible_in_scene(&mut self, visible: bool) -> TreeResult<()> {
        self.drawer.set_visible(visible);
        for label in self.points.labels() {
            let in_tree = self.tree.is_in_tree(&label);
            self.points.set_visible(&label, visible && in_tree)?;
        }
        Ok(())
    }

    /// Add a node with a generated id, defaulting the parent like the tree
    /// does for the "add node" gesture.
    pub fn add_node(&mut self, parent_id: Option<&str>) -> TreeResult<String> {
        self.tree.add_generated_node(parent_id)
    }

    /// Reset to the catalog-seeded empty state: no points, no geometry,
    /// completion latch re-armed.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) -> TreeResult<()> {
        self.current = None;
        self.stop_interaction()?;
        self.tree.clear();
        self.points.clear();
        self.drawer.clear();
        self.placing_finished = false;
        (self.seed)(&mut self.tree)?;
        Ok(())
    }

    /// Named branch segments with start/end roles, in canonical catalog
    /// order, for the external vessel-fitting algorithm.
    pub fn export_branches(&self) -> BranchExport {
        BranchExport::collect(&self.tree, &self.points)
    }

    pub fn interaction_status(&self) -> InteractionStatus {
        self.interaction
    }

    pub fn current_node_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_placing_finished(&self) -> bool {
        self.placing_finished
    }

    pub fn place_mode_enabled(&self) -> bool {
        self.place.place_mode_enabled()
    }

    pub fn tree(&self) -> &BranchTree {
        &self.tree
    }

    pub fn points(&self) -> &PointStore {
        &self.points
    }

    pub fn drawer(&self) -> &TreeDrawer {
        &self.drawer
    }

    /// Take the queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<WizardEvent> {
        std::mem::take(&mut self.events)
    }
}
