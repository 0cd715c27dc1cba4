//! Tests for the placement wizard state machine

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec3;

use vesseltree::util::testing;
use vesseltree::{
    seed_both_lungs, seed_right_lung, BranchName, BranchTree, InteractionStatus, Key,
    PlaceProvider, PlaceStatus, PlacementWizard, TogglePlaceMode, TreeColumn, TreeResult,
    WizardEvent,
};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn pos(i: usize) -> DVec3 {
    DVec3::new(i as f64, -2.0 * i as f64, 40.0 + i as f64)
}

/// Root "A" with children "B" and "C".
fn seed_fork(tree: &mut BranchTree) -> TreeResult<()> {
    tree.insert_after_node("A", None, PlaceStatus::NotPlaced)?;
    tree.insert_after_node("B", Some("A"), PlaceStatus::NotPlaced)?;
    tree.insert_after_node("C", Some("A"), PlaceStatus::NotPlaced)?;
    Ok(())
}

fn fork_wizard() -> PlacementWizard {
    PlacementWizard::new(Box::new(TogglePlaceMode::new()), seed_fork).unwrap()
}

/// Click the root, then feed scene points until placement stops by itself.
fn place_all(wizard: &mut PlacementWizard) {
    let root = wizard.tree().root_node_id().unwrap();
    wizard.on_item_clicked(&root, TreeColumn::Name).unwrap();
    let mut i = 0;
    while wizard.interaction_status() == InteractionStatus::Placing {
        wizard.on_point_added(pos(i)).unwrap();
        i += 1;
    }
}

/// Place-mode surface shared with the test so external cancellation can be
/// simulated.
#[derive(Clone, Default)]
struct ScenePlaceMode {
    enabled: Rc<Cell<bool>>,
}

impl PlaceProvider for ScenePlaceMode {
    fn set_place_mode_enabled(&mut self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn place_mode_enabled(&self) -> bool {
        self.enabled.get()
    }
}

// ============================================================
// Guided Placement Tests
// ============================================================

#[test]
fn given_unplaced_node_clicked_then_placing_starts_and_place_mode_enabled() {
    let mut wizard = fork_wizard();

    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();

    assert_eq!(wizard.interaction_status(), InteractionStatus::Placing);
    assert_eq!(wizard.tree().status("A").unwrap(), PlaceStatus::Placing);
    assert!(wizard.place_mode_enabled());
    assert_eq!(wizard.current_node_id(), Some("A"));
}

#[test]
fn given_scene_point_while_placing_then_point_finalized_and_wizard_advances() {
    // Arrange
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();

    // Act
    wizard.on_point_added(pos(0)).unwrap();

    // Assert: A finalized, first child is the next target
    assert_eq!(wizard.tree().status("A").unwrap(), PlaceStatus::Placed);
    assert_eq!(wizard.points().labels(), vec!["A"]);
    assert_eq!(wizard.points().position_of("A"), Some(pos(0)));
    assert_eq!(wizard.current_node_id(), Some("B"));
    assert_eq!(wizard.tree().status("B").unwrap(), PlaceStatus::Placing);
}

#[test]
fn given_last_node_placed_then_place_mode_disabled_and_wizard_stops() {
    let mut wizard = fork_wizard();

    place_all(&mut wizard);

    assert!(wizard.tree().are_all_nodes_placed());
    assert!(wizard.is_placing_finished());
    assert_eq!(wizard.interaction_status(), InteractionStatus::Stopped);
    assert!(!wizard.place_mode_enabled());
    assert_eq!(wizard.current_node_id(), None);
    assert_eq!(wizard.points().len(), 3);
}

#[test]
fn given_placed_node_clicked_while_placing_then_interaction_stops() {
    // Arrange: A placed, B mid-placement
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();

    // Act
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();

    // Assert: pending gesture on B reverted
    assert_eq!(wizard.interaction_status(), InteractionStatus::Stopped);
    assert_eq!(wizard.tree().status("B").unwrap(), PlaceStatus::NotPlaced);
    assert!(!wizard.place_mode_enabled());
}

#[test]
fn given_geometry_after_partial_placement_then_missing_nodes_skipped() {
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.on_point_added(pos(1)).unwrap();
    wizard.stop_interaction().unwrap();

    assert_eq!(wizard.drawer().polyline(), &[pos(0), pos(1), pos(0)]);
}

// ============================================================
// Placing Finished Latch Tests
// ============================================================

#[test]
fn given_full_catalog_placement_then_finished_fires_once_and_clear_rearms() {
    // Arrange
    let mut wizard =
        PlacementWizard::new(Box::new(TogglePlaceMode::new()), seed_right_lung).unwrap();

    // Act
    place_all(&mut wizard);
    let finished_events = wizard
        .drain_events()
        .into_iter()
        .filter(|e| *e == WizardEvent::PlacingFinished)
        .count();

    // Assert
    assert!(wizard.is_placing_finished());
    assert_eq!(finished_events, 1);

    // Clearing reseeds the catalog tree and re-arms the latch
    wizard.clear().unwrap();
    assert!(!wizard.is_placing_finished());
    assert_eq!(wizard.tree().node_count(), 15);
    assert!(wizard.points().is_empty());

    let root = wizard.tree().root_node_id().unwrap();
    wizard.on_item_clicked(&root, TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    assert!(!wizard
        .drain_events()
        .contains(&WizardEvent::PlacingFinished));
}

// ============================================================
// Stop Interaction Tests
// ============================================================

#[test]
fn given_stop_while_placing_then_node_reverts_to_not_placed() {
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();

    wizard.stop_interaction().unwrap();

    assert_eq!(wizard.tree().status("A").unwrap(), PlaceStatus::NotPlaced);
    assert_eq!(wizard.interaction_status(), InteractionStatus::Stopped);
    assert!(!wizard.place_mode_enabled());
    assert!(wizard.points().is_locked());
}

#[test]
fn given_stop_while_insert_before_then_node_reverts_to_placed() {
    // Arrange: A and B placed, insert-before armed on B
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.on_point_added(pos(1)).unwrap();
    wizard.stop_interaction().unwrap();
    wizard.on_item_clicked("B", TreeColumn::InsertBefore).unwrap();
    assert_eq!(wizard.interaction_status(), InteractionStatus::InsertBefore);
    assert_eq!(wizard.tree().status("B").unwrap(), PlaceStatus::InsertBefore);

    // Act
    wizard.stop_interaction().unwrap();

    // Assert
    assert_eq!(wizard.tree().status("B").unwrap(), PlaceStatus::Placed);
    assert_eq!(wizard.interaction_status(), InteractionStatus::Stopped);
    assert!(!wizard.place_mode_enabled());
}

#[test]
fn given_stopped_wizard_when_stopping_again_then_noop() {
    let mut wizard = fork_wizard();

    wizard.stop_interaction().unwrap();
    wizard.drain_events();
    wizard.stop_interaction().unwrap();

    assert!(wizard.drain_events().is_empty());
}

#[test]
fn given_external_place_mode_disable_then_running_placement_cancelled() {
    // Arrange
    let place = ScenePlaceMode::default();
    let handle = place.enabled.clone();
    let mut wizard = PlacementWizard::new(Box::new(place), seed_fork).unwrap();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    assert!(handle.get());

    // Act: host disables placement behind the wizard's back
    handle.set(false);
    wizard.on_place_mode_changed().unwrap();

    // Assert
    assert_eq!(wizard.interaction_status(), InteractionStatus::Stopped);
    assert_eq!(wizard.tree().status("A").unwrap(), PlaceStatus::NotPlaced);
}

// ============================================================
// Insert Before Tests
// ============================================================

#[test]
fn given_unplaced_parent_when_arming_insert_before_then_refused() {
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.stop_interaction().unwrap();

    // A is placed but is the root: no parent, no edge to split
    wizard.on_item_clicked("A", TreeColumn::InsertBefore).unwrap();

    assert_eq!(wizard.interaction_status(), InteractionStatus::Stopped);
    assert!(!wizard.place_mode_enabled());
}

#[test]
fn given_insert_before_chain_then_derived_ids_increment() {
    // Arrange: place the trunk base and the trunk, leave the rest
    let mut wizard =
        PlacementWizard::new(Box::new(TogglePlaceMode::new()), seed_both_lungs).unwrap();
    let base = BranchName::PULMONARY_TRUNK_BASE;
    let trunk = BranchName::PULMONARY_TRUNK;
    wizard.on_item_clicked(base, TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.on_point_added(pos(1)).unwrap();
    wizard.stop_interaction().unwrap();

    // Act: arm insert-before on the trunk and chain two placements
    wizard.on_item_clicked(trunk, TreeColumn::InsertBefore).unwrap();
    wizard.on_point_added(pos(10)).unwrap();
    wizard.on_point_added(pos(11)).unwrap();

    // Assert: base -> Trunk_1 -> Trunk_0 -> trunk
    let first = "Pulmonary Trunk_0";
    let second = "Pulmonary Trunk_1";
    assert_eq!(
        wizard.tree().parent_node_id(second).unwrap().as_deref(),
        Some(base)
    );
    assert_eq!(wizard.tree().children_node_ids(second).unwrap(), vec![first]);
    assert_eq!(wizard.tree().children_node_ids(first).unwrap(), vec![trunk]);
    assert_eq!(wizard.tree().status(first).unwrap(), PlaceStatus::Placed);
    assert_eq!(wizard.points().position_of(first), Some(pos(10)));
    assert_eq!(wizard.points().position_of(second), Some(pos(11)));
    assert_eq!(wizard.current_node_id(), Some(second));
    assert_eq!(wizard.interaction_status(), InteractionStatus::InsertBefore);
}

#[test]
fn given_insert_before_rearmed_on_same_anchor_then_fresh_id_derived() {
    // Arrange: A and B placed, one node already inserted ahead of B
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.on_point_added(pos(1)).unwrap();
    wizard.stop_interaction().unwrap();
    wizard.on_item_clicked("B", TreeColumn::InsertBefore).unwrap();
    wizard.on_point_added(pos(10)).unwrap();
    wizard.stop_interaction().unwrap();

    // Act: arm insert-before on the same anchor again and place
    wizard.on_item_clicked("B", TreeColumn::InsertBefore).unwrap();
    wizard.on_point_added(pos(11)).unwrap();

    // Assert: "B_0" is taken, so the new node lands under it as "B_1"
    assert_eq!(wizard.tree().children_node_ids("B_0").unwrap(), vec!["B_1"]);
    assert_eq!(wizard.tree().children_node_ids("B_1").unwrap(), vec!["B"]);
    assert_eq!(wizard.points().position_of("B_1"), Some(pos(11)));

    // Every point label stays unique
    let mut labels = wizard.points().labels();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), wizard.points().len());
}

// ============================================================
// Edit Mode Tests
// ============================================================

#[test]
fn given_edit_toggled_then_points_unlock_and_relock() {
    let mut wizard = fork_wizard();

    wizard.on_edit_node(true).unwrap();
    assert_eq!(wizard.interaction_status(), InteractionStatus::Edit);
    assert!(!wizard.points().is_locked());

    wizard.on_edit_node(false).unwrap();
    assert_eq!(wizard.interaction_status(), InteractionStatus::Stopped);
    assert!(wizard.points().is_locked());
}

#[test]
fn given_point_dragged_in_edit_mode_then_position_and_geometry_update() {
    // Arrange
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.stop_interaction().unwrap();
    wizard.on_edit_node(true).unwrap();

    // Act
    let moved = DVec3::new(9.0, 9.0, 9.0);
    wizard.on_point_moved(0, moved).unwrap();
    wizard.on_point_interaction_ended();

    // Assert
    assert_eq!(wizard.points().position_of("A"), Some(moved));
    assert_eq!(wizard.drawer().polyline(), &[moved]);
}

// ============================================================
// Delete Tests
// ============================================================

#[test]
fn given_placed_node_deleted_then_tree_and_point_store_stay_in_sync() {
    // Arrange: A and B placed
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.on_point_added(pos(1)).unwrap();

    // Act
    wizard.on_key_pressed("B", Key::Delete).unwrap();

    // Assert
    assert!(!wizard.tree().is_in_tree("B"));
    assert_eq!(wizard.points().labels(), vec!["A"]);
    assert_eq!(wizard.tree().children_node_ids("A").unwrap(), vec!["C"]);
}

#[test]
fn given_root_deleted_then_refused_and_point_kept() {
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();

    let removed = wizard.delete_node("A").unwrap();

    assert!(!removed);
    assert!(wizard.tree().is_in_tree("A"));
    assert_eq!(wizard.points().index_of("A"), Some(0));
}

#[test]
fn given_current_node_deleted_then_current_reference_cleared() {
    // Arrange: A placed, wizard advanced onto B
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    assert_eq!(wizard.current_node_id(), Some("B"));

    // Act
    wizard.delete_node("B").unwrap();

    // Assert
    assert_eq!(wizard.current_node_id(), None);
    assert!(!wizard.tree().is_in_tree("B"));
}

#[test]
fn given_unplaced_node_deleted_then_remaining_placed_tree_finishes() {
    // Arrange: A and B placed, C never placed
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.on_point_added(pos(1)).unwrap();
    assert!(!wizard.is_placing_finished());

    // Act: removing the only unplaced node completes the tree
    wizard.delete_node("C").unwrap();

    // Assert
    assert!(wizard.is_placing_finished());
    assert_eq!(
        wizard
            .drain_events()
            .iter()
            .filter(|e| **e == WizardEvent::PlacingFinished)
            .count(),
        1
    );
}

// ============================================================
// Rename Tests
// ============================================================

#[test]
fn given_placed_node_renamed_then_point_label_follows() {
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();
    wizard.stop_interaction().unwrap();

    let renamed = wizard.rename_node("A", "Trunk").unwrap();

    assert!(renamed);
    assert!(wizard.tree().is_in_tree("Trunk"));
    assert_eq!(wizard.points().labels(), vec!["Trunk"]);
}

#[test]
fn given_rename_to_existing_id_then_rejected() {
    let mut wizard = fork_wizard();

    let renamed = wizard.rename_node("B", "C").unwrap();

    assert!(!renamed);
    assert!(wizard.tree().is_in_tree("B"));
}

// ============================================================
// Drop / Visibility / Add Node Tests
// ============================================================

#[test]
fn given_item_dropped_to_top_level_then_single_root_restored() {
    let mut wizard = fork_wizard();

    wizard.on_item_dropped("C", None).unwrap();

    assert_eq!(wizard.tree().root_node_id().as_deref(), Some("C"));
    assert_eq!(wizard.tree().children_node_ids("C").unwrap(), vec!["A"]);
}

#[test]
fn given_scene_hidden_then_points_and_skeleton_invisible() {
    let mut wizard = fork_wizard();
    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();
    wizard.on_point_added(pos(0)).unwrap();

    wizard.set_visible_in_scene(false).unwrap();

    assert!(!wizard.drawer().is_visible());
    assert!(wizard.points().iter().all(|p| !p.visible));

    wizard.set_visible_in_scene(true).unwrap();
    assert!(wizard.points().iter().all(|p| p.visible));
}

#[test]
fn given_add_node_then_generated_id_under_requested_parent() {
    let mut wizard = fork_wizard();

    let id = wizard.add_node(Some("C")).unwrap();

    assert_eq!(id, "n3");
    assert_eq!(
        wizard.tree().parent_node_id(&id).unwrap().as_deref(),
        Some("C")
    );
}

// ============================================================
// Event Ordering Tests
// ============================================================

#[test]
fn given_placement_started_then_interaction_event_precedes_current_node_event() {
    let mut wizard = fork_wizard();
    wizard.drain_events();

    wizard.on_item_clicked("A", TreeColumn::Name).unwrap();

    let events = wizard.drain_events();
    assert_eq!(
        events,
        vec![
            WizardEvent::InteractionChanged(InteractionStatus::Placing),
            WizardEvent::CurrentNodeChanged(Some("A".to_string())),
        ]
    );
}

#[test]
fn given_point_placed_while_stopped_then_report_ignored() {
    let mut wizard = fork_wizard();

    wizard.on_point_added(pos(0)).unwrap();

    assert!(wizard.points().is_empty());
    assert_eq!(wizard.interaction_status(), InteractionStatus::Stopped);
}
