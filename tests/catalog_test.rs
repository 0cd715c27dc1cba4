//! Tests for the canonical branch catalog and derived-id rule

use rstest::rstest;

use vesseltree::util::testing;
use vesseltree::{
    canonical_ids, is_canonical, next_inserted_id, seed_both_lungs, seed_right_lung, BranchName,
    BranchTree, PlaceStatus,
};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

// ============================================================
// Canonical Order Tests
// ============================================================

#[test]
fn given_catalog_then_trunk_names_come_first_and_both_lungs_follow() {
    let ids = canonical_ids();

    assert_eq!(ids.len(), 30);
    assert_eq!(ids[0], BranchName::PULMONARY_TRUNK_BASE);
    assert_eq!(ids[1], BranchName::PULMONARY_TRUNK);
    assert_eq!(ids[2], BranchName::RIGHT_PULMONARY_ARTERY);
    assert_eq!(ids[16], BranchName::LEFT_PULMONARY_ARTERY);
    assert_eq!(ids[29], BranchName::POSTERIOR_BASAL_A10_L);
}

#[test]
fn given_canonical_and_derived_names_then_only_canonical_recognized() {
    assert!(is_canonical(BranchName::PULMONARY_TRUNK));
    assert!(is_canonical(BranchName::LINGULAR));
    assert!(!is_canonical("Pulmonary Trunk_0"));
    assert!(!is_canonical("n4"));
}

// ============================================================
// Derived Id Tests
// ============================================================

#[rstest]
#[case("Pulmonary Trunk", "Pulmonary Trunk_0")]
#[case("Pulmonary Trunk_0", "Pulmonary Trunk_1")]
#[case("Pulmonary Trunk_7", "Pulmonary Trunk_8")]
#[case("n4", "n4_0")]
fn given_anchor_id_when_deriving_insert_id_then_suffix_follows_rule(
    #[case] anchor: &str,
    #[case] expected: &str,
) {
    assert_eq!(next_inserted_id(anchor), expected);
}

// ============================================================
// Seeding Template Tests
// ============================================================

#[test]
fn given_both_lungs_template_then_thirty_unplaced_nodes_under_trunk_base() {
    let mut tree = BranchTree::new();

    seed_both_lungs(&mut tree).unwrap();

    assert_eq!(tree.node_count(), 30);
    assert_eq!(
        tree.root_node_id().as_deref(),
        Some(BranchName::PULMONARY_TRUNK_BASE)
    );
    assert_eq!(
        tree.parent_node_id(BranchName::LEFT_PULMONARY_ARTERY).unwrap().as_deref(),
        Some(BranchName::PULMONARY_TRUNK)
    );
    for id in tree.node_ids() {
        assert_eq!(tree.status(&id).unwrap(), PlaceStatus::NotPlaced);
    }
}

#[test]
fn given_right_lung_template_then_fifteen_nodes_rooted_at_trunk() {
    let mut tree = BranchTree::new();

    seed_right_lung(&mut tree).unwrap();

    assert_eq!(tree.node_count(), 15);
    assert_eq!(
        tree.root_node_id().as_deref(),
        Some(BranchName::PULMONARY_TRUNK)
    );
    assert!(!tree.is_in_tree(BranchName::LEFT_PULMONARY_ARTERY));
    assert_eq!(
        tree.children_node_ids(BranchName::RIGHT_INFERIOR_LOBAR).unwrap().len(),
        5
    );
}
