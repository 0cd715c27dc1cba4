//! Canonical anatomical branch catalog.
//!
//! Fixed ordered name lists for the arterial right- and left-lung subtrees
//! plus the two default layouts used to pre-populate a fresh tree. Pure
//! data; the wizard consumes the order for export and derived ids.

use crate::domain::error::TreeResult;
use crate::domain::tree::{BranchTree, PlaceStatus};

/// Canonical branch node names.
pub struct BranchName;

impl BranchName {
    pub const PULMONARY_TRUNK_BASE: &'static str = "Pulmonary Trunk Base";
    pub const PULMONARY_TRUNK: &'static str = "Pulmonary Trunk";

    pub const RIGHT_PULMONARY_ARTERY: &'static str = "Right Pulmonary Artery";
    pub const RIGHT_SUPERIOR_LOBAR: &'static str = "Right Superior Lobar Artery";
    pub const APICAL_A1_R: &'static str = "Apical Segmental Artery A1 R";
    pub const ANTERIOR_A2_R: &'static str = "Anterior Segmental Artery A2 R";
    pub const POSTERIOR_A3_R: &'static str = "Posterior Segmental Artery A3 R";
    pub const RIGHT_MIDDLE_LOBAR: &'static str = "Right Middle Lobar Artery";
    pub const MEDIAL_A4_R: &'static str = "Medial Segmental Artery A4 R";
    pub const LATERAL_A5_R: &'static str = "Lateral Segmental Artery A5 R";
    pub const RIGHT_INFERIOR_LOBAR: &'static str = "Right Inferior Lobar Artery";
    pub const SUPERIOR_A6_R: &'static str = "Superior Segmental Artery A6 R";
    pub const ANTERIOR_BASAL_A7_R: &'static str = "Anterior Basal Segmental Artery A7 R";
    pub const LATERAL_BASAL_A8_R: &'static str = "Lateral Basal Segmental Artery A8 R";
    pub const MEDIAL_BASAL_A9_R: &'static str = "Medial Basal Segmental Artery A9 R";
    pub const POSTERIOR_BASAL_A10_R: &'static str = "Posterior Basal Segmental Artery A10 R";

    pub const LEFT_PULMONARY_ARTERY: &'static str = "Left Pulmonary Artery";
    pub const LEFT_SUPERIOR_LOBAR: &'static str = "Left Superior Lobar Artery";
    pub const APICAL_A1_L: &'static str = "Apical Segmental Artery A1 L";
    pub const ANTERIOR_A2_L: &'static str = "Anterior Segmental Artery A2 L";
    pub const POSTERIOR_A3_L: &'static str = "Posterior Segmental Artery A3 L";
    pub const LINGULAR: &'static str = "Lingular Artery";
    pub const INFERIOR_LINGULAR_A4_L: &'static str = "Inferior Lingular Artery A4 L";
    pub const SUPERIOR_LINGULAR_A5_L: &'static str = "Superior Lingular Artery A5 L";
    pub const LEFT_INFERIOR_LOBAR: &'static str = "Left Inferior Lobar Artery";
    pub const SUPERIOR_A6_L: &'static str = "Superior Segmental Artery A6 L";
    pub const ANTERIOR_BASAL_A7_L: &'static str = "Anterior Basal Segmental Artery A7 L";
    pub const LATERAL_BASAL_A8_L: &'static str = "Lateral Basal Segmental Artery A8 L";
    pub const MEDIAL_BASAL_A9_L: &'static str = "Medial Basal Segmental Artery A9 L";
    pub const POSTERIOR_BASAL_A10_L: &'static str = "Posterior Basal Segmental Artery A10 L";
}

/// Right-lung arterial subtree, canonical order.
pub const RIGHT_LUNG_IDS: [&str; 14] = [
    BranchName::RIGHT_PULMONARY_ARTERY,
    BranchName::RIGHT_SUPERIOR_LOBAR,
    BranchName::APICAL_A1_R,
    BranchName::ANTERIOR_A2_R,
    BranchName::POSTERIOR_A3_R,
    BranchName::RIGHT_MIDDLE_LOBAR,
    BranchName::MEDIAL_A4_R,
    BranchName::LATERAL_A5_R,
    BranchName::RIGHT_INFERIOR_LOBAR,
    BranchName::SUPERIOR_A6_R,
    BranchName::ANTERIOR_BASAL_A7_R,
    BranchName::LATERAL_BASAL_A8_R,
    BranchName::MEDIAL_BASAL_A9_R,
    BranchName::POSTERIOR_BASAL_A10_R,
];

/// Left-lung arterial subtree, canonical order.
pub const LEFT_LUNG_IDS: [&str; 14] = [
    BranchName::LEFT_PULMONARY_ARTERY,
    BranchName::LEFT_SUPERIOR_LOBAR,
    BranchName::APICAL_A1_L,
    BranchName::ANTERIOR_A2_L,
    BranchName::POSTERIOR_A3_L,
    BranchName::LINGULAR,
    BranchName::INFERIOR_LINGULAR_A4_L,
    BranchName::SUPERIOR_LINGULAR_A5_L,
    BranchName::LEFT_INFERIOR_LOBAR,
    BranchName::SUPERIOR_A6_L,
    BranchName::ANTERIOR_BASAL_A7_L,
    BranchName::LATERAL_BASAL_A8_L,
    BranchName::MEDIAL_BASAL_A9_L,
    BranchName::POSTERIOR_BASAL_A10_L,
];

/// Every canonical id in catalog order: trunk, right lung, left lung.
pub fn canonical_ids() -> Vec<&'static str> {
    let mut ids = vec![
        BranchName::PULMONARY_TRUNK_BASE,
        BranchName::PULMONARY_TRUNK,
    ];
    ids.extend_from_slice(&RIGHT_LUNG_IDS);
    ids.extend_from_slice(&LEFT_LUNG_IDS);
    ids
}

pub fn is_canonical(node_id: &str) -> bool {
    canonical_ids().contains(&node_id)
}

/// Derived id for an insert-before ahead of `node_id`: canonical names get a
/// `_0` suffix, already-derived names increment their trailing index. The
/// result sorts stably among repeated insertions ahead of the same anchor.
pub fn next_inserted_id(node_id: &str) -> String {
    if is_canonical(node_id) {
        return format!("{node_id}_0");
    }
    match node_id.rsplit_once('_') {
        Some((base, tail)) => match tail.parse::<usize>() {
            Ok(n) => format!("{}_{}", base, n + 1),
            Err(_) => format!("{node_id}_0"),
        },
        None => format!("{node_id}_0"),
    }
}

fn apply_template(
    tree: &mut BranchTree,
    template: &[(&str, Option<&str>)],
) -> TreeResult<()> {
    for (child, parent) in template {
        tree.insert_after_node(child, *parent, PlaceStatus::NotPlaced)?;
    }
    Ok(())
}

fn right_lung_template(root: &'static str) -> Vec<(&'static str, Option<&'static str>)> {
    vec![
        (BranchName::RIGHT_PULMONARY_ARTERY, Some(root)),
        (
            BranchName::RIGHT_SUPERIOR_LOBAR,
            Some(BranchName::RIGHT_PULMONARY_ARTERY),
        ),
        (BranchName::APICAL_A1_R, Some(BranchName::RIGHT_SUPERIOR_LOBAR)),
        (BranchName::ANTERIOR_A2_R, Some(BranchName::RIGHT_SUPERIOR_LOBAR)),
        (BranchName::POSTERIOR_A3_R, Some(BranchName::RIGHT_SUPERIOR_LOBAR)),
        (
            BranchName::RIGHT_MIDDLE_LOBAR,
            Some(BranchName::RIGHT_SUPERIOR_LOBAR),
        ),
        (BranchName::MEDIAL_A4_R, Some(BranchName::RIGHT_MIDDLE_LOBAR)),
        (BranchName::LATERAL_A5_R, Some(BranchName::RIGHT_MIDDLE_LOBAR)),
        (
            BranchName::RIGHT_INFERIOR_LOBAR,
            Some(BranchName::RIGHT_MIDDLE_LOBAR),
        ),
        (BranchName::SUPERIOR_A6_R, Some(BranchName::RIGHT_INFERIOR_LOBAR)),
        (
            BranchName::ANTERIOR_BASAL_A7_R,
            Some(BranchName::RIGHT_INFERIOR_LOBAR),
        ),
        (
            BranchName::LATERAL_BASAL_A8_R,
            Some(BranchName::RIGHT_INFERIOR_LOBAR),
        ),
        (
            BranchName::MEDIAL_BASAL_A9_R,
            Some(BranchName::RIGHT_INFERIOR_LOBAR),
        ),
        (
            BranchName::POSTERIOR_BASAL_A10_R,
            Some(BranchName::RIGHT_INFERIOR_LOBAR),
        ),
    ]
}

fn left_lung_template() -> Vec<(&'static str, Option<&'static str>)> {
    vec![
        (
            BranchName::LEFT_PULMONARY_ARTERY,
            Some(BranchName::PULMONARY_TRUNK),
        ),
        (
            BranchName::LEFT_SUPERIOR_LOBAR,
            Some(BranchName::LEFT_PULMONARY_ARTERY),
        ),
        (BranchName::APICAL_A1_L, Some(BranchName::LEFT_SUPERIOR_LOBAR)),
        (BranchName::ANTERIOR_A2_L, Some(BranchName::LEFT_SUPERIOR_LOBAR)),
        (BranchName::POSTERIOR_A3_L, Some(BranchName::LEFT_SUPERIOR_LOBAR)),
        (BranchName::LINGULAR, Some(BranchName::LEFT_SUPERIOR_LOBAR)),
        (BranchName::INFERIOR_LINGULAR_A4_L, Some(BranchName::LINGULAR)),
        (BranchName::SUPERIOR_LINGULAR_A5_L, Some(BranchName::LINGULAR)),
        (BranchName::LEFT_INFERIOR_LOBAR, Some(BranchName::LINGULAR)),
        (BranchName::SUPERIOR_A6_L, Some(BranchName::LEFT_INFERIOR_LOBAR)),
        (
            BranchName::ANTERIOR_BASAL_A7_L,
            Some(BranchName::LEFT_INFERIOR_LOBAR),
        ),
        (
            BranchName::LATERAL_BASAL_A8_L,
            Some(BranchName::LEFT_INFERIOR_LOBAR),
        ),
        (
            BranchName::MEDIAL_BASAL_A9_L,
            Some(BranchName::LEFT_INFERIOR_LOBAR),
        ),
        (
            BranchName::POSTERIOR_BASAL_A10_L,
            Some(BranchName::LEFT_INFERIOR_LOBAR),
        ),
    ]
}

/// Default layout with both lungs, rooted at the pulmonary trunk base.
pub fn seed_both_lungs(tree: &mut BranchTree) -> TreeResult<()> {
    let mut template = vec![
        (BranchName::PULMONARY_TRUNK_BASE, None),
        (
            BranchName::PULMONARY_TRUNK,
            Some(BranchName::PULMONARY_TRUNK_BASE),
        ),
    ];
    template.extend(right_lung_template(BranchName::PULMONARY_TRUNK));
    template.extend(left_lung_template());
    apply_template(tree, &template)
}

/// Default layout with the right lung only, rooted at the pulmonary trunk.
pub fn seed_right_lung(tree: &mut BranchTree) -> TreeResult<()> {
    let mut template = vec![(BranchName::PULMONARY_TRUNK, None)];
    template.extend(right_lung_template(BranchName::PULMONARY_TRUNK));
    apply_template(tree, &template)
}
