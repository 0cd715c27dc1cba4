//! Branch export for the downstream vessel-extraction algorithm.
//!
//! Iterates the canonical catalog order, not tree order, so extraction
//! receives branches in a stable anatomical sequence regardless of how the
//! tree was edited.

use glam::DVec3;
use serde::Serialize;

use crate::domain::catalog;
use crate::domain::points::PointStore;
use crate::domain::tree::BranchTree;

/// Role of a branch node in the export contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BranchRole {
    None,
    /// Tree root: a start point for vessel fitting.
    Start,
    /// Tree leaf: an end point for vessel fitting.
    End,
}

/// One exported branch with its role and coordinate when placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchEntry {
    pub name: String,
    pub role: BranchRole,
    pub position: Option<DVec3>,
}

/// Named branch segments handed off to the extraction algorithm.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BranchExport {
    entries: Vec<BranchEntry>,
}

impl BranchExport {
    /// Collect every canonical branch present in the tree, in catalog order.
    pub fn collect(tree: &BranchTree, points: &PointStore) -> Self {
        let mut entries = Vec::new();
        for name in catalog::canonical_ids() {
            if !tree.is_in_tree(name) {
                continue;
            }
            let role = if tree.is_root(name).unwrap_or(false) {
                BranchRole::Start
            } else if tree.is_leaf(name).unwrap_or(false) {
                BranchRole::End
            } else {
                BranchRole::None
            };
            entries.push(BranchEntry {
                name: name.to_string(),
                role,
                position: points.position_of(name),
            });
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[BranchEntry] {
        &self.entries
    }

    /// Branch names in export order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Coordinates of root branches.
    pub fn start_points(&self) -> Vec<DVec3> {
        self.role_points(BranchRole::Start)
    }

    /// Coordinates of leaf branches.
    pub fn end_points(&self) -> Vec<DVec3> {
        self.role_points(BranchRole::End)
    }

    fn role_points(&self, role: BranchRole) -> Vec<DVec3> {
        self.entries
            .iter()
            .filter(|e| e.role == role)
            .filter_map(|e| e.position)
            .collect()
    }
}
