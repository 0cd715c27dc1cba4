//! Branch-tree annotation core for vessel extraction.
//!
//! Hosts a hierarchical tree of named anatomical branch nodes with
//! placement status, a flat insertion-ordered store of placed 3D markers,
//! a guided placement wizard keeping both in sync, derived polyline
//! geometry for rendering the skeleton, and a canonical-order branch export
//! for downstream vessel-fitting algorithms.
//!
//! The crate is single-threaded and callback-driven: the host forwards raw
//! tree-view gestures and scene events to [`PlacementWizard`], which is the
//! only writer of the tree, the points and the geometry. The host reads the
//! model back and drains typed [`WizardEvent`] notifications after each
//! call.
//!
//! ```
//! use vesseltree::{
//!     seed_right_lung, PlacementWizard, TogglePlaceMode, TreeColumn,
//! };
//!
//! # fn main() -> vesseltree::TreeResult<()> {
//! let mut wizard = PlacementWizard::new(Box::new(TogglePlaceMode::new()), seed_right_lung)?;
//! let root = wizard.tree().root_node_id().unwrap();
//! wizard.on_item_clicked(&root, TreeColumn::Name)?;
//! wizard.on_point_added(glam::DVec3::new(12.0, -4.5, 88.0))?;
//! assert_eq!(wizard.points().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod util;

pub use application::{
    BranchEntry, BranchExport, BranchRole, DrawerStyle, InteractionStatus, Key, PlacementWizard,
    Rgb, SeedFn, TreeColumn, TreeDrawer, WizardEvent,
};
pub use domain::{
    canonical_ids, is_canonical, next_inserted_id, seed_both_lungs, seed_right_lung, BranchName,
    BranchTree, PlaceStatus, PointStore, ScenePoint, TreeError, TreeResult,
};
pub use infrastructure::{PlaceProvider, TogglePlaceMode};
