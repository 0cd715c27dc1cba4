//! Domain layer: branch hierarchy, point store and canonical catalog
//!
//! This layer is independent of external concerns (no host scene, no UI).

pub mod catalog;
pub mod error;
pub mod points;
pub mod tree;

pub use catalog::{
    canonical_ids, is_canonical, next_inserted_id, seed_both_lungs, seed_right_lung, BranchName,
    LEFT_LUNG_IDS, RIGHT_LUNG_IDS,
};
pub use error::{TreeError, TreeResult};
pub use points::{PointStore, ScenePoint};
pub use tree::{BranchNode, BranchTree, PlaceStatus};
