//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Structural violations in the branch tree or point store.
///
/// These indicate a tree/point-store desynchronization bug in the caller and
/// are surfaced loudly. Recoverable user errors (rename collision, root
/// removal) are reported as `Ok(false)` by the operations themselves.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("unknown parent node: {0}")]
    UnknownParent(String),

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("reparenting {node} under {new_parent} would create a cycle")]
    WouldCycle { node: String, new_parent: String },

    #[error("no point labeled: {0}")]
    UnknownLabel(String),

    #[error("point index out of range: {0}")]
    PointIndexOutOfRange(usize),

    #[error("internal tree operation failed: {0}")]
    InternalError(String),
}

pub type TreeResult<T> = Result<T, TreeError>;
