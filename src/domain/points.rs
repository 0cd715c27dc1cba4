//! Flat, insertion-ordered store of placed 3D markers.
//!
//! Entries are appended in placement order, never reordered, and addressed
//! by label through a linear scan. Zero or one entry exists per placed
//! branch node; unplaced nodes have none.

use glam::DVec3;
use tracing::instrument;

use crate::domain::error::{TreeError, TreeResult};

/// One placed marker in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePoint {
    /// Label; equals a branch node id once finalized
    pub label: String,
    pub position: DVec3,
    pub visible: bool,
}

/// Insertion-ordered collection of labeled scene points.
#[derive(Debug)]
pub struct PointStore {
    points: Vec<ScenePoint>,
    /// Mirrors the host markup lock: locked points cannot be drag-edited
    locked: bool,
}

impl Default for PointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PointStore {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            locked: true,
        }
    }

    fn index_of_checked(&self, label: &str) -> TreeResult<usize> {
        self.index_of(label)
            .ok_or_else(|| TreeError::UnknownLabel(label.to_string()))
    }

    /// Append a labeled point. Placement always appends; label collisions
    /// are prevented by the wizard before calling.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, label: &str, position: DVec3) -> usize {
        self.points.push(ScenePoint {
            label: label.to_string(),
            position,
            visible: true,
        });
        self.points.len() - 1
    }

    /// Rewrite the label of the matching entry in place.
    pub fn rename(&mut self, old_label: &str, new_label: &str) -> TreeResult<()> {
        let idx = self.index_of_checked(old_label)?;
        self.points[idx].label = new_label.to_string();
        Ok(())
    }

    /// Relabel the newest entry; the wizard finalizes freshly placed scene
    /// points this way.
    pub fn rename_last(&mut self, new_label: &str) -> TreeResult<()> {
        match self.points.last_mut() {
            Some(point) => {
                point.label = new_label.to_string();
                Ok(())
            }
            None => Err(TreeError::PointIndexOutOfRange(0)),
        }
    }

    /// Delete the entry with the given label, if present.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, label: &str) -> bool {
        match self.index_of(label) {
            Some(idx) => {
                self.points.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.points.iter().position(|p| p.label == label)
    }

    pub fn position_of(&self, label: &str) -> Option<DVec3> {
        self.points
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.position)
    }

    pub fn set_visible(&mut self, label: &str, visible: bool) -> TreeResult<()> {
        let idx = self.index_of_checked(label)?;
        self.points[idx].visible = visible;
        Ok(())
    }

    /// Update a point position by index; drag-editing reports through here.
    pub fn set_position(&mut self, index: usize, position: DVec3) -> TreeResult<()> {
        let point = self
            .points
            .get_mut(index)
            .ok_or(TreeError::PointIndexOutOfRange(index))?;
        point.position = position;
        Ok(())
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenePoint> {
        self.points.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ScenePoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
