//! Derived polyline geometry for the branch skeleton.
//!
//! Rebuilt from scratch on every recompute, never incrementally: the tree
//! is small and the sequence depends on global structure.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::points::PointStore;
use crate::domain::tree::BranchTree;

/// Line color as 8-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Self = Self { r: 255, g: 0, b: 0 };
}

/// Cosmetic line settings, pure state held between recomputes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawerStyle {
    pub color: Rgb,
    pub line_width: f64,
    pub opacity: f64,
}

impl Default for DrawerStyle {
    fn default() -> Self {
        Self {
            color: Rgb::RED,
            line_width: 4.0,
            opacity: 1.0,
        }
    }
}

/// Derives a single connected polyline covering the whole tree skeleton.
#[derive(Debug)]
pub struct TreeDrawer {
    polyline: Vec<DVec3>,
    style: DrawerStyle,
    visible: bool,
}

impl Default for TreeDrawer {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeDrawer {
    pub fn new() -> Self {
        Self {
            polyline: Vec::new(),
            style: DrawerStyle::default(),
            visible: true,
        }
    }

    pub fn with_style(style: DrawerStyle) -> Self {
        Self {
            polyline: Vec::new(),
            style,
            visible: true,
        }
    }

    /// Rebuild the polyline from the tree structure and placed points.
    ///
    /// Pre-order from the root; after each child subtree the branch point is
    /// re-emitted, so every edge is covered twice except leaf edges once and
    /// one line renders the whole skeleton. Nodes without a point entry are
    /// skipped (the tree may be partially placed), and a child subtree that
    /// contributes no coordinate emits no backtrack either.
    #[instrument(level = "debug", skip_all)]
    pub fn recompute(&mut self, tree: &BranchTree, points: &PointStore) {
        self.polyline.clear();
        if let Some(root) = tree.root_node_id() {
            let mut sequence = Vec::new();
            Self::extend_sequence(tree, points, &root, &mut sequence);
            self.polyline = sequence;
        }
    }

    fn extend_sequence(
        tree: &BranchTree,
        points: &PointStore,
        node_id: &str,
        sequence: &mut Vec<DVec3>,
    ) {
        let own = points.position_of(node_id);
        if let Some(coord) = own {
            sequence.push(coord);
        }
        let children = tree.children_node_ids(node_id).unwrap_or_default();
        for child in children {
            let before = sequence.len();
            Self::extend_sequence(tree, points, &child, sequence);
            // Backtrack to the branch point only if the subtree drew anything
            if sequence.len() > before {
                if let Some(coord) = own {
                    sequence.push(coord);
                }
            }
        }
    }

    /// Current polyline point sequence.
    pub fn polyline(&self) -> &[DVec3] {
        &self.polyline
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.style.color = color;
    }

    pub fn set_line_width(&mut self, line_width: f64) {
        self.style.line_width = line_width;
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.style.opacity = opacity;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn style(&self) -> &DrawerStyle {
        &self.style
    }

    /// Drop all geometry; cosmetic settings survive for the next recompute.
    pub fn clear(&mut self) {
        self.polyline.clear();
    }
}
