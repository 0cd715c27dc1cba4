//! Arena-based branch node hierarchy.
//!
//! Nodes are owned by a generational arena; the parent link is a non-owning
//! arena index, children are an ordered index list. The tree keeps at most
//! one root except transiently between a drag-drop restructuring and the
//! [`BranchTree::enforce_one_root`] repair that follows it.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::error::{TreeError, TreeResult};

/// Placement state of a single branch node.
///
/// Transitions are driven exclusively by the placement wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceStatus {
    NotPlaced,
    Placing,
    Placed,
    InsertBefore,
}

/// One anatomical branch point in the hierarchy.
#[derive(Debug)]
pub struct BranchNode {
    /// Unique, user-renamable node identifier
    pub id: String,
    /// Placement state, wizard-driven
    pub status: PlaceStatus,
    /// Index of the parent node, None for top-level nodes
    pub parent: Option<Index>,
    /// Ordered indices of child nodes
    pub children: Vec<Index>,
}

/// Ordered hierarchy of named branch nodes.
#[derive(Debug)]
pub struct BranchTree {
    arena: Arena<BranchNode>,
    /// Top-level nodes; more than one only between a drop and `enforce_one_root`
    roots: Vec<Index>,
    ids: HashMap<String, Index>,
}

impl Default for BranchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn lookup(&self, node_id: &str) -> TreeResult<Index> {
        self.ids
            .get(node_id)
            .copied()
            .ok_or_else(|| TreeError::UnknownNode(node_id.to_string()))
    }

    fn node(&self, idx: Index) -> &BranchNode {
        &self.arena[idx]
    }

    /// True if `candidate` sits in the subtree rooted at `ancestor`.
    fn is_descendant(&self, ancestor: Index, candidate: Index) -> bool {
        let mut cur = candidate;
        while let Some(parent) = self.node(cur).parent {
            if parent == ancestor {
                return true;
            }
            cur = parent;
        }
        false
    }

    /// Unlink `idx` from its parent's child list or from the top-level list.
    fn detach(&mut self, idx: Index) {
        match self.arena[idx].parent.take() {
            Some(parent) => self.arena[parent].children.retain(|&c| c != idx),
            None => self.roots.retain(|&r| r != idx),
        }
    }

    /// Insert or reposition `node_id` as a child of `parent_id`.
    ///
    /// With no parent: an empty tree gains its root; otherwise the new node
    /// becomes the root and the old root is demoted to its child. An already
    /// present `node_id` is moved (subtree intact) rather than duplicated.
    ///
    /// # Errors
    /// `UnknownParent` if `parent_id` is set but absent, `WouldCycle` when
    /// repositioning a node under its own descendant.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_after_node(
        &mut self,
        node_id: &str,
        parent_id: Option<&str>,
        status: PlaceStatus,
    ) -> TreeResult<()> {
        let parent_idx = match parent_id {
            Some(pid) => Some(
                self.ids
                    .get(pid)
                    .copied()
                    .ok_or_else(|| TreeError::UnknownParent(pid.to_string()))?,
            ),
            None => None,
        };

        let idx = match self.ids.get(node_id).copied() {
            Some(existing) => {
                if let Some(pidx) = parent_idx {
                    if pidx == existing || self.is_descendant(existing, pidx) {
                        return Err(TreeError::WouldCycle {
                            node: node_id.to_string(),
                            new_parent: parent_id.unwrap_or_default().to_string(),
                        });
                    }
                }
                self.detach(existing);
                self.arena[existing].status = status;
                existing
            }
            None => {
                let idx = self.arena.insert(BranchNode {
                    id: node_id.to_string(),
                    status,
                    parent: None,
                    children: Vec::new(),
                });
                self.ids.insert(node_id.to_string(), idx);
                idx
            }
        };

        match parent_idx {
            Some(pidx) => {
                self.arena[pidx].children.push(idx);
                self.arena[idx].parent = Some(pidx);
            }
            None => match self.roots.first().copied() {
                None => self.roots.push(idx),
                Some(old_root) => {
                    self.roots.remove(0);
                    self.arena[old_root].parent = Some(idx);
                    self.arena[idx].children.push(old_root);
                    self.roots.insert(0, idx);
                }
            },
        }
        Ok(())
    }

    /// Insert `node_id` as the new parent of the subtree rooted at
    /// `before_id`, taking its former position.
    ///
    /// # Errors
    /// `UnknownNode` if `before_id` is absent, `DuplicateNode` if `node_id`
    /// already exists (rejected before any mutation).
    #[instrument(level = "debug", skip(self))]
    pub fn insert_before_node(
        &mut self,
        node_id: &str,
        before_id: &str,
        status: PlaceStatus,
    ) -> TreeResult<()> {
        let before = self.lookup(before_id)?;
        if self.ids.contains_key(node_id) {
            return Err(TreeError::DuplicateNode(node_id.to_string()));
        }

        let parent = self.node(before).parent;
        let idx = self.arena.insert(BranchNode {
            id: node_id.to_string(),
            status,
            parent,
            children: vec![before],
        });
        self.ids.insert(node_id.to_string(), idx);

        match parent {
            Some(pidx) => {
                let slot = self.arena[pidx]
                    .children
                    .iter()
                    .position(|&c| c == before)
                    .ok_or_else(|| TreeError::InternalError("child not in parent list".into()))?;
                self.arena[pidx].children[slot] = idx;
            }
            None => {
                let slot = self.roots.iter().position(|&r| r == before).ok_or_else(|| {
                    TreeError::InternalError("top-level node not in root list".into())
                })?;
                self.roots[slot] = idx;
            }
        }
        self.arena[before].parent = Some(idx);
        Ok(())
    }

    /// Remove `node_id`, reparenting its children onto its former parent in
    /// their original order. Refuses on the root and returns `Ok(false)`: a
    /// non-empty tree always keeps a root unless fully cleared.
    ///
    /// # Errors
    /// `UnknownNode` if the node is absent.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&mut self, node_id: &str) -> TreeResult<bool> {
        let idx = self.lookup(node_id)?;
        let Some(parent) = self.node(idx).parent else {
            return Ok(false);
        };

        self.arena[parent].children.retain(|&c| c != idx);
        let children = std::mem::take(&mut self.arena[idx].children);
        for &child in &children {
            self.arena[child].parent = Some(parent);
        }
        self.arena[parent].children.extend(children);

        self.arena.remove(idx);
        self.ids.remove(node_id);
        Ok(true)
    }

    /// Move `node_id` (subtree intact) under `new_parent`, or to the
    /// top-level list when `new_parent` is None. Models the UI drag-drop;
    /// callers follow up with [`BranchTree::enforce_one_root`].
    #[instrument(level = "debug", skip(self))]
    pub fn reparent(&mut self, node_id: &str, new_parent: Option<&str>) -> TreeResult<()> {
        let idx = self.lookup(node_id)?;
        let parent_idx = match new_parent {
            Some(pid) => {
                let pidx = self
                    .ids
                    .get(pid)
                    .copied()
                    .ok_or_else(|| TreeError::UnknownParent(pid.to_string()))?;
                if pidx == idx || self.is_descendant(idx, pidx) {
                    return Err(TreeError::WouldCycle {
                        node: node_id.to_string(),
                        new_parent: pid.to_string(),
                    });
                }
                Some(pidx)
            }
            None => None,
        };

        self.detach(idx);
        match parent_idx {
            Some(pidx) => {
                self.arena[pidx].children.push(idx);
                self.arena[idx].parent = Some(pidx);
            }
            None => self.roots.push(idx),
        }
        Ok(())
    }

    /// Invariant repair after operations that may leave several top-level
    /// nodes: folds the second top-level node into becoming parent of the
    /// first until one root remains.
    #[instrument(level = "debug", skip(self))]
    pub fn enforce_one_root(&mut self) {
        while self.roots.len() > 1 {
            let new_root = self.roots.remove(1);
            let current = self.roots.remove(0);
            self.arena[current].parent = Some(new_root);
            self.arena[new_root].children.push(current);
            self.roots.insert(0, new_root);
        }
    }

    pub fn parent_node_id(&self, node_id: &str) -> TreeResult<Option<String>> {
        let idx = self.lookup(node_id)?;
        Ok(self.node(idx).parent.map(|p| self.node(p).id.clone()))
    }

    pub fn children_node_ids(&self, node_id: &str) -> TreeResult<Vec<String>> {
        let idx = self.lookup(node_id)?;
        Ok(self
            .node(idx)
            .children
            .iter()
            .map(|&c| self.node(c).id.clone())
            .collect())
    }

    fn sibling_id(&self, node_id: &str, offset: isize) -> TreeResult<Option<String>> {
        let idx = self.lookup(node_id)?;
        let Some(parent) = self.node(idx).parent else {
            return Ok(None);
        };
        let siblings = &self.node(parent).children;
        let pos = siblings
            .iter()
            .position(|&c| c == idx)
            .ok_or_else(|| TreeError::InternalError("child not in parent list".into()))?;
        let target = pos as isize + offset;
        if target < 0 || target as usize >= siblings.len() {
            return Ok(None);
        }
        Ok(Some(self.node(siblings[target as usize]).id.clone()))
    }

    pub fn next_sibling_node_id(&self, node_id: &str) -> TreeResult<Option<String>> {
        self.sibling_id(node_id, 1)
    }

    pub fn previous_sibling_node_id(&self, node_id: &str) -> TreeResult<Option<String>> {
        self.sibling_id(node_id, -1)
    }

    /// True if the node has no parent.
    pub fn is_root(&self, node_id: &str) -> TreeResult<bool> {
        Ok(self.node(self.lookup(node_id)?).parent.is_none())
    }

    /// True if the node has no children.
    pub fn is_leaf(&self, node_id: &str) -> TreeResult<bool> {
        Ok(self.node(self.lookup(node_id)?).children.is_empty())
    }

    /// Id of the first root, None on an empty tree.
    pub fn root_node_id(&self) -> Option<String> {
        self.roots.first().map(|&r| self.node(r).id.clone())
    }

    pub fn is_in_tree(&self, node_id: &str) -> bool {
        self.ids.contains_key(node_id)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Breadth-first `(parent, child)` adjacency pairs, roots listed first
    /// as `(None, root_id)`. Pair count equals node count.
    #[instrument(level = "debug", skip(self))]
    pub fn tree_parent_list(&self) -> Vec<(Option<String>, String)> {
        let mut pairs: Vec<(Option<String>, String)> = self
            .roots
            .iter()
            .map(|&r| (None, self.node(r).id.clone()))
            .collect();
        let mut queue: VecDeque<Index> = self.roots.iter().copied().collect();
        while let Some(idx) = queue.pop_front() {
            let node = self.node(idx);
            for &child in &node.children {
                pairs.push((Some(node.id.clone()), self.node(child).id.clone()));
                queue.push_back(child);
            }
        }
        pairs
    }

    /// Every node id in breadth-first order from the roots.
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.arena.len());
        let mut queue: VecDeque<Index> = self.roots.iter().copied().collect();
        while let Some(idx) = queue.pop_front() {
            let node = self.node(idx);
            ids.push(node.id.clone());
            queue.extend(node.children.iter().copied());
        }
        ids
    }

    pub fn status(&self, node_id: &str) -> TreeResult<PlaceStatus> {
        Ok(self.node(self.lookup(node_id)?).status)
    }

    pub fn set_status(&mut self, node_id: &str, status: PlaceStatus) -> TreeResult<()> {
        let idx = self.lookup(node_id)?;
        self.arena[idx].status = status;
        Ok(())
    }

    /// Pre-order successor: first child, else next sibling, else the next
    /// sibling of the nearest ancestor that has one. Does not cross between
    /// top-level nodes.
    fn preorder_successor(&self, idx: Index) -> Option<Index> {
        if let Some(&first) = self.node(idx).children.first() {
            return Some(first);
        }
        let mut cur = idx;
        loop {
            let parent = self.node(cur).parent?;
            let siblings = &self.node(parent).children;
            let pos = siblings.iter().position(|&c| c == cur)?;
            if pos + 1 < siblings.len() {
                return Some(siblings[pos + 1]);
            }
            cur = parent;
        }
    }

    /// First node at or after `node_id` in pre-order whose status is
    /// [`PlaceStatus::NotPlaced`], None when all following nodes are placed.
    pub fn next_unplaced_node(&self, node_id: &str) -> TreeResult<Option<String>> {
        let mut cur = self.lookup(node_id)?;
        loop {
            let node = self.node(cur);
            if node.status == PlaceStatus::NotPlaced {
                return Ok(Some(node.id.clone()));
            }
            match self.preorder_successor(cur) {
                Some(next) => cur = next,
                None => return Ok(None),
            }
        }
    }

    /// Node ids already placed in the scene, breadth-first order.
    pub fn placed_node_list(&self) -> Vec<String> {
        self.node_ids()
            .into_iter()
            .filter(|id| matches!(self.status(id), Ok(PlaceStatus::Placed)))
            .collect()
    }

    /// True when every node is placed. False on an empty tree, so a cleared
    /// tree never reads as complete.
    pub fn are_all_nodes_placed(&self) -> bool {
        !self.arena.is_empty()
            && self
                .arena
                .iter()
                .all(|(_, node)| node.status == PlaceStatus::Placed)
    }

    /// Rename a node. Renaming to another node's id is a recoverable user
    /// error: rejected with `Ok(false)`, nothing changes. Renaming to the
    /// current name is accepted as a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn rename_node(&mut self, old_id: &str, new_id: &str) -> TreeResult<bool> {
        let idx = self.lookup(old_id)?;
        if old_id == new_id {
            return Ok(true);
        }
        if self.ids.contains_key(new_id) {
            return Ok(false);
        }
        self.arena[idx].id = new_id.to_string();
        self.ids.remove(old_id);
        self.ids.insert(new_id.to_string(), idx);
        Ok(true)
    }

    /// Add a node with a generated `n<k>` id. Without an explicit parent the
    /// node goes under the single existing node, or under the parent of the
    /// last adjacency pair; an empty tree gains it as root.
    #[instrument(level = "debug", skip(self))]
    pub fn add_generated_node(&mut self, parent_id: Option<&str>) -> TreeResult<String> {
        let mut k = self.node_count();
        let mut new_id = format!("n{k}");
        while self.is_in_tree(&new_id) {
            k += 1;
            new_id = format!("n{k}");
        }

        let parent = match parent_id {
            Some(pid) => Some(pid.to_string()),
            None => match self.node_count() {
                0 => None,
                1 => self.root_node_id(),
                _ => self
                    .tree_parent_list()
                    .last()
                    .and_then(|(parent, _)| parent.clone()),
            },
        };
        self.insert_after_node(&new_id, parent.as_deref(), PlaceStatus::NotPlaced)?;
        Ok(new_id)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.roots.clear();
        self.ids.clear();
    }

    fn subtree_display(&self, idx: Index) -> Tree<String> {
        let node = self.node(idx);
        Tree::new(node.id.clone()).with_leaves(
            node.children
                .iter()
                .map(|&child| self.subtree_display(child)),
        )
    }

    /// Render the hierarchy as an indented tree.
    pub fn to_tree_string(&self) -> Tree<String> {
        match self.roots.first() {
            Some(&root) => self.subtree_display(root),
            None => Tree::new("<empty tree>".to_string()),
        }
    }
}

impl fmt::Display for BranchTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree_string())
    }
}
