use crate::errors::{AppError, AppResult};
use crate::model::{NodeId, NodeJson, TreeNode};
use indextree::{Arena, NodeEdge};
use std::collections::HashSet;
use tracing::debug;

type Handle = indextree::NodeId;

pub const DEFAULT_ROOT_HTML: &str = "Root Node";

/// The mind map: a single root owning every node through an arena.
///
/// Lookups walk the tree depth-first from the root; no id index is kept.
/// In-place mutators are crate-private: outside callers obtain new trees
/// through [`crate::service::reduce`].
#[derive(Debug, Clone)]
pub struct Tree {
    arena: Arena<TreeNode>,
    root: Handle,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_HTML)
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.to_json() == other.to_json()
    }
}

impl Tree {
    pub fn new(root_html: impl Into<String>) -> Self {
        Self::from_root(TreeNode::create(None, root_html))
    }

    pub fn from_root(mut root: TreeNode) -> Self {
        root.parent_id = None;
        let mut arena = Arena::new();
        let root = arena.new_node(root);
        Self { arena, root }
    }

    pub fn root(&self) -> &TreeNode {
        self.arena[self.root].get()
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root().id
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<&TreeNode> {
        self.locate(id).map(|handle| self.arena[handle].get())
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.locate(id).is_some()
    }

    /// Children of `id` in sibling order; empty when `id` does not resolve.
    pub fn children(&self, id: &NodeId) -> Vec<&TreeNode> {
        match self.locate(id) {
            Some(handle) => handle
                .children(&self.arena)
                .map(|child| self.arena[child].get())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn child_ids(&self, id: &NodeId) -> Vec<NodeId> {
        self.children(id).into_iter().map(|node| node.id.clone()).collect()
    }

    /// Parent of `id`. Falls back to the root when the node is the root,
    /// is unknown, or names a parent that does not resolve.
    pub fn parent_of(&self, id: &NodeId) -> &TreeNode {
        self.find_by_id(id)
            .and_then(|node| node.parent_id.as_ref())
            .and_then(|parent_id| self.find_by_id(parent_id))
            .unwrap_or_else(|| self.root())
    }

    /// Position of `id` among its parent's children.
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        let parent_id = self.find_by_id(id)?.parent_id.as_ref()?;
        let parent = self.locate(parent_id)?;
        parent
            .children(&self.arena)
            .position(|child| self.arena[child].get().id == *id)
    }

    pub fn node_count(&self) -> usize {
        self.root.descendants(&self.arena).count()
    }

    /// Pre-order walk yielding `(depth, node)`, root at depth 0.
    pub fn walk(&self) -> Vec<(usize, &TreeNode)> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        for edge in self.root.traverse(&self.arena) {
            match edge {
                NodeEdge::Start(handle) => {
                    out.push((depth, self.arena[handle].get()));
                    depth += 1;
                }
                NodeEdge::End(_) => depth -= 1,
            }
        }
        out
    }

    /// Appends `child` under `parent_id`. Refused when the parent is missing
    /// or a node with `child.id` already exists anywhere in the tree.
    pub(crate) fn insert_child(&mut self, parent_id: &NodeId, mut child: TreeNode) -> bool {
        if self.contains(&child.id) {
            debug!(id = %child.id, "insert skipped: id already present");
            return false;
        }
        let Some(parent) = self.locate(parent_id) else {
            debug!(parent = %parent_id, "insert skipped: parent not found");
            return false;
        };

        child.parent_id = Some(parent_id.clone());
        let handle = self.arena.new_node(child);
        parent.append(handle, &mut self.arena);
        true
    }

    pub(crate) fn set_html(&mut self, id: &NodeId, html: &str) -> bool {
        let Some(handle) = self.locate(id) else {
            debug!(%id, "edit skipped: node not found");
            return false;
        };
        let node = self.arena[handle].get_mut();
        if node.html() == html {
            return false;
        }
        node.set_html(html);
        true
    }

    /// Removes `id` together with its descendants. The root is never removed.
    pub(crate) fn delete_subtree_root(&mut self, id: &NodeId) -> bool {
        if id == self.root_id() {
            debug!(%id, "delete refused: node is the root");
            return false;
        }
        let Some(handle) = self.locate(id) else {
            debug!(%id, "delete skipped: node not found");
            return false;
        };
        handle.remove_subtree(&mut self.arena);
        true
    }

    pub fn to_json(&self) -> NodeJson {
        self.node_json(self.root)
    }

    /// Rebuilds a tree from its persisted form. Missing ids are generated,
    /// parent links follow the nesting, duplicate ids are rejected.
    pub fn from_json(json: NodeJson) -> AppResult<Self> {
        let mut seen = HashSet::new();
        let root_id = claim_id(json.id, &mut seen)?;
        if json.parent_id.is_some() {
            debug!(id = %root_id, "root parentId ignored");
        }

        let mut tree = Self::from_root(TreeNode::with_id(root_id, None, json.html));
        let root = tree.root;
        tree.attach_children(root, json.children, &mut seen)?;
        Ok(tree)
    }

    fn attach_children(
        &mut self,
        parent: Handle,
        children: Vec<NodeJson>,
        seen: &mut HashSet<NodeId>,
    ) -> AppResult<()> {
        let parent_id = self.arena[parent].get().id.clone();

        for child in children {
            let id = claim_id(child.id, seen)?;
            if child.parent_id.as_deref() != Some(parent_id.as_str()) {
                debug!(%id, parent = %parent_id, "parentId normalized to enclosing node");
            }

            let handle = self
                .arena
                .new_node(TreeNode::with_id(id, Some(parent_id.clone()), child.html));
            parent.append(handle, &mut self.arena);
            self.attach_children(handle, child.children, seen)?;
        }

        Ok(())
    }

    fn node_json(&self, handle: Handle) -> NodeJson {
        let node = self.arena[handle].get();
        NodeJson {
            id: Some(node.id.to_string()),
            parent_id: node.parent_id.as_ref().map(ToString::to_string),
            html: node.html().to_string(),
            children: handle
                .children(&self.arena)
                .map(|child| self.node_json(child))
                .collect(),
        }
    }

    fn locate(&self, id: &NodeId) -> Option<Handle> {
        self.root
            .descendants(&self.arena)
            .find(|handle| self.arena[*handle].get().id == *id)
    }
}

fn claim_id(id: Option<String>, seen: &mut HashSet<NodeId>) -> AppResult<NodeId> {
    let id = id
        .filter(|id| !id.is_empty())
        .map(NodeId::from)
        .unwrap_or_else(NodeId::generate);
    if !seen.insert(id.clone()) {
        return Err(AppError::DuplicateNodeId(id.to_string()));
    }
    Ok(id)
}
