use crate::model::{NodeId, TreeNode};
use crate::tree::Tree;
use tracing::debug;

pub const DEFAULT_MAX_UNDO_STEPS: usize = 24;

/// One atomic mutation request against a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert { parent_id: NodeId, html: String },
    EditContent { id: NodeId, html: String },
    Delete { id: NodeId },
}

/// Result of applying a [`Command`]: the next tree plus the id of the node
/// an `Insert` created.
#[derive(Debug, Clone)]
pub struct Transition {
    pub tree: Tree,
    pub inserted: Option<NodeId>,
    pub changed: bool,
}

/// Pure transition function. `state` is never modified; commands that
/// reference unknown ids, or try to delete the root, return an equal tree.
pub fn reduce(state: &Tree, command: &Command) -> Transition {
    let mut tree = state.clone();

    let (changed, inserted) = match command {
        Command::Insert { parent_id, html } => {
            let node = TreeNode::create(Some(parent_id.clone()), html.clone());
            let id = node.id.clone();
            if tree.insert_child(parent_id, node) {
                (true, Some(id))
            } else {
                (false, None)
            }
        }
        Command::EditContent { id, html } => (tree.set_html(id, html), None),
        Command::Delete { id } => (tree.delete_subtree_root(id), None),
    };

    Transition {
        tree,
        inserted,
        changed,
    }
}

/// Holds the current tree and applies commands through [`reduce`].
///
/// Tracked commands record the previous tree for undo. Untracked commands
/// (transient placeholder nodes) change the tree without touching history.
#[derive(Debug, Clone)]
pub struct TreeService {
    tree: Tree,
    revision: u64,
    undo_stack: Vec<Tree>,
    redo_stack: Vec<Tree>,
    max_undo_steps: usize,
}

impl Default for TreeService {
    fn default() -> Self {
        Self::new(Tree::default())
    }
}

impl TreeService {
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            revision: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_steps: DEFAULT_MAX_UNDO_STEPS,
        }
    }

    pub fn with_max_undo_steps(mut self, steps: usize) -> Self {
        self.max_undo_steps = steps.max(1);
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Bumped on every effective tracked change, including undo and redo.
    /// Untracked commands leave it alone so transient nodes never make the
    /// map look modified.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dispatch(&mut self, command: Command) -> Option<NodeId> {
        self.apply(command, true)
    }

    pub fn dispatch_untracked(&mut self, command: Command) -> Option<NodeId> {
        self.apply(command, false)
    }

    /// Applies `commands` in order as a single undo step. Returns the ids of
    /// the inserted nodes.
    pub fn dispatch_batch(&mut self, commands: impl IntoIterator<Item = Command>) -> Vec<NodeId> {
        let mut tree = self.tree.clone();
        let mut inserted = Vec::new();
        let mut changed = false;

        for command in commands {
            let transition = reduce(&tree, &command);
            if transition.changed {
                changed = true;
                tree = transition.tree;
                inserted.extend(transition.inserted);
            } else {
                debug!(?command, "batched command left the tree unchanged");
            }
        }

        if changed {
            let previous = std::mem::replace(&mut self.tree, tree);
            self.record(previous);
            self.revision += 1;
        }
        inserted
    }

    /// Removes a node from every tree kept for undo and redo, so a transient
    /// node cannot come back through history.
    pub fn forget_node(&mut self, id: &NodeId) {
        for tree in self.undo_stack.iter_mut().chain(self.redo_stack.iter_mut()) {
            tree.delete_subtree_root(id);
        }
    }

    pub fn insert_node(&mut self, parent_id: &NodeId, html: impl Into<String>) -> Option<NodeId> {
        self.dispatch(Command::Insert {
            parent_id: parent_id.clone(),
            html: html.into(),
        })
    }

    pub fn edit_node_html(&mut self, id: &NodeId, html: impl Into<String>) {
        self.dispatch(Command::EditContent {
            id: id.clone(),
            html: html.into(),
        });
    }

    pub fn delete_node(&mut self, id: &NodeId) {
        self.dispatch(Command::Delete { id: id.clone() });
    }

    pub fn get_node_by_id(&self, id: &NodeId) -> Option<&TreeNode> {
        self.tree.find_by_id(id)
    }

    pub fn get_parent_node(&self, id: &NodeId) -> &TreeNode {
        self.tree.parent_of(id)
    }

    pub fn find_node_index(&self, id: &NodeId) -> Option<usize> {
        self.tree.index_of(id)
    }

    /// Replaces the whole tree, e.g. after loading a file. Clears history.
    pub fn replace_tree(&mut self, tree: Tree) {
        self.tree = tree;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.revision += 1;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.tree, previous);
        self.redo_stack.push(current);
        self.revision += 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.tree, next);
        self.undo_stack.push(current);
        self.revision += 1;
        true
    }

    fn apply(&mut self, command: Command, tracked: bool) -> Option<NodeId> {
        let transition = reduce(&self.tree, &command);
        if !transition.changed {
            debug!(?command, "command left the tree unchanged");
            return None;
        }

        let previous = std::mem::replace(&mut self.tree, transition.tree);
        if tracked {
            self.record(previous);
            self.revision += 1;
        }
        transition.inserted
    }

    fn record(&mut self, previous: Tree) {
        self.undo_stack.push(previous);
        if self.undo_stack.len() > self.max_undo_steps {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(tree: &Tree, parent: &NodeId, html: &str) -> (Tree, NodeId) {
        let transition = reduce(
            tree,
            &Command::Insert {
                parent_id: parent.clone(),
                html: html.to_string(),
            },
        );
        let id = transition.inserted.expect("insert should succeed");
        (transition.tree, id)
    }

    #[test]
    fn test_insert_returns_new_id_and_new_tree() {
        let tree = Tree::default();
        let root = tree.root_id().clone();

        let (next, id) = insert(&tree, &root, "<div>first</div>");

        assert_ne!(next, tree);
        assert_eq!(tree.node_count(), 1, "input tree must not change");
        let node = next.find_by_id(&id).unwrap();
        assert_eq!(node.html(), "<div>first</div>");
        assert_eq!(node.parent_id.as_ref(), Some(&root));
    }

    #[test]
    fn test_insert_appends_after_last_child() {
        let tree = Tree::default();
        let root = tree.root_id().clone();
        let (tree, first) = insert(&tree, &root, "1");
        let (tree, second) = insert(&tree, &root, "2");

        assert_eq!(tree.child_ids(&root), vec![first, second]);
    }

    #[test]
    fn test_insert_unknown_parent_is_noop() {
        let tree = Tree::default();
        let transition = reduce(
            &tree,
            &Command::Insert {
                parent_id: NodeId::from("ghost"),
                html: String::new(),
            },
        );

        assert!(!transition.changed);
        assert!(transition.inserted.is_none());
        assert_eq!(transition.tree, tree);
    }

    #[test]
    fn test_edit_content_changes_only_content() {
        let tree = Tree::default();
        let root = tree.root_id().clone();
        let (tree, child) = insert(&tree, &root, "old");

        let transition = reduce(
            &tree,
            &Command::EditContent {
                id: child.clone(),
                html: "new".to_string(),
            },
        );

        assert!(transition.changed);
        assert_eq!(transition.tree.find_by_id(&child).unwrap().html(), "new");
        assert_eq!(transition.tree.child_ids(&root), tree.child_ids(&root));
        assert_eq!(tree.find_by_id(&child).unwrap().html(), "old");
    }

    #[test]
    fn test_edit_unknown_id_yields_equal_tree() {
        let tree = Tree::default();
        let transition = reduce(
            &tree,
            &Command::EditContent {
                id: NodeId::from("ghost"),
                html: "x".to_string(),
            },
        );
        assert!(!transition.changed);
        assert_eq!(transition.tree, tree);
    }

    #[test]
    fn test_delete_root_is_noop() {
        let tree = Tree::default();
        let root = tree.root_id().clone();
        let (tree, _) = insert(&tree, &root, "child");

        let transition = reduce(&tree, &Command::Delete { id: root });
        assert!(!transition.changed);
        assert_eq!(transition.tree, tree);
    }

    #[test]
    fn test_delete_keeps_sibling_order() {
        let tree = Tree::default();
        let root = tree.root_id().clone();
        let (tree, a) = insert(&tree, &root, "a");
        let (tree, b) = insert(&tree, &root, "b");
        let (tree, c) = insert(&tree, &root, "c");
        let (tree, grandchild) = insert(&tree, &b, "under b");

        let transition = reduce(&tree, &Command::Delete { id: b.clone() });

        assert!(transition.changed);
        assert_eq!(transition.tree.child_ids(&root), vec![a, c]);
        assert!(transition.tree.find_by_id(&b).is_none());
        assert!(transition.tree.find_by_id(&grandchild).is_none());
    }

    #[test]
    fn test_service_api_and_revision() {
        let mut service = TreeService::default();
        let root = service.tree().root_id().clone();
        assert_eq!(service.revision(), 0);

        let child = service.insert_node(&root, "").unwrap();
        assert_eq!(service.revision(), 1);
        assert_eq!(service.find_node_index(&child), Some(0));
        assert_eq!(service.get_parent_node(&child).id, root);

        service.edit_node_html(&NodeId::from("ghost"), "x");
        assert_eq!(service.revision(), 1);

        service.delete_node(&root);
        assert_eq!(service.revision(), 1);
        assert!(service.get_node_by_id(&root).is_some());
    }

    #[test]
    fn test_undo_redo() {
        let mut service = TreeService::default();
        let root = service.tree().root_id().clone();
        let child = service.insert_node(&root, "<div>a</div>").unwrap();
        service.edit_node_html(&child, "<div>b</div>");

        assert!(service.undo());
        assert_eq!(service.get_node_by_id(&child).unwrap().html(), "<div>a</div>");
        assert!(service.undo());
        assert!(service.get_node_by_id(&child).is_none());
        assert!(!service.undo());

        assert!(service.redo());
        assert!(service.redo());
        assert_eq!(service.get_node_by_id(&child).unwrap().html(), "<div>b</div>");
        assert!(!service.redo());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut service = TreeService::default();
        let root = service.tree().root_id().clone();
        service.insert_node(&root, "a");
        service.undo();
        assert!(service.can_redo());

        service.insert_node(&root, "b");
        assert!(!service.can_redo());
    }

    #[test]
    fn test_untracked_commands_skip_history() {
        let mut service = TreeService::default();
        let root = service.tree().root_id().clone();

        let placeholder = service
            .dispatch_untracked(Command::Insert {
                parent_id: root.clone(),
                html: "loading".to_string(),
            })
            .unwrap();
        assert!(!service.can_undo());

        service.dispatch_untracked(Command::Delete { id: placeholder });
        assert!(!service.can_undo());
        assert_eq!(service.revision(), 0);
    }

    #[test]
    fn test_batch_is_one_undo_step() {
        let mut service = TreeService::default();
        let root = service.tree().root_id().clone();

        let ids = service.dispatch_batch(["a", "b", "c"].map(|html| Command::Insert {
            parent_id: root.clone(),
            html: html.to_string(),
        }));
        assert_eq!(ids.len(), 3);
        assert_eq!(service.tree().child_ids(&root), ids);
        assert_eq!(service.revision(), 1);

        assert!(service.undo());
        assert!(service.tree().child_ids(&root).is_empty());
        assert!(!service.can_undo());
    }

    #[test]
    fn test_empty_batch_changes_nothing() {
        let mut service = TreeService::default();
        assert!(service.dispatch_batch(Vec::new()).is_empty());
        assert_eq!(service.revision(), 0);
        assert!(!service.can_undo());
    }

    #[test]
    fn test_forget_node_scrubs_history() {
        let mut service = TreeService::default();
        let root = service.tree().root_id().clone();
        let placeholder = service
            .dispatch_untracked(Command::Insert {
                parent_id: root.clone(),
                html: "loading".to_string(),
            })
            .unwrap();
        // A tracked change while the placeholder exists snapshots it.
        service.insert_node(&root, "real");
        service.dispatch_untracked(Command::Delete {
            id: placeholder.clone(),
        });
        service.forget_node(&placeholder);

        assert!(service.undo());
        assert!(service.get_node_by_id(&placeholder).is_none());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut service = TreeService::default().with_max_undo_steps(2);
        let root = service.tree().root_id().clone();
        for i in 0..5 {
            service.insert_node(&root, i.to_string());
        }

        assert!(service.undo());
        assert!(service.undo());
        assert!(!service.undo());
        assert_eq!(service.tree().children(&root).len(), 3);
    }
}
