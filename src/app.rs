use crate::config::AppConfig;
use crate::model::{NodeId, TreeNode};
use crate::service::TreeService;
use crate::state::{MindMapEvent, MindMapState};
use crate::tree::Tree;
use std::path::PathBuf;
use std::time::Instant;

/// Single-line text field with a cursor counted in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    /// Node whose content is being edited.
    pub target: NodeId,
    pub text: String,
    pub cursor: usize,
}

impl EditBuffer {
    pub fn new(target: NodeId, text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            target,
            text,
            cursor,
        }
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of a character index.
    pub fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

/// A suggestion request whose answer has not been applied yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGeneration {
    pub ticket: u64,
    pub target: NodeId,
    pub placeholder: NodeId,
}

pub struct AppState {
    pub running: bool,
    pub service: TreeService,
    pub mind_map: MindMapState,
    pub config: AppConfig,
    pub filename: Option<PathBuf>,

    // Text fields
    pub inline_edit: Option<EditBuffer>,
    pub modal_edit: Option<EditBuffer>,

    // Shortcut legend overlay
    pub show_help: bool,

    // Single-flight AI generation
    pub generation: Option<PendingGeneration>,
    next_ticket: u64,

    // Persistence
    pub saved_revision: u64,
    pub last_save_time: Option<Instant>,

    // Message for status line
    pub message: Option<String>,
}

impl AppState {
    /// Starts a session on `tree` with the root selected.
    pub fn new(config: AppConfig, tree: Tree) -> Self {
        let root = tree.root_id().clone();
        let service = TreeService::new(tree).with_max_undo_steps(config.max_undo_steps);
        let saved_revision = service.revision();

        let mut mind_map = MindMapState::new();
        mind_map.send(MindMapEvent::SelectNode(root));

        Self {
            running: true,
            service,
            mind_map,
            config,
            filename: None,
            inline_edit: None,
            modal_edit: None,
            show_help: false,
            generation: None,
            next_ticket: 1,
            saved_revision,
            last_save_time: None,
            message: None,
        }
    }

    pub fn tree(&self) -> &Tree {
        self.service.tree()
    }

    pub fn selected_id(&self) -> Option<&NodeId> {
        self.mind_map.selected_node_id()
    }

    /// The selected node, if the selection still resolves.
    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.selected_id()
            .and_then(|id| self.service.get_node_by_id(id))
    }

    pub fn select(&mut self, id: NodeId) -> bool {
        self.mind_map.send(MindMapEvent::SelectNode(id))
    }

    pub fn is_dirty(&self) -> bool {
        self.service.revision() != self.saved_revision
    }

    pub fn mark_saved(&mut self) {
        self.saved_revision = self.service.revision();
        self.last_save_time = Some(Instant::now());
    }

    pub(crate) fn take_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
