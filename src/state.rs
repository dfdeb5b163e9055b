use crate::model::NodeId;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selected,
    Editing,
    Generating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MindMapEvent {
    SelectNode(NodeId),
    ReselectNode,
    StartEditing,
    FinishEditing,
    CancelEditing,
    StartAiGeneration,
    FinishAiGeneration,
}

/// Selection and interaction state. Events that are not legal in the
/// current phase are rejected and leave the state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindMapState {
    phase: Phase,
    selected_node_id: Option<NodeId>,
    previous_node_id: Option<NodeId>,
    keyboard_enabled: bool,
    editor_modal_open: bool,
}

impl Default for MindMapState {
    fn default() -> Self {
        Self::new()
    }
}

impl MindMapState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            selected_node_id: None,
            previous_node_id: None,
            keyboard_enabled: true,
            editor_modal_open: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.selected_node_id.as_ref()
    }

    pub fn previous_node_id(&self) -> Option<&NodeId> {
        self.previous_node_id.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.phase == Phase::Editing
    }

    pub fn is_generating(&self) -> bool {
        self.phase == Phase::Generating
    }

    pub fn keyboard_enabled(&self) -> bool {
        self.keyboard_enabled
    }

    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        self.keyboard_enabled = enabled;
    }

    pub fn editor_modal_open(&self) -> bool {
        self.editor_modal_open
    }

    /// Opening the modal hands the keyboard to the modal's own text field.
    pub fn set_editor_modal_open(&mut self, open: bool) {
        self.editor_modal_open = open;
        self.keyboard_enabled = !open;
    }

    pub fn send(&mut self, event: MindMapEvent) -> bool {
        use MindMapEvent::*;
        use Phase::*;

        let next = match (self.phase, event) {
            (Idle | Selected, SelectNode(id)) => {
                self.select(id);
                Selected
            }
            // Other nodes stay reachable while suggestions are pending.
            (Generating, SelectNode(id)) => {
                self.select(id);
                Generating
            }
            (Selected, ReselectNode) => Selected,
            (Selected, StartEditing) => Editing,
            (Editing, FinishEditing | CancelEditing) => Selected,
            (Selected, StartAiGeneration) => Generating,
            (Generating, FinishAiGeneration) => Selected,
            (phase, event) => {
                trace!(?phase, ?event, "event rejected");
                return false;
            }
        };

        self.phase = next;
        true
    }

    fn select(&mut self, id: NodeId) {
        self.previous_node_id = self.selected_node_id.replace(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_starts_idle_with_keyboard_enabled() {
        let state = MindMapState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.selected_node_id().is_none());
        assert!(state.keyboard_enabled());
        assert!(!state.editor_modal_open());
    }

    #[test]
    fn test_select_tracks_previous() {
        let mut state = MindMapState::new();
        assert!(state.send(MindMapEvent::SelectNode(id("a"))));
        assert!(state.send(MindMapEvent::SelectNode(id("b"))));

        assert_eq!(state.phase(), Phase::Selected);
        assert_eq!(state.selected_node_id(), Some(&id("b")));
        assert_eq!(state.previous_node_id(), Some(&id("a")));
    }

    #[test]
    fn test_edit_cycle() {
        let mut state = MindMapState::new();
        assert!(!state.send(MindMapEvent::StartEditing), "idle cannot edit");

        state.send(MindMapEvent::SelectNode(id("a")));
        assert!(state.send(MindMapEvent::StartEditing));
        assert!(state.is_editing());

        assert!(!state.send(MindMapEvent::SelectNode(id("b"))));
        assert!(!state.send(MindMapEvent::StartAiGeneration));
        assert_eq!(state.selected_node_id(), Some(&id("a")));

        assert!(state.send(MindMapEvent::CancelEditing));
        assert_eq!(state.phase(), Phase::Selected);
        assert!(state.send(MindMapEvent::StartEditing));
        assert!(state.send(MindMapEvent::FinishEditing));
        assert_eq!(state.phase(), Phase::Selected);
    }

    #[test]
    fn test_generation_cycle() {
        let mut state = MindMapState::new();
        state.send(MindMapEvent::SelectNode(id("a")));

        assert!(state.send(MindMapEvent::StartAiGeneration));
        assert!(state.is_generating());
        assert!(!state.send(MindMapEvent::StartAiGeneration));
        assert!(!state.send(MindMapEvent::StartEditing));

        assert!(state.send(MindMapEvent::SelectNode(id("b"))));
        assert!(state.is_generating());

        assert!(state.send(MindMapEvent::FinishAiGeneration));
        assert_eq!(state.phase(), Phase::Selected);
        assert!(!state.send(MindMapEvent::FinishAiGeneration));
    }

    #[test]
    fn test_modal_disables_keyboard() {
        let mut state = MindMapState::new();
        state.set_editor_modal_open(true);
        assert!(!state.keyboard_enabled());

        state.set_editor_modal_open(false);
        assert!(state.keyboard_enabled());
    }
}
