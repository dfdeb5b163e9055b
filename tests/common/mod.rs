use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use treemind::event::{self, KeyOutcome};
use treemind::{AppConfig, AppState, NodeId, Tree, TreeService};

/// Node ids of [`create_sample_app`]'s map.
#[allow(dead_code)]
pub struct SampleIds {
    pub root: NodeId,
    pub packing: NodeId,
    pub socks: NodeId,
    pub tent: NodeId,
    pub food: NodeId,
}

/// Trip
/// ├── Packing
/// │   ├── Socks
/// │   └── Tent
/// └── Food
#[allow(dead_code)]
pub fn create_sample_app() -> (AppState, SampleIds) {
    let mut service = TreeService::new(Tree::new("<div>Trip</div>"));
    let root = service.tree().root_id().clone();
    let packing = service.insert_node(&root, "<div>Packing</div>").unwrap();
    let socks = service.insert_node(&packing, "<div>Socks</div>").unwrap();
    let tent = service.insert_node(&packing, "<div>Tent</div>").unwrap();
    let food = service.insert_node(&root, "<div>Food</div>").unwrap();

    let app = AppState::new(AppConfig::default(), service.tree().clone());
    let ids = SampleIds {
        root,
        packing,
        socks,
        tent,
        food,
    };
    (app, ids)
}

#[allow(dead_code)]
pub fn create_test_app() -> AppState {
    AppState::new(AppConfig::default(), Tree::default())
}

#[allow(dead_code)]
pub fn press(app: &mut AppState, code: KeyCode) -> KeyOutcome {
    press_with(app, code, KeyModifiers::NONE)
}

#[allow(dead_code)]
pub fn press_with(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
    event::handle_key_event(app, KeyEvent::new(code, modifiers))
}

#[allow(dead_code)]
pub fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

#[allow(dead_code)]
pub fn selected(app: &AppState) -> NodeId {
    app.selected_id().cloned().expect("a node should be selected")
}

#[allow(dead_code)]
pub fn html_of(app: &AppState, id: &NodeId) -> String {
    app.tree()
        .find_by_id(id)
        .map(|node| node.html().to_string())
        .unwrap_or_default()
}

/// Plain-text outline, one node per line indented by depth.
#[allow(dead_code)]
pub fn tree_to_string(tree: &Tree) -> String {
    tree.walk()
        .into_iter()
        .map(|(depth, node)| format!("{}{}", "\t".repeat(depth), node.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checks every child names its parent and that ids are unique.
#[allow(dead_code)]
pub fn verify_tree_integrity(tree: &Tree) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for (_, node) in tree.walk() {
        if !seen.insert(node.id.clone()) {
            return Err(format!("duplicate id {}", node.id));
        }
        for child in tree.children(&node.id) {
            if child.parent_id.as_ref() != Some(&node.id) {
                return Err(format!("{} does not point at parent {}", child.id, node.id));
            }
        }
    }
    if tree.root().parent_id.is_some() {
        return Err("root has a parent".to_string());
    }
    Ok(())
}
