use crate::html;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a node, unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single mind-map entry. Child order lives in the owning [`crate::tree::Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    html: String,
}

impl TreeNode {
    pub fn create(parent_id: Option<NodeId>, html: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            parent_id,
            html: html.into(),
        }
    }

    pub fn with_id(id: NodeId, parent_id: Option<NodeId>, html: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            html: html.into(),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    /// Plain-text view of the content. Lossy.
    pub fn text(&self) -> String {
        html::to_plain_text(&self.html)
    }

    pub fn set_text(&mut self, text: &str) {
        self.html = html::wrap_text(text);
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Persisted shape of a node: `{id, parentId, html, children}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub children: Vec<NodeJson>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_generates_unique_ids() {
        let a = TreeNode::create(None, "<div>a</div>");
        let b = TreeNode::create(None, "<div>a</div>");
        assert_ne!(a.id, b.id);
        assert!(a.is_root());
    }

    #[test]
    fn test_set_html_keeps_identity() {
        let parent = NodeId::from("p");
        let mut node = TreeNode::create(Some(parent.clone()), "<div>old</div>");
        let id = node.id.clone();

        node.set_html("<p>new</p>");

        assert_eq!(node.html(), "<p>new</p>");
        assert_eq!(node.id, id);
        assert_eq!(node.parent_id, Some(parent));
    }

    #[test]
    fn test_text_view_round_trip() {
        let mut node = TreeNode::create(None, "<div><b>Bold</b> idea</div>");
        assert_eq!(node.text(), "Bold idea");

        node.set_text("Fish & chips");
        assert_eq!(node.html(), "<div>Fish &amp; chips</div>");
        assert_eq!(node.text(), "Fish & chips");
    }

    #[test]
    fn test_node_json_field_names() {
        let json = NodeJson {
            id: Some("1".to_string()),
            parent_id: None,
            html: "Root Node".to_string(),
            children: Vec::new(),
        };

        let text = serde_json::to_string(&json).unwrap();
        assert_eq!(
            text,
            r#"{"id":"1","parentId":null,"html":"Root Node","children":[]}"#
        );
    }
}
