pub mod app;
pub mod config;
pub mod errors;
pub mod logging;
pub mod model;
pub mod ui;

// Mind-map engine
pub mod html;
pub mod io;
pub mod service;
pub mod state;
pub mod tree;

// Suggestions
pub mod ai;
pub mod context;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use app::AppState;
pub use config::AppConfig;
pub use model::{NodeId, TreeNode};
pub use service::{reduce, Command, TreeService};
pub use state::{MindMapEvent, MindMapState, Phase};
pub use tree::Tree;
