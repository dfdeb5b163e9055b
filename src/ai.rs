//! Suggestion service boundary. The core only builds the request and
//! interprets the answer; how the answer is produced is up to the
//! [`SuggestionProvider`].

use crate::model::NodeId;
use serde::Deserialize;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum SuggestionError {
    #[error("No suggestion command configured")]
    NotConfigured,
    #[error("Suggestion command failed: {0}")]
    CommandFailed(String),
    #[error("Suggestion command I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid suggestion response: {0}")]
    InvalidResponse(String),
}

/// Everything a provider needs to answer one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub ticket: u64,
    pub target: NodeId,
    /// Outline of the map with the insertion marker.
    pub context: String,
    /// Full instruction sent to the model.
    pub prompt: String,
}

pub type GenerationResult = (u64, Result<Vec<String>, SuggestionError>);

pub trait SuggestionProvider: Send + Sync {
    fn suggest(&self, request: &GenerationRequest) -> Result<Vec<String>, SuggestionError>;
}

pub fn build_prompt(context: &str, count: usize) -> String {
    format!(
        "Suggest {count} additional nodes to add as children where the marker is placed \
         in the following mind map:\n\n\
         MIND MAP TREE:\n```\n{context}\n```\n\n\
         Respond with a JSON object of the form {{\"nodes\": [\"Suggestion 1\", \"Suggestion 2\"]}} \
         containing exactly {count} short suggestions. Reply with the JSON only, no comments \
         and no backticks.\n"
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionPayload {
    Object { nodes: Vec<String> },
    List(Vec<String>),
}

/// Parses a provider reply: `{"nodes": [...]}` or a bare array of strings,
/// optionally wrapped in backticks or a code fence. Blank entries are dropped.
pub fn parse_suggestions(raw: &str) -> Result<Vec<String>, SuggestionError> {
    let cleaned = strip_fences(raw);
    let payload: SuggestionPayload = serde_json::from_str(cleaned)
        .map_err(|err| SuggestionError::InvalidResponse(err.to_string()))?;

    let nodes = match payload {
        SuggestionPayload::Object { nodes } | SuggestionPayload::List(nodes) => nodes,
    };

    Ok(nodes
        .into_iter()
        .map(|node| node.trim().to_string())
        .filter(|node| !node.is_empty())
        .collect())
}

fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim().trim_matches('`').trim();
    if let Some(rest) = text.strip_prefix("json") {
        text = rest.trim_start();
    }
    text
}

/// Runs a shell command with the prompt on stdin and parses its stdout.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    command: String,
}

impl CommandProvider {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl SuggestionProvider for CommandProvider {
    fn suggest(&self, request: &GenerationRequest) -> Result<Vec<String>, SuggestionError> {
        debug!(command = %self.command, ticket = request.ticket, "running suggestion command");

        let mut child = shell(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // The command may answer before it has read all of stdin.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = request.prompt.clone();
            thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });

        let output = child.wait_with_output()?;
        if let Some(Ok(Err(err))) = writer.map(|handle| handle.join()) {
            if err.kind() != ErrorKind::BrokenPipe {
                return Err(err.into());
            }
            debug!(ticket = request.ticket, "suggestion command ignored part of its input");
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(SuggestionError::CommandFailed(format!(
                "{} ({stderr})",
                output.status
            )));
        }

        parse_suggestions(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

/// Answers `request` on a worker thread; the result arrives on `results`
/// tagged with the request's ticket. A closed channel means the session is
/// gone and the answer is dropped.
pub fn spawn_generation(
    provider: Arc<dyn SuggestionProvider>,
    request: GenerationRequest,
    results: async_channel::Sender<GenerationResult>,
) {
    thread::spawn(move || {
        let outcome = provider.suggest(&request);
        if results.send_blocking((request.ticket, outcome)).is_err() {
            warn!(ticket = request.ticket, "suggestions arrived after teardown");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            ticket: 7,
            target: NodeId::from("n"),
            context: "Root".to_string(),
            prompt: "prompt".to_string(),
        }
    }

    #[test]
    fn test_parse_object() {
        let nodes = parse_suggestions(r#"{"nodes": ["One", " Two ", ""]}"#).unwrap();
        assert_eq!(nodes, ["One", "Two"]);
    }

    #[test]
    fn test_parse_bare_list_in_fence() {
        let nodes = parse_suggestions("```json\n[\"A\", \"B\"]\n```").unwrap();
        assert_eq!(nodes, ["A", "B"]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_suggestions(r#"{"nodes": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(matches!(
            parse_suggestions(r#"{"ideas": ["x"]}"#),
            Err(SuggestionError::InvalidResponse(_))
        ));
        assert!(parse_suggestions("Sure! Here are some ideas").is_err());
    }

    #[test]
    fn test_prompt_embeds_context_and_count() {
        let prompt = build_prompt("Root\n└── [New nodes will be added here]", 3);
        assert!(prompt.contains("Suggest 3 additional nodes"));
        assert!(prompt.contains("└── [New nodes will be added here]"));
        assert!(prompt.contains(r#"{"nodes": ["#));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_provider_reads_stdout() {
        let provider = CommandProvider::new(r#"cat > /dev/null; echo '{"nodes": ["From shell"]}'"#);
        assert_eq!(provider.suggest(&request()).unwrap(), ["From shell"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_provider_ignoring_stdin_still_answers() {
        let provider = CommandProvider::new(r#"echo '{"nodes": ["Canned"]}'"#);
        let large = GenerationRequest {
            prompt: "outline line\n".repeat(30_000),
            ..request()
        };

        for _ in 0..20 {
            assert_eq!(provider.suggest(&request()).unwrap(), ["Canned"]);
        }
        assert_eq!(provider.suggest(&large).unwrap(), ["Canned"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_provider_reports_failure() {
        let provider = CommandProvider::new("cat > /dev/null; echo boom >&2; exit 3");
        assert!(matches!(
            provider.suggest(&request()),
            Err(SuggestionError::CommandFailed(msg)) if msg.contains("boom")
        ));
    }

    #[test]
    fn test_spawn_generation_delivers_ticket() {
        struct Fixed;
        impl SuggestionProvider for Fixed {
            fn suggest(&self, _: &GenerationRequest) -> Result<Vec<String>, SuggestionError> {
                Ok(vec!["idea".to_string()])
            }
        }

        let (tx, rx) = async_channel::unbounded();
        spawn_generation(Arc::new(Fixed), request(), tx);

        let (ticket, result) = rx.recv_blocking().unwrap();
        assert_eq!(ticket, 7);
        assert_eq!(result.unwrap(), ["idea"]);
    }
}
