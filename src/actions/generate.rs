use crate::ai::{build_prompt, GenerationRequest, SuggestionError};
use crate::app::{AppState, PendingGeneration};
use crate::context::mind_map_context;
use crate::html;
use crate::service::Command;
use crate::state::MindMapEvent;
use tracing::{debug, info, warn};

pub const PLACEHOLDER_HTML: &str = "<div class=\"loading\">Generating ideas…</div>";
pub const GENERATION_ERROR: &str = "Unable to generate recommendations";

/// Starts a generation under the selected node: a placeholder child is
/// shown and the request to send to the provider is returned. Dropped
/// while another generation is pending.
pub fn start_generation(app: &mut AppState) -> Option<GenerationRequest> {
    let target = app.selected_node()?.id.clone();
    if app.generation.is_some() {
        app.set_message("Suggestions are already being generated");
        return None;
    }
    if !app.mind_map.send(MindMapEvent::StartAiGeneration) {
        return None;
    }

    let context = mind_map_context(app.tree(), &target);
    let Some(placeholder) = app.service.dispatch_untracked(Command::Insert {
        parent_id: target.clone(),
        html: PLACEHOLDER_HTML.to_string(),
    }) else {
        app.mind_map.send(MindMapEvent::FinishAiGeneration);
        return None;
    };

    let ticket = app.take_ticket();
    app.generation = Some(PendingGeneration {
        ticket,
        target: target.clone(),
        placeholder,
    });
    info!(ticket, target = %target, "generation started");

    Some(GenerationRequest {
        ticket,
        target,
        prompt: build_prompt(&context, app.config.suggestion_count),
        context,
    })
}

/// Applies a provider answer. The placeholder is always removed first;
/// suggestions become children of the target as one undo step. Answers for
/// a ticket that is no longer pending are discarded and `false` is returned.
pub fn finish_generation(
    app: &mut AppState,
    ticket: u64,
    result: Result<Vec<String>, SuggestionError>,
) -> bool {
    if app.generation.as_ref().map(|pending| pending.ticket) != Some(ticket) {
        debug!(ticket, "discarding stale suggestions");
        return false;
    }
    let Some(pending) = app.generation.take() else {
        return false;
    };

    remove_placeholder(app, &pending);

    match result {
        Ok(suggestions) if !suggestions.is_empty() => {
            let inserted = app
                .service
                .dispatch_batch(suggestions.iter().map(|text| Command::Insert {
                    parent_id: pending.target.clone(),
                    html: html::wrap_text(text),
                }));
            info!(ticket, count = inserted.len(), "suggestions inserted");
        }
        Ok(_) => {
            warn!(ticket, "provider returned no suggestions");
            app.set_message(GENERATION_ERROR);
        }
        Err(err) => {
            warn!(ticket, %err, "generation failed");
            app.set_message(GENERATION_ERROR);
        }
    }

    app.mind_map.send(MindMapEvent::FinishAiGeneration);
    true
}

/// Abandons the pending generation, if any. A later answer for it is
/// treated as stale.
pub fn cancel_generation(app: &mut AppState) -> bool {
    let Some(pending) = app.generation.take() else {
        return false;
    };
    info!(ticket = pending.ticket, "generation cancelled");
    remove_placeholder(app, &pending);
    app.mind_map.send(MindMapEvent::FinishAiGeneration);
    true
}

fn remove_placeholder(app: &mut AppState, pending: &PendingGeneration) {
    app.service.dispatch_untracked(Command::Delete {
        id: pending.placeholder.clone(),
    });
    app.service.forget_node(&pending.placeholder);

    // The selection may have been on the placeholder or below it.
    if app.selected_node().is_none() {
        let fallback = if app.tree().contains(&pending.target) {
            pending.target.clone()
        } else {
            app.tree().root_id().clone()
        };
        app.select(fallback);
    }
}
