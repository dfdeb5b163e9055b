use treemind::{actions, ai, app, config, event, io as map_io, logging, tree, ui};

use actions::{file, generate};
use ai::{CommandProvider, GenerationResult, SuggestionError, SuggestionProvider};
use anyhow::{Context, Result};
use app::AppState;
use clap::Parser;
use config::{load_config, CliArgs};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use event::KeyOutcome;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    if let Err(err) = logging::init_logging(&config) {
        eprintln!("Logging disabled: {err}");
    }

    // Load the map, or start a fresh one
    let path = config.map_path();
    let tree = match &path {
        Some(path) => map_io::load_map(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => tree::Tree::default(),
    };

    let provider = config
        .suggestion_command
        .clone()
        .map(|command| Arc::new(CommandProvider::new(command)) as Arc<dyn SuggestionProvider>);

    let mut app = AppState::new(config, tree);
    app.filename = path;
    info!(file = ?app.filename, nodes = app.tree().node_count(), "session started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clear the terminal
    terminal.clear()?;

    // Run the main loop
    let res = run_app(&mut terminal, &mut app, provider);

    // Drop transient nodes before the final save
    actions::teardown(&mut app);
    let saved = if app.config.auto_save && app.is_dirty() {
        file::write(&mut app).map(|_| ())
    } else {
        Ok(())
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors from the main loop
    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }
    if let Err(err) = saved {
        eprintln!("Error: {:#}", err);
    }

    info!("session ended");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    provider: Option<Arc<dyn SuggestionProvider>>,
) -> Result<()> {
    let (results_tx, results_rx) = async_channel::unbounded::<GenerationResult>();

    while app.running {
        // Draw the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if let Some(key) = event::next_key(POLL_INTERVAL)? {
            if let KeyOutcome::Generate(request) = event::handle_key_event(app, key) {
                match &provider {
                    Some(provider) => {
                        ai::spawn_generation(Arc::clone(provider), request, results_tx.clone())
                    }
                    None => {
                        generate::finish_generation(
                            app,
                            request.ticket,
                            Err(SuggestionError::NotConfigured),
                        );
                    }
                }
            }
        }

        // Apply finished generations
        while let Ok((ticket, result)) = results_rx.try_recv() {
            generate::finish_generation(app, ticket, result);
        }

        // Auto-save if enabled
        if file::auto_save_due(app, Instant::now()) {
            if let Err(err) = file::write(app) {
                warn!("auto-save failed: {err:#}");
                app.set_message(format!("Auto-save failed: {}", err));
                // Retry after another interval
                app.last_save_time = Some(Instant::now());
            }
        }
    }

    Ok(())
}
