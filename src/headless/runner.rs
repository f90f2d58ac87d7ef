//! Headless mode runner - main event loop without any rendering
//!
//! Commands arrive on stdin, engine events leave on stdout as NDJSON.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use docsite_app::config::{load_settings, StoreBackend};
use docsite_app::{Engine, EngineEvent, FileStore, MemoryStore, Message, PreferenceStore};
use docsite_core::prelude::*;
use docsite_net::{PageSource, SuggestionSource};

use super::commands::parse_command;
use super::HeadlessEvent;

/// Options collected from the command line
#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    /// Directory holding `.docsite/`
    pub config_root: PathBuf,
    /// Overrides `[site] base_url`
    pub base_url: Option<String>,
    /// Path navigated to before any command is read
    pub start_path: Option<String>,
}

/// Run in headless mode - output JSON events for stdin commands
pub async fn run_headless(options: HeadlessOptions) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("docsite starting in HEADLESS mode");
    info!("Config root: {}", options.config_root.display());
    info!("═══════════════════════════════════════════════════════");

    let mut settings = load_settings(&options.config_root);
    if let Some(base_url) = options.base_url {
        settings.site.base_url = base_url;
    }
    info!("Site: {}", settings.site.base_url);

    let store: Arc<dyn PreferenceStore> = match settings.preferences.backend {
        StoreBackend::File => Arc::new(FileStore::in_config_root(&options.config_root)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    let mut engine = match Engine::connect(settings, store) {
        Ok(engine) => engine,
        Err(e) => {
            HeadlessEvent::error(format!("Failed to start engine: {}", e), true).emit();
            return Err(e);
        }
    };
    let mut events = engine.subscribe();

    // Spawn headless-specific stdin reader
    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(stdin_tx);
    });

    if let Some(target) = options.start_path {
        engine.process_message(Message::Navigate { target });
        emit_pending(&mut events);
    }

    let result = headless_event_loop(&mut engine, &mut events).await;

    engine.shutdown().await;
    emit_pending(&mut events);

    info!("docsite headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop<P, Q>(
    engine: &mut Engine<P, Q>,
    events: &mut broadcast::Receiver<EngineEvent>,
) -> Result<()>
where
    P: PageSource + Sync + 'static,
    Q: SuggestionSource + Sync + 'static,
{
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        if !engine.process_next().await {
            info!("Message channel closed");
            break;
        }
        emit_pending(events);
    }

    Ok(())
}

/// Write every event broadcast so far
pub(crate) fn emit_pending(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from(&event).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged; {} events dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Read commands from stdin and forward them (blocking, run on its own thread)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => match parse_command(&line) {
                Ok(Some(msg)) => {
                    let quit = matches!(msg, Message::Quit);
                    if msg_tx.blocking_send(msg).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Bad stdin command '{}': {}", line.trim(), e);
                    HeadlessEvent::error(e, false).emit();
                }
            },
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    // End of input ends the session
    let _ = msg_tx.blocking_send(Message::Quit);
    info!("Stdin reader exiting");
}
