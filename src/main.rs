use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;

use kaia::{
    cli::config_path_from_args,
    config::Config,
    dialogue::{
        TurnOrchestrator,
        adapters::{ConsoleListener, ConsoleSpeaker, KeywordAnalyzer},
        ports::{AnalyzerPort, GeneratorPort, ListenPort, SpeakPort},
    },
    governor::GovernorEngine,
    logging::init_tracing,
    memory::{MemoryPersistence, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let logging_guard = init_tracing(&config.logging)?;
    tracing::info!(
        target: "main",
        run_id = %logging_guard.run_id(),
        "kaia_starting"
    );

    // No safe default permission set exists: an unloadable governor aborts
    // startup, unlike memory state which degrades to empty.
    let governor = GovernorEngine::load(&config.governor.rules_path)
        .context("failed to construct governor engine")?;
    let memory = MemoryStore::open(
        MemoryPersistence::new(config.memory.state_path.clone()),
        config.memory.short_term_limit,
        config.memory.importance_threshold,
    );

    let analyzer: Arc<dyn AnalyzerPort> = Arc::new(KeywordAnalyzer::new());
    // No generative backend is wired by default; the orchestrator falls back
    // to its placeholder reply. A GeneratorPort adapter slots in here.
    let generator: Option<Arc<dyn GeneratorPort>> = None;
    let listener: Arc<dyn ListenPort> = Arc::new(ConsoleListener::new(&config.identity.user_name));
    let speaker: Arc<dyn SpeakPort> = Arc::new(ConsoleSpeaker::new(&config.identity.ai_name));

    let orchestrator = TurnOrchestrator::new(&config, governor, memory, analyzer, generator);

    let shutdown = CancellationToken::new();
    let loop_shutdown = shutdown.clone();
    let mut turn_task =
        tokio::spawn(async move { orchestrator.run(listener, speaker, loop_shutdown).await });

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;

    let signal_name = tokio::select! {
        _ = sigint.recv() => Some("SIGINT"),
        _ = sigterm.recv() => Some("SIGTERM"),
        joined = &mut turn_task => {
            joined.context("dialogue task join failed")??;
            None
        }
    };

    if let Some(signal_name) = signal_name {
        eprintln!("received {signal_name}; finishing current turn");
        shutdown.cancel();
        turn_task.await.context("dialogue task join failed")??;
        eprintln!("kaia stopped: received {signal_name}");
    }

    Ok(())
}
