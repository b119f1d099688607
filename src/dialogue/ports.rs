use async_trait::async_trait;

use crate::dialogue::{error::DialogueError, types::Analysis};

/// Language understanding. Total: implementations return an `unknown`
/// analysis for input they cannot place, never an error.
#[async_trait]
pub trait AnalyzerPort: Send + Sync {
    async fn analyze(&self, text: &str) -> Analysis;
}

/// Generative completion. Optional at wiring time; the orchestrator owns the
/// placeholder and fallback replies, so an adapter only reports its own
/// failure.
#[async_trait]
pub trait GeneratorPort: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DialogueError>;
}

/// Input acquisition. `None` means the source is closed and the session
/// should wind down.
#[async_trait]
pub trait ListenPort: Send + Sync {
    async fn listen(&self) -> Option<String>;
}

#[async_trait]
pub trait SpeakPort: Send + Sync {
    async fn speak(&self, text: &str);
}
