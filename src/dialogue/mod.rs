#![allow(dead_code)]

pub mod adapters;
pub mod commands;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod types;

pub use commands::{CommandBinding, CommandDispatcher, CommandKind, CommandTable};
pub use error::{CommandError, CommandErrorKind, DialogueError, DialogueErrorKind};
pub use orchestrator::TurnOrchestrator;
pub use ports::{AnalyzerPort, GeneratorPort, ListenPort, SpeakPort};
pub use types::{Analysis, AnalysisMetadata, Entity, TurnOutcome};
