use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use uuid::Uuid;

use kaia::{
    config::Config,
    dialogue::{
        TurnOrchestrator,
        adapters::KeywordAnalyzer,
        error::{DialogueError, collaborator_failure},
        ports::{AnalyzerPort, GeneratorPort},
        types::Analysis,
    },
    governor::{GovernorEngine, GovernorRules},
    memory::{MemoryPersistence, MemoryStore},
};

pub const FULL_RULES: &str = r#"{
  governor: { version: "test" },
  permissions: {
    cognition: { reason: true },
    tools: { execute_code_in_sandbox: true },
  },
  approval_required_for: [],
  learning_bounds: {
    personality_clamp: {
      happiness: [0.0, 1.0],
      sadness: [0.0, 0.9],
      curiosity: [0.1, 1.0],
      affinity: [0.0, 1.0],
    },
  },
}"#;

pub const NO_SANDBOX_RULES: &str = r#"{
  governor: { version: "test" },
  permissions: { cognition: { reason: true } },
}"#;

pub const NO_REASONING_RULES: &str = r#"{
  governor: { version: "test" },
  permissions: { tools: { execute_code_in_sandbox: true } },
}"#;

pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kaia-dialogue-test-{}", Uuid::now_v7()));
    fs::create_dir_all(&dir).expect("scratch dir should be created");
    dir
}

pub fn build(
    rules_text: &str,
    analyzer: Arc<dyn AnalyzerPort>,
    generator: Option<Arc<dyn GeneratorPort>>,
) -> TurnOrchestrator {
    let mut config = Config::default();
    config.memory.state_path = scratch_dir().join("memory.json");
    build_with_config(config, rules_text, analyzer, generator)
}

pub fn build_with_config(
    config: Config,
    rules_text: &str,
    analyzer: Arc<dyn AnalyzerPort>,
    generator: Option<Arc<dyn GeneratorPort>>,
) -> TurnOrchestrator {
    let rules: GovernorRules = json5::from_str(rules_text).expect("rules should parse");
    let governor = GovernorEngine::from_rules(rules);
    let memory = MemoryStore::open(
        MemoryPersistence::new(config.memory.state_path.clone()),
        config.memory.short_term_limit,
        config.memory.importance_threshold,
    );
    TurnOrchestrator::new(&config, governor, memory, analyzer, generator)
}

pub fn orchestrator(rules_text: &str) -> TurnOrchestrator {
    build(rules_text, Arc::new(KeywordAnalyzer::new()), None)
}

/// Returns a fixed reply and remembers the prompt it was handed.
pub struct EchoGenerator {
    pub last_prompt: Mutex<Option<String>>,
}

impl EchoGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            last_prompt: Mutex::new(None),
        })
    }
}

#[async_trait]
impl GeneratorPort for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DialogueError> {
        *self.last_prompt.lock().expect("prompt lock") = Some(prompt.to_string());
        Ok("Here is what I came up with.".to_string())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl GeneratorPort for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, DialogueError> {
        Err(collaborator_failure("generator backend offline"))
    }
}

/// Hands back the same analysis for every input.
pub struct ScriptedAnalyzer {
    analysis: Analysis,
}

impl ScriptedAnalyzer {
    pub fn new(analysis: Analysis) -> Arc<Self> {
        Arc::new(Self { analysis })
    }
}

#[async_trait]
impl AnalyzerPort for ScriptedAnalyzer {
    async fn analyze(&self, _text: &str) -> Analysis {
        self.analysis.clone()
    }
}
