use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    affect::RewardSystemConfig,
    dialogue::commands::{CommandBinding, CommandKind},
};

/// Immutable process configuration. Built once in `main` by merging the
/// built-in defaults with the config file; the file is schema-validated
/// first, so unknown keys are rejected instead of silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub governor: GovernorSourceConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub personality: PersonalityConfig,
    #[serde(default = "default_command_bindings")]
    pub commands: Vec<CommandBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity: IdentityConfig::default(),
            logging: LoggingConfig::default(),
            governor: GovernorSourceConfig::default(),
            memory: MemoryConfig::default(),
            personality: PersonalityConfig::default(),
            commands: default_command_bindings(),
        }
    }
}

fn default_ai_name() -> String {
    "Kaia".to_string()
}

fn default_user_name() -> String {
    "Yuu".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_ai_name")]
    pub ai_name: String,
    #[serde(default = "default_user_name")]
    pub user_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            ai_name: default_ai_name(),
            user_name: default_user_name(),
        }
    }
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

fn default_governor_rules_path() -> PathBuf {
    PathBuf::from("./governor.jsonc")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernorSourceConfig {
    #[serde(default = "default_governor_rules_path")]
    pub rules_path: PathBuf,
}

impl Default for GovernorSourceConfig {
    fn default() -> Self {
        Self {
            rules_path: default_governor_rules_path(),
        }
    }
}

fn default_memory_state_path() -> PathBuf {
    PathBuf::from("./state/memory.json")
}

fn default_short_term_limit() -> usize {
    10
}

fn default_importance_threshold() -> f64 {
    0.6
}

fn default_long_term_max_items() -> usize {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_state_path")]
    pub state_path: PathBuf,
    #[serde(default = "default_short_term_limit")]
    pub short_term_limit: usize,
    #[serde(default = "default_importance_threshold")]
    pub importance_threshold: f64,
    #[serde(default = "default_long_term_max_items")]
    pub long_term_max_items: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            state_path: default_memory_state_path(),
            short_term_limit: default_short_term_limit(),
            importance_threshold: default_importance_threshold(),
            long_term_max_items: default_long_term_max_items(),
        }
    }
}

fn default_core_traits() -> Vec<String> {
    vec!["empathetic".to_string(), "curious".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityConfig {
    #[serde(default = "default_core_traits")]
    pub core_traits: Vec<String>,
    #[serde(default)]
    pub reward_system: RewardSystemConfig,
}

impl Default for PersonalityConfig {
    fn default() -> Self {
        Self {
            core_traits: default_core_traits(),
            reward_system: RewardSystemConfig::default(),
        }
    }
}

fn default_command_bindings() -> Vec<CommandBinding> {
    [
        ("set timer", CommandKind::SetTimer),
        ("list projects", CommandKind::ListProjects),
        ("thank you", CommandKind::SmallTalk),
        ("hi", CommandKind::SmallTalk),
        ("how are you", CommandKind::SmallTalk),
        ("i'm good", CommandKind::SmallTalk),
    ]
    .map(|(keyword, command)| CommandBinding {
        keyword: keyword.to_string(),
        command,
    })
    .to_vec()
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;

        if !config.governor.rules_path.is_absolute() {
            config.governor.rules_path = config_base.join(&config.governor.rules_path);
        }
        if !config.memory.state_path.is_absolute() {
            config.memory.state_path = config_base.join(&config.memory.state_path);
        }

        Ok(config)
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join("kaia.schema.json");
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or kaia.schema.json next to it"
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
