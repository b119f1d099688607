use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{
    affect::{AffectVector, FeedbackEvaluator, RewardEngine, RewardSystemConfig},
    dialogue::{
        error::{CommandError, invalid_arguments},
        types::{AnalysisMetadata, Entity},
    },
    memory::types::now_epoch_seconds,
};

const MAX_CONTEXT_HISTORY: usize = 5;
const TOPIC_ENTITY_LABELS: [&str; 3] = ["PERSON", "GPE", "EVENT"];

/// Closed set of dispatchable commands. Bindings from keyword to kind are
/// resolved once at startup; there is no runtime string-to-handler registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    SetTimer,
    ListProjects,
    SmallTalk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandBinding {
    pub keyword: String,
    pub command: CommandKind,
}

/// Startup-resolved keyword table. An input routes to a command when it
/// equals a keyword or starts with the keyword followed by a space, so
/// `"set timer 5 minutes"` routes via `"set timer"` without hijacking
/// unrelated text that merely contains a keyword.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<(String, CommandKind)>,
}

impl CommandTable {
    pub fn new(bindings: &[CommandBinding]) -> Self {
        Self {
            entries: bindings
                .iter()
                .map(|binding| (binding.keyword.to_lowercase(), binding.command))
                .collect(),
        }
    }

    pub fn resolve(&self, input: &str) -> Option<CommandKind> {
        let lowered = input.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| {
                lowered == *keyword || lowered.starts_with(&format!("{keyword} "))
            })
            .map(|(_, kind)| *kind)
    }
}

#[derive(Debug, Clone)]
pub struct TimerRecord {
    pub set_at: f64,
    pub duration_minutes: u64,
    pub notified: bool,
}

#[derive(Debug, Clone)]
struct ContextEntry {
    command: String,
    intent: String,
    entities: Vec<Entity>,
}

/// Executes resolved commands. Carries the rolling conversational context
/// (last few turns, last intent, last entities) that small talk and intent
/// chaining read from.
#[derive(Debug)]
pub struct CommandDispatcher {
    user_name: String,
    evaluator: FeedbackEvaluator,
    timers: Vec<TimerRecord>,
    projects: Vec<String>,
    history: VecDeque<ContextEntry>,
    last_intent: Option<String>,
    last_entities: Vec<Entity>,
}

impl CommandDispatcher {
    pub fn new(user_name: String, reward_system: RewardSystemConfig) -> Self {
        Self {
            user_name,
            evaluator: FeedbackEvaluator::new(reward_system),
            timers: Vec::new(),
            projects: Vec::new(),
            history: VecDeque::new(),
            last_intent: None,
            last_entities: Vec::new(),
        }
    }

    pub fn with_projects(mut self, projects: Vec<String>) -> Self {
        self.projects = projects;
        self
    }

    pub fn timers(&self) -> &[TimerRecord] {
        &self.timers
    }

    pub fn last_intent(&self) -> Option<&str> {
        self.last_intent.as_deref()
    }

    pub fn dispatch(
        &mut self,
        kind: CommandKind,
        raw: &str,
        intent: &str,
        metadata: &AnalysisMetadata,
        affect: &mut AffectVector,
        rewards: &mut RewardEngine,
    ) -> Result<String, CommandError> {
        if let Some(chained) = self.chained_reply(intent) {
            self.update_context(raw, intent, metadata, intent.to_string());
            return Ok(chained);
        }

        let (reply, recorded_intent) = match kind {
            CommandKind::SetTimer => (self.set_timer(raw)?, "set timer".to_string()),
            CommandKind::ListProjects => (self.list_projects(), intent.to_string()),
            CommandKind::SmallTalk => (
                self.small_talk(raw, intent, metadata, affect, rewards),
                intent.to_string(),
            ),
        };

        self.update_context(raw, intent, metadata, recorded_intent);
        Ok(reply)
    }

    /// Follow-up handling: gratitude or a greeting straight after a timer was
    /// set gets the chained acknowledgment instead of the generic reply.
    fn chained_reply(&self, intent: &str) -> Option<String> {
        if self.last_intent.as_deref() == Some("set timer")
            && matches!(intent, "gratitude" | "greeting")
        {
            return Some(format!(
                "You're welcome, {}! Timer's all set.",
                self.user_name
            ));
        }
        None
    }

    fn update_context(
        &mut self,
        raw: &str,
        intent: &str,
        metadata: &AnalysisMetadata,
        recorded_intent: String,
    ) {
        self.history.push_back(ContextEntry {
            command: raw.to_string(),
            intent: intent.to_string(),
            entities: metadata.entities.clone(),
        });
        while self.history.len() > MAX_CONTEXT_HISTORY {
            self.history.pop_front();
        }
        self.last_intent = Some(recorded_intent);
        self.last_entities = metadata.entities.clone();
    }

    fn set_timer(&mut self, raw: &str) -> Result<String, CommandError> {
        let lowered = raw.to_lowercase();
        let parts: Vec<&str> = lowered.split_whitespace().collect();
        if parts.len() < 3 || parts[0] != "set" || parts[1] != "timer" {
            return Err(invalid_arguments(format!(
                "unrecognized timer phrasing: '{raw}'"
            )));
        }

        let duration: u64 = parts[2]
            .parse()
            .map_err(|_| invalid_arguments(format!("non-numeric timer duration: '{}'", parts[2])))?;
        if duration == 0 {
            return Err(invalid_arguments("timer duration must be positive"));
        }

        self.timers.push(TimerRecord {
            set_at: now_epoch_seconds(),
            duration_minutes: duration,
            notified: false,
        });
        tracing::info!(
            target: "dialogue",
            duration_minutes = duration,
            active_timers = self.timers.len(),
            "timer_set"
        );

        Ok(format!("Timer set for {duration} minutes!"))
    }

    fn list_projects(&self) -> String {
        if self.projects.is_empty() {
            return "No projects yet.".to_string();
        }
        format!("Your projects: {}", self.projects.join(", "))
    }

    fn small_talk(
        &mut self,
        raw: &str,
        intent: &str,
        metadata: &AnalysisMetadata,
        affect: &mut AffectVector,
        rewards: &mut RewardEngine,
    ) -> String {
        let compound = metadata
            .sentiment
            .map(|sentiment| sentiment.compound)
            .unwrap_or(0.0);
        let sentiment = self.evaluator.evaluate(raw, compound, affect, rewards);
        let user = self.user_name.clone();
        let lowered = raw.to_lowercase();

        if intent == "gratitude" {
            affect.adjust(2.0);
            return format!("You're welcome, {user}!");
        }

        if intent == "emotion_check" {
            let mood = if affect.happiness > 0.7 {
                "great and cheerful"
            } else if affect.happiness > 0.3 {
                "okay and steady"
            } else if affect.sadness > 0.5 {
                "gentle and supportive"
            } else {
                "calm"
            };
            let followup = if sentiment.compound > 0.5 {
                "Your positivity lifts me!"
            } else {
                "How can I support you today?"
            };
            return format!("I'm feeling {mood}, {user}. {followup}");
        }

        if intent == "greeting"
            || ["hi", "hello", "hey"]
                .iter()
                .any(|phrase| contains_phrase(&lowered, phrase))
        {
            let mut greeting = format!("Hi {user}, I'm right here. What would you like to do?");
            if let Some(person) = first_labelled(&metadata.entities, &["PERSON"]) {
                greeting.push_str(&format!(" Nice to see you, {person}!"));
            } else if let Some(person) = first_labelled(&self.last_entities, &["PERSON"]) {
                greeting.push_str(&format!(" Good to see you again, {person}!"));
            }
            return greeting;
        }

        if ["i'm good", "i am good", "doing well"]
            .iter()
            .any(|phrase| lowered.contains(phrase))
        {
            affect.adjust(2.0);
            return format!("Glad to hear that, {user}. Makes me happy too!");
        }

        if intent == "conversation"
            || ["just chatting", "talk", "conversation"]
                .iter()
                .any(|phrase| contains_phrase(&lowered, phrase))
        {
            let topic = first_labelled(&metadata.entities, &TOPIC_ENTITY_LABELS)
                .or_else(|| {
                    self.history
                        .iter()
                        .find_map(|entry| first_labelled(&entry.entities, &TOPIC_ENTITY_LABELS))
                })
                .unwrap_or_else(|| "anything".to_string());
            return format!("Of course, {user}. We can talk about {topic}. I'm listening.");
        }

        if sentiment.compound < -0.3 {
            let recent_topic = self
                .history
                .iter()
                .rev()
                .find(|entry| entry.intent == "conversation")
                .map(|entry| entry.command.clone())
                .unwrap_or_else(|| "something".to_string());
            return format!(
                "I'm here, {user}. You sound down. Want to share about {recent_topic}?"
            );
        }

        format!("I'm here, {user}. Could you tell me more about what you're thinking?")
    }
}

fn first_labelled(entities: &[Entity], labels: &[&str]) -> Option<String> {
    entities
        .iter()
        .find(|entity| labels.contains(&entity.label.as_str()))
        .map(|entity| entity.text.clone())
}

/// Substring match with word boundaries on both sides, so "hi" does not
/// match inside "this".
pub(crate) fn contains_phrase(text: &str, phrase: &str) -> bool {
    let mut search_start = 0;
    while let Some(offset) = text[search_start..].find(phrase) {
        let start = search_start + offset;
        let end = start + phrase.len();
        let boundary_before = start == 0
            || !text[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let boundary_after = end == text.len()
            || !text[end..].chars().next().is_some_and(|c| c.is_alphanumeric());
        if boundary_before && boundary_after {
            return true;
        }
        search_start = start + 1;
    }
    false
}
