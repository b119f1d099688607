use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::{
    affect::{AffectAxis, AffectVector, ResponseAdjuster, RewardEngine, estimate_importance},
    config::Config,
    dialogue::{
        commands::{CommandDispatcher, CommandTable},
        ports::{AnalyzerPort, GeneratorPort, ListenPort, SpeakPort},
        types::TurnOutcome,
    },
    governor::GovernorEngine,
    memory::MemoryStore,
};

const REASONING_PERMISSION: &str = "cognition.reason";
const COMMAND_PERMISSION: &str = "tools.execute_code_in_sandbox";

const REASONING_REFUSAL: &str = "I'm not allowed to reason right now.";
const COMMAND_REFUSAL: &str = "I'm not permitted to execute that command.";
const COMMAND_APOLOGY: &str = "I couldn't complete that command.";
const GENERATOR_PLACEHOLDER: &str = "I'm listening. Tell me more.";
const GENERATOR_FALLBACK: &str = "I'm listening.";

/// Sequences one conversational turn at a time: policy gate, analysis,
/// routing (command vs. generative), response adjustment, importance
/// scoring, memory write, output. Collaborator failures never leave this
/// type; they degrade into fixed reply text.
pub struct TurnOrchestrator {
    ai_name: String,
    user_name: String,
    long_term_max_items: usize,
    governor: GovernorEngine,
    memory: MemoryStore,
    affect: AffectVector,
    rewards: RewardEngine,
    adjuster: ResponseAdjuster,
    command_table: CommandTable,
    dispatcher: CommandDispatcher,
    analyzer: Arc<dyn AnalyzerPort>,
    generator: Option<Arc<dyn GeneratorPort>>,
}

impl TurnOrchestrator {
    pub fn new(
        config: &Config,
        governor: GovernorEngine,
        memory: MemoryStore,
        analyzer: Arc<dyn AnalyzerPort>,
        generator: Option<Arc<dyn GeneratorPort>>,
    ) -> Self {
        Self {
            ai_name: config.identity.ai_name.clone(),
            user_name: config.identity.user_name.clone(),
            long_term_max_items: config.memory.long_term_max_items,
            governor,
            memory,
            affect: AffectVector::baseline(),
            rewards: RewardEngine::new(),
            adjuster: ResponseAdjuster::new(config.personality.core_traits.clone()),
            command_table: CommandTable::new(&config.commands),
            dispatcher: CommandDispatcher::new(
                config.identity.user_name.clone(),
                config.personality.reward_system.clone(),
            ),
            analyzer,
            generator,
        }
    }

    /// The session loop. Exactly one turn is in flight at a time; input
    /// acquisition is the suspension point, and a raised cancellation token
    /// is observed there, never mid-turn.
    pub async fn run(
        mut self,
        listener: Arc<dyn ListenPort>,
        speaker: Arc<dyn SpeakPort>,
        shutdown: CancellationToken,
    ) -> Result<()> {
        speaker.speak(&format!("{} is online.", self.ai_name)).await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                acquired = listener.listen() => {
                    let Some(line) = acquired else { break };
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }

                    let outcome = self.handle_turn(text).await;
                    speaker.speak(&outcome.reply).await;
                    if outcome.end_session {
                        break;
                    }
                }
            }
        }

        self.finalize();
        Ok(())
    }

    pub async fn handle_turn(&mut self, text: &str) -> TurnOutcome {
        if !self.governor.allows(REASONING_PERMISSION).allowed {
            tracing::warn!(target: "dialogue", "reasoning_gate_denied");
            return TurnOutcome {
                reply: REASONING_REFUSAL.to_string(),
                end_session: false,
            };
        }

        let analysis = self.analyzer.analyze(text).await;
        // Importance scoring uses this pre-turn snapshot, not the state the
        // command path or the adjuster leave behind.
        let affect_before = self.affect;
        tracing::debug!(
            target: "dialogue",
            intent = %analysis.intent,
            confidence = analysis.metadata.confidence,
            "turn_analyzed"
        );

        let mut end_session = false;
        let response = if let Some(kind) = self.command_table.resolve(text) {
            if !self.governor.allows(COMMAND_PERMISSION).allowed {
                tracing::warn!(target: "dialogue", "command_gate_denied");
                COMMAND_REFUSAL.to_string()
            } else {
                match self.dispatcher.dispatch(
                    kind,
                    text,
                    &analysis.intent,
                    &analysis.metadata,
                    &mut self.affect,
                    &mut self.rewards,
                ) {
                    Ok(reply) => {
                        self.rewards
                            .apply(&mut self.affect, 1.0, "command_success");
                        reply
                    }
                    Err(err) => {
                        tracing::warn!(
                            target: "dialogue",
                            error = %err,
                            "command_failed"
                        );
                        self.rewards
                            .apply(&mut self.affect, -1.0, "command_failure");
                        COMMAND_APOLOGY.to_string()
                    }
                }
            }
        } else if analysis.intent == "goodbye" {
            end_session = true;
            format!("Goodbye, {}.", self.user_name)
        } else {
            self.generative_reply(text).await
        };

        let adjusted = self.adjuster.adjust(text, &response);
        self.apply_personality_bounds();

        let importance = estimate_importance(
            &analysis.intent,
            analysis.metadata.sentiment.as_ref(),
            &affect_before,
        );
        self.memory
            .add_interaction(text, &adjusted, &analysis.intent, affect_before, importance);
        tracing::debug!(
            target: "dialogue",
            intent = %analysis.intent,
            importance = importance,
            "turn_recorded"
        );

        TurnOutcome {
            reply: adjusted,
            end_session,
        }
    }

    pub fn reward_score(&self) -> f64 {
        self.rewards.score()
    }

    pub fn affect(&self) -> &AffectVector {
        &self.affect
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn governor(&self) -> &GovernorEngine {
        &self.governor
    }

    async fn generative_reply(&self, text: &str) -> String {
        let Some(generator) = self.generator.clone() else {
            return GENERATOR_PLACEHOLDER.to_string();
        };

        let prompt = self.build_prompt(text);
        match generator.generate(&prompt).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => GENERATOR_FALLBACK.to_string(),
            Err(err) => {
                tracing::warn!(target: "dialogue", error = %err, "generator_failed");
                GENERATOR_FALLBACK.to_string()
            }
        }
    }

    fn build_prompt(&self, text: &str) -> String {
        let context = self.memory.recent_context();
        let trend_line = match self.memory.emotional_trend() {
            Some(trend) => format!(
                "happiness={:.2} sadness={:.2} curiosity={:.2} affinity={:.2}",
                trend.happiness, trend.sadness, trend.curiosity, trend.affinity
            ),
            None => "(none)".to_string(),
        };

        format!(
            "You are {ai}.\nRecent context:\n{context}\n\nEmotional trend:\n{trend_line}\n\nRespond naturally.\n\nUser: {text}\n{ai}:",
            ai = self.ai_name,
        )
    }

    /// Personality learning bounds: each axis is passed through the
    /// governor's clamp table after the turn's adjustments, so configured
    /// bounds cap how far a session can drag the personality.
    fn apply_personality_bounds(&mut self) {
        for axis in AffectAxis::ALL {
            let bounded = self
                .governor
                .clamp("personality", axis.as_str(), self.affect.axis(axis));
            self.affect.set_axis(axis, bounded);
        }
    }

    fn finalize(&mut self) {
        self.memory.summarize_long_term(self.long_term_max_items);
        if let Err(err) = self.memory.flush() {
            tracing::warn!(target: "dialogue", error = %err, "final_flush_failed");
        }
        tracing::info!(
            target: "dialogue",
            reward_score = self.rewards.score(),
            audit_records = self.governor.audit().len(),
            "assistant_stopped"
        );
    }
}
