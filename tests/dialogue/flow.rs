use std::sync::Arc;

use kaia::{
    affect::{AffectVector, SentimentScores},
    config::Config,
    dialogue::{
        adapters::KeywordAnalyzer,
        commands::{CommandBinding, CommandKind},
        ports::GeneratorPort,
        types::{Analysis, AnalysisMetadata, Entity},
    },
};

use crate::support::{
    EchoGenerator, FailingGenerator, FULL_RULES, NO_REASONING_RULES, NO_SANDBOX_RULES,
    ScriptedAnalyzer, build, build_with_config, orchestrator, scratch_dir,
};

#[tokio::test]
async fn timer_command_succeeds_and_earns_a_reward() {
    let mut orchestrator = orchestrator(FULL_RULES);

    let outcome = orchestrator.handle_turn("set timer 5 minutes").await;
    assert!(outcome.reply.contains("Timer set for 5 minutes"));
    assert!(!outcome.end_session);
    assert_eq!(orchestrator.reward_score(), 1.0);
}

#[tokio::test]
async fn timer_command_is_refused_without_the_sandbox_permission() {
    let mut orchestrator = orchestrator(NO_SANDBOX_RULES);

    let outcome = orchestrator.handle_turn("set timer 5 minutes").await;
    assert_eq!(outcome.reply, "I'm not permitted to execute that command.");
    assert_eq!(orchestrator.reward_score(), 0.0);
}

#[tokio::test]
async fn denied_reasoning_short_circuits_the_turn() {
    let mut orchestrator = orchestrator(NO_REASONING_RULES);

    let outcome = orchestrator.handle_turn("set timer 5 minutes").await;
    assert_eq!(outcome.reply, "I'm not allowed to reason right now.");
    // All later stages are skipped: nothing analyzed, routed, or recorded.
    assert!(orchestrator.memory().short_term().is_empty());
    assert_eq!(orchestrator.governor().audit().len(), 1);
}

#[tokio::test]
async fn gratitude_right_after_a_timer_gets_the_chained_acknowledgment() {
    let mut orchestrator = orchestrator(FULL_RULES);

    orchestrator.handle_turn("set timer 5 minutes").await;
    let outcome = orchestrator.handle_turn("thank you").await;
    assert_eq!(outcome.reply, "You're welcome, Yuu! Timer's all set.");
}

#[tokio::test]
async fn gratitude_without_a_prior_timer_gets_the_generic_reply() {
    let mut orchestrator = orchestrator(FULL_RULES);

    let outcome = orchestrator.handle_turn("thank you").await;
    assert_eq!(outcome.reply, "You're welcome, Yuu!");
}

#[tokio::test]
async fn malformed_timer_duration_takes_the_apology_path() {
    let mut orchestrator = orchestrator(FULL_RULES);

    let outcome = orchestrator.handle_turn("set timer soon minutes").await;
    assert_eq!(outcome.reply, "I couldn't complete that command.");
    assert_eq!(orchestrator.reward_score(), -1.0);
}

#[tokio::test]
async fn distress_input_earns_the_empathetic_append() {
    let mut orchestrator = orchestrator(FULL_RULES);

    let outcome = orchestrator.handle_turn("my week was stressed and awful").await;
    assert!(outcome.reply.ends_with("I'm here with you."));
}

#[tokio::test]
async fn generative_branch_uses_the_placeholder_without_a_backend() {
    let mut orchestrator = orchestrator(FULL_RULES);

    let outcome = orchestrator.handle_turn("what do you make of rust").await;
    assert_eq!(outcome.reply, "I'm listening. Tell me more.");
}

#[tokio::test]
async fn generator_receives_assembled_context_and_its_reply_is_used() {
    let generator = EchoGenerator::new();
    let mut orchestrator = build(
        FULL_RULES,
        Arc::new(KeywordAnalyzer::new()),
        Some(generator.clone() as Arc<dyn GeneratorPort>),
    );

    orchestrator.handle_turn("what do you make of rust").await;
    let outcome = orchestrator.handle_turn("and what about sailing").await;
    assert_eq!(outcome.reply, "Here is what I came up with.");

    let prompt = generator
        .last_prompt
        .lock()
        .expect("prompt lock")
        .clone()
        .expect("generator should have been called");
    assert!(prompt.contains("You are Kaia."));
    assert!(prompt.contains("Recent context:"));
    assert!(prompt.contains("User: what do you make of rust"));
    assert!(prompt.contains("Emotional trend:"));
    assert!(prompt.contains("Respond naturally."));
    assert!(prompt.contains("User: and what about sailing"));
}

#[tokio::test]
async fn generator_failure_degrades_to_the_neutral_fallback() {
    let mut orchestrator = build(
        FULL_RULES,
        Arc::new(KeywordAnalyzer::new()),
        Some(Arc::new(FailingGenerator) as Arc<dyn GeneratorPort>),
    );

    let outcome = orchestrator.handle_turn("what do you make of rust").await;
    assert_eq!(outcome.reply, "I'm listening.");
}

#[tokio::test]
async fn goodbye_ends_the_session() {
    let mut orchestrator = orchestrator(FULL_RULES);

    let outcome = orchestrator.handle_turn("goodbye").await;
    assert!(outcome.end_session);
    assert_eq!(outcome.reply, "Goodbye, Yuu.");
}

#[tokio::test]
async fn recorded_item_carries_the_pre_turn_affect_snapshot() {
    let mut orchestrator = orchestrator(FULL_RULES);

    orchestrator.handle_turn("thank you").await;

    let recorded = &orchestrator.memory().short_term()[0];
    assert_eq!(recorded.emotion, AffectVector::baseline());
    // gratitude intent plus strong sentiment saturates the importance score.
    assert_eq!(recorded.importance, 1.0);
    assert_eq!(orchestrator.memory().long_term().len(), 1);
    // The turn itself moved the live affect state past the snapshot.
    assert_ne!(*orchestrator.affect(), AffectVector::baseline());
}

#[tokio::test]
async fn audit_trail_grows_once_per_gate_and_clamp() {
    let mut orchestrator = orchestrator(FULL_RULES);

    // Generative turn: one reasoning gate plus four personality clamps.
    orchestrator.handle_turn("what do you make of rust").await;
    assert_eq!(orchestrator.governor().audit().len(), 5);

    // Command turn adds the sandbox gate as a second permission check.
    orchestrator.handle_turn("set timer 5 minutes").await;
    assert_eq!(orchestrator.governor().audit().len(), 11);
}

#[tokio::test]
async fn greeting_acknowledges_a_named_person() {
    let analyzer = ScriptedAnalyzer::new(Analysis {
        intent: "greeting".to_string(),
        metadata: AnalysisMetadata {
            sentiment: None,
            entities: vec![Entity {
                text: "Rin".to_string(),
                label: "PERSON".to_string(),
            }],
            confidence: 0.9,
            semantic_similarity: Default::default(),
        },
    });
    let mut orchestrator = build(FULL_RULES, analyzer, None);

    let outcome = orchestrator.handle_turn("hi").await;
    assert!(outcome.reply.starts_with("Hi Yuu, I'm right here."));
    assert!(outcome.reply.contains("Nice to see you, Rin!"));
}

#[tokio::test]
async fn negative_sentiment_small_talk_checks_in() {
    let mut config = Config::default();
    config.memory.state_path = scratch_dir().join("memory.json");
    config.commands.push(CommandBinding {
        keyword: "check in".to_string(),
        command: CommandKind::SmallTalk,
    });

    let analyzer = ScriptedAnalyzer::new(Analysis {
        intent: "unknown".to_string(),
        metadata: AnalysisMetadata {
            sentiment: Some(SentimentScores {
                positive: 0,
                negative: 2,
                compound: -0.8,
            }),
            entities: Vec::new(),
            confidence: 0.2,
            semantic_similarity: Default::default(),
        },
    });
    let mut orchestrator = build_with_config(config, FULL_RULES, analyzer, None);

    let outcome = orchestrator.handle_turn("check in").await;
    assert!(outcome.reply.contains("You sound down"));
}
