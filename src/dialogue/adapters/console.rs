use std::io::{BufRead, Write};

use async_trait::async_trait;

use crate::dialogue::ports::{ListenPort, SpeakPort};

/// Blocking stdin reader kept off the control-flow thread so the run loop's
/// shutdown branch stays responsive while input is pending.
pub struct ConsoleListener {
    prompt: String,
}

impl ConsoleListener {
    pub fn new(user_name: &str) -> Self {
        Self {
            prompt: format!("{user_name}> "),
        }
    }
}

#[async_trait]
impl ListenPort for ConsoleListener {
    async fn listen(&self) -> Option<String> {
        let prompt = self.prompt.clone();
        let acquired = tokio::task::spawn_blocking(move || {
            let mut stdout = std::io::stdout();
            let _ = write!(stdout, "{prompt}");
            let _ = stdout.flush();

            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(0) => None,
                Ok(_) => Some(line),
                Err(err) => {
                    tracing::warn!(target: "dialogue", error = %err, "stdin_read_failed");
                    None
                }
            }
        })
        .await;

        acquired.ok().flatten()
    }
}

pub struct ConsoleSpeaker {
    ai_name: String,
}

impl ConsoleSpeaker {
    pub fn new(ai_name: &str) -> Self {
        Self {
            ai_name: ai_name.to_string(),
        }
    }
}

#[async_trait]
impl SpeakPort for ConsoleSpeaker {
    async fn speak(&self, text: &str) {
        println!("{}> {}", self.ai_name, text);
    }
}
