//! Optional remote hint/action provider.
//!
//! A language model sees a compact [`AdvisorSnapshot`] of the game and returns
//! either free text (hints) or a single action token. Every failure is absorbed
//! by [`AdvisedPlay`], which falls back to the local heuristics.

use crate::engine::Action;
use crate::grid::{Direction, Position};
use crate::heuristics;
use crate::rng::GameRng;
use crate::world::{GameState, Percepts};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors at the advisor boundary. None of these ever reach game state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("advisor not configured: {0}")]
    NotConfigured(String),

    #[error("advisor transport error: {0}")]
    Transport(String),

    #[error("advisor timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("advisor returned status {0}")]
    Status(u16),

    #[error("invalid advisor response: {0}")]
    InvalidResponse(String),

    #[error("advisor response blocked: {0}")]
    Blocked(String),
}

/// What the remote model is told about the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorSnapshot {
    pub position: Position,
    pub direction: Direction,
    pub has_gold: bool,
    pub has_arrow: bool,
    pub percepts: Percepts,
    pub visited_cells: usize,
    pub total_cells: usize,
    pub grid_size: i32,
}

impl AdvisorSnapshot {
    pub fn of(state: &GameState) -> Self {
        AdvisorSnapshot {
            position: state.agent_position,
            direction: state.agent_direction,
            has_gold: state.has_gold,
            has_arrow: state.has_arrow,
            percepts: state.percepts,
            visited_cells: state.visited_count(),
            total_cells: state.total_cells(),
            grid_size: state.grid_size,
        }
    }
}

/// Prompt asking for a short hint
pub fn build_prompt(snapshot: &AdvisorSnapshot) -> String {
    let percepts = serde_json::to_string(&snapshot.percepts).unwrap_or_default();

    let mut notes = Vec::new();
    if snapshot.percepts.stench {
        notes.push("- There is a stench, so the Wumpus is adjacent.");
    }
    if snapshot.percepts.breeze {
        notes.push("- There is a breeze, so a pit is adjacent.");
    }
    if snapshot.percepts.glitter {
        notes.push("- There is a glitter, so the gold is in this cell.");
    }
    if snapshot.has_gold {
        notes.push("- The player has the gold and should return to (0,0).");
    } else {
        notes.push("- The player still needs to find the gold.");
    }

    format!(
        "You are helping a player explore the Wumpus World cave.\n\
         Current state:\n\
         - Position: {}\n\
         - Direction: {}\n\
         - Has gold: {}\n\
         - Has arrow: {}\n\
         - Percepts: {}\n\
         - Visited cells: {} out of {}\n\n\
         Give a concise hint (at most 2 sentences) for the best next move. Consider:\n\
         {}\n\n\
         Only recommend safe moves when possible.",
        snapshot.position,
        snapshot.direction,
        snapshot.has_gold,
        snapshot.has_arrow,
        percepts,
        snapshot.visited_cells,
        snapshot.total_cells,
        notes.join("\n"),
    )
}

/// Prompt asking for exactly one action token
pub fn build_action_prompt(snapshot: &AdvisorSnapshot) -> String {
    let tokens: Vec<String> = Action::ALL.iter().map(|a| format!("\"{}\"", a)).collect();
    format!(
        "{}\n\nReply with ONLY ONE of these actions and nothing else:\n{}\n",
        build_prompt(snapshot),
        tokens.join(", ")
    )
}

/// A remote hint/action source
pub trait Advisor {
    fn hint(&self, snapshot: &AdvisorSnapshot) -> Result<String, AdvisorError>;

    /// Raw reply; validated by the caller
    fn action(&self, snapshot: &AdvisorSnapshot) -> Result<String, AdvisorError>;

    fn name(&self) -> &str;
}

/// Map a reply to an action. Anything outside the vocabulary becomes `moveForward`.
pub fn parse_action_token(reply: &str) -> Action {
    let token = reply.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`');
    match token.parse::<Action>() {
        Ok(action) => action,
        Err(_) => {
            warn!(reply, "advisor returned an invalid action, using moveForward");
            Action::MoveForward
        }
    }
}

/// Hint and action sources that never fail: remote when configured, local otherwise.
///
/// A reply outside the action vocabulary becomes `moveForward`. A failed request
/// (transport, timeout, bad status, blocked) is answered by the local policy
/// rather than a fixed `moveForward`, so the bot keeps following its own
/// heuristics while the advisor is unreachable.
pub struct AdvisedPlay<'a> {
    advisor: Option<&'a dyn Advisor>,
}

impl<'a> AdvisedPlay<'a> {
    pub fn local() -> Self {
        AdvisedPlay { advisor: None }
    }

    pub fn remote(advisor: &'a dyn Advisor) -> Self {
        AdvisedPlay { advisor: Some(advisor) }
    }

    pub fn is_remote(&self) -> bool {
        self.advisor.is_some()
    }

    pub fn hint(&self, state: &GameState) -> String {
        let Some(advisor) = self.advisor else {
            return heuristics::hint(state);
        };

        match advisor.hint(&AdvisorSnapshot::of(state)) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(advisor = advisor.name(), "empty hint, using local heuristic");
                heuristics::hint(state)
            }
            Err(e) => {
                warn!(advisor = advisor.name(), error = %e, "hint request failed, using local heuristic");
                heuristics::hint(state)
            }
        }
    }

    pub fn action(&self, state: &GameState, rng: &mut GameRng) -> Action {
        let Some(advisor) = self.advisor else {
            return heuristics::policy(state, rng);
        };

        match advisor.action(&AdvisorSnapshot::of(state)) {
            Ok(reply) => parse_action_token(&reply),
            Err(e) => {
                warn!(advisor = advisor.name(), error = %e, "action request failed, using local policy");
                heuristics::policy(state, rng)
            }
        }
    }
}

#[cfg(feature = "gemini")]
pub use gemini::GeminiAdvisor;

#[cfg(feature = "gemini")]
mod gemini {
    use super::{build_action_prompt, build_prompt, Advisor, AdvisorError, AdvisorSnapshot};
    use crate::config::AdvisorConfig;
    use std::time::Duration;

    /// Advisor backed by the Google Generative Language `generateContent` endpoint
    #[derive(Debug, Clone)]
    pub struct GeminiAdvisor {
        endpoint: String,
        model: String,
        api_key: String,
        timeout: Duration,
        hint_temperature: f32,
        hint_max_tokens: u32,
        action_temperature: f32,
        action_max_tokens: u32,
    }

    impl GeminiAdvisor {
        /// Build from config, reading the key from the configured environment variable
        pub fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
            let api_key = std::env::var(&config.api_key_env)
                .ok()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    AdvisorError::NotConfigured(format!("environment variable {} is not set", config.api_key_env))
                })?;

            Ok(Self {
                endpoint: config.endpoint.trim_end_matches('/').to_string(),
                model: config.model.clone(),
                api_key,
                timeout: Duration::from_millis(config.timeout_ms),
                hint_temperature: config.hint_temperature,
                hint_max_tokens: config.hint_max_tokens,
                action_temperature: config.action_temperature,
                action_max_tokens: config.action_max_tokens,
            })
        }

        fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String, AdvisorError> {
            let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
            let body = serde_json::json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": {
                    "temperature": temperature,
                    "maxOutputTokens": max_tokens,
                }
            });

            let response = ureq::post(&url)
                .timeout(self.timeout)
                .set("x-goog-api-key", &self.api_key)
                .send_json(&body)
                .map_err(|e| match e {
                    ureq::Error::Status(code, _) => AdvisorError::Status(code),
                    ureq::Error::Transport(t) => {
                        let msg = t.to_string();
                        if msg.contains("timed out") || msg.contains("timeout") {
                            AdvisorError::Timeout { elapsed_ms: self.timeout.as_millis() as u64 }
                        } else {
                            AdvisorError::Transport(msg)
                        }
                    }
                })?;

            let json: serde_json::Value = response
                .into_json()
                .map_err(|e| AdvisorError::InvalidResponse(e.to_string()))?;

            extract_text(&json)
        }
    }

    pub(super) fn extract_text(json: &serde_json::Value) -> Result<String, AdvisorError> {
        if let Some(text) = json.pointer("/candidates/0/content/parts/0/text").and_then(|v| v.as_str()) {
            return Ok(text.to_string());
        }
        if let Some(reason) = json.pointer("/promptFeedback/blockReason").and_then(|v| v.as_str()) {
            return Err(AdvisorError::Blocked(reason.to_string()));
        }
        Err(AdvisorError::InvalidResponse("missing candidates[0].content.parts[0].text".to_string()))
    }

    impl Advisor for GeminiAdvisor {
        fn hint(&self, snapshot: &AdvisorSnapshot) -> Result<String, AdvisorError> {
            self.generate(&build_prompt(snapshot), self.hint_temperature, self.hint_max_tokens)
        }

        fn action(&self, snapshot: &AdvisorSnapshot) -> Result<String, AdvisorError> {
            self.generate(&build_action_prompt(snapshot), self.action_temperature, self.action_max_tokens)
        }

        fn name(&self) -> &str {
            "gemini"
        }
    }

}
