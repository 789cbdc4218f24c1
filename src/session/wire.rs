//! Wire types for the `/answer` exchange.
//!
//! The scoring endpoint takes the question id, the raw answer text and the
//! response time, and replies with a correctness verdict, an explanation and
//! the XP earned. Optional fields are genuinely optional on the wire: the
//! server omits the revealed answer outside choice questions and sends
//! `battle_status: null` outside battles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scoring endpoint path, relative to the page origin.
pub const ANSWER_ENDPOINT: &str = "/answer";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("answer request failed: {0}")]
    Transport(String),
    #[error("scoring reply was not valid JSON: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnswerRequest {
    pub question_id: String,
    pub answer: String,
    /// Seconds from question reveal to submit, fractional.
    pub response_time: f64,
}

/// Server-side battle bookkeeping as reported back with each scored answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BattleStatus {
    InProgress,
    Won,
    Lost,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnswerReply {
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub xp_earned: u32,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub leveled_up: bool,
    #[serde(default)]
    pub battle_status: Option<BattleStatus>,
}

impl AnswerReply {
    pub fn from_json(body: &str) -> Result<Self, SubmitError> {
        serde_json::from_str(body).map_err(|err| SubmitError::Decode(err.to_string()))
    }

    /// Stand-in reply when the request never produced a usable verdict:
    /// counts as incorrect, earns nothing, and carries a generic explanation
    /// so the feedback region has something to show. The session advances
    /// normally afterwards instead of stalling on the failed question.
    pub fn submit_failure() -> Self {
        Self {
            is_correct: false,
            explanation: "An error occurred while submitting your answer. Please try again."
                .to_owned(),
            xp_earned: 0,
            correct_answer: None,
            leveled_up: false,
            battle_status: None,
        }
    }
}
