use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{parse_timestamp, ActionKind, LetterId, LetterStatus, Role, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

/// A student's exit request as listed by `GET /letters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    pub id: LetterId,
    pub sender_id: UserId,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_role: Option<Role>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub status: LetterStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u32>,
}

impl Letter {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn is_pending(&self) -> bool {
        self.status == LetterStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendLetterRequest {
    pub sender_id: UserId,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentLetter {
    pub id: LetterId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendLetterRequest {
    pub letter_id: LetterId,
    pub sender_id: UserId,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActRequest {
    pub letter_id: LetterId,
    pub actor_name: String,
    pub actor_role: String,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    pub step_index: u32,
    pub role: String,
    #[serde(default)]
    pub status: LetterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStep {
    pub role: String,
    pub status: LetterStatus,
}

/// `GET /letter/{id}` and the body of a successful `POST /act`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterDetail {
    pub letter: Letter,
    #[serde(default)]
    pub steps: Vec<ApprovalStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<CurrentStep>,
    #[serde(default)]
    pub total_steps: usize,
}

/// One row of `GET /pending?role=`: a letter waiting on a given role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingStep {
    pub letter_id: LetterId,
    pub step_index: u32,
    pub role: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub sender_id: UserId,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    pub default_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
}
