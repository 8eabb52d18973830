//! Rules for reading request state out of the letter list and for shaping
//! admin actions. Nothing here touches the network.

use std::cmp::Ordering;

use shared::{
    domain::{ActionKind, UserId},
    protocol::Letter,
};

use crate::error::ValidationError;

pub const DEFAULT_ACTOR_ROLE: &str = "SRC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentStatus {
    NoRequest,
    Current(Letter),
}

impl StudentStatus {
    pub fn letter(&self) -> Option<&Letter> {
        match self {
            StudentStatus::NoRequest => None,
            StudentStatus::Current(letter) => Some(letter),
        }
    }
}

/// Orders letters by creation time, then id. Unparseable timestamps sort
/// before every parseable one.
fn by_creation(a: &Letter, b: &Letter) -> Ordering {
    a.created_at_utc()
        .cmp(&b.created_at_utc())
        .then_with(|| a.id.cmp(&b.id))
}

/// The sender's most recently created letter.
pub fn current_status(letters: &[Letter], sender_id: UserId) -> StudentStatus {
    letters
        .iter()
        .filter(|letter| letter.sender_id == sender_id)
        .max_by(|a, b| by_creation(a, b))
        .cloned()
        .map_or(StudentStatus::NoRequest, StudentStatus::Current)
}

/// The pending letter an admin should act on next: the oldest one.
pub fn actionable_pending(letters: &[Letter]) -> Option<&Letter> {
    letters
        .iter()
        .filter(|letter| letter.is_pending())
        .min_by(|a, b| by_creation(a, b))
}

pub fn pending_count(letters: &[Letter]) -> usize {
    letters.iter().filter(|letter| letter.is_pending()).count()
}

/// Blank input falls back to `default`. The role itself is free text.
pub fn resolve_actor_role(input: Option<&str>, default: &str) -> String {
    input
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    pub intent: ActionKind,
    pub action: ActionKind,
    pub comments: Option<String>,
    pub recommendations: Option<String>,
}

impl ActionPlan {
    /// True when an approve/reject was downgraded to a comment.
    pub fn overridden(&self) -> bool {
        self.intent != self.action
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Decides the action actually submitted. An approval or rejection that
/// carries comments or recommendations is sent as a comment.
pub fn plan_action(
    intent: ActionKind,
    comments: Option<&str>,
    recommendations: Option<&str>,
) -> Result<ActionPlan, ValidationError> {
    let comments = non_empty(comments);
    let recommendations = non_empty(recommendations);
    let has_advice = comments.is_some() || recommendations.is_some();

    let action = match intent {
        ActionKind::Comment if !has_advice => return Err(ValidationError::EmptyComment),
        ActionKind::Approve | ActionKind::Reject if has_advice => ActionKind::Comment,
        other => other,
    };

    Ok(ActionPlan {
        intent,
        action,
        comments,
        recommendations,
    })
}
