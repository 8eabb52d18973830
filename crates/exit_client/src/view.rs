//! View models for front-ends. Pure mappings from controller state to what
//! is shown; no rules live here.

use std::fmt;

use shared::{
    domain::{LetterId, LetterStatus, UserId},
    protocol::{Letter, LetterDetail, PendingStep, User},
};

use crate::{
    controller::{ActionOutcome, AdminOverview},
    lifecycle::StudentStatus,
    session::Identity,
    validation::{count_words, WORD_LIMIT},
};

pub const NO_REQUEST_TEXT: &str = "No request yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    StudentPanel,
    AdminPanel,
}

impl Screen {
    pub fn for_identity(identity: Option<&Identity>) -> Self {
        match identity {
            None => Screen::Login,
            Some(Identity::Student { .. }) => Screen::StudentPanel,
            Some(Identity::Admin { .. }) => Screen::AdminPanel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDetails {
    pub reason: String,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentStatusView {
    pub status: String,
    pub details: Option<RequestDetails>,
}

impl From<&StudentStatus> for StudentStatusView {
    fn from(status: &StudentStatus) -> Self {
        match status {
            StudentStatus::NoRequest => Self {
                status: NO_REQUEST_TEXT.to_string(),
                details: None,
            },
            StudentStatus::Current(letter) => Self {
                status: letter.status.to_string(),
                details: Some(RequestDetails {
                    reason: letter.body.clone(),
                    submitted_at: letter.created_at.clone(),
                }),
            },
        }
    }
}

impl fmt::Display for StudentStatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status: {}", self.status)?;
        if let Some(details) = &self.details {
            write!(f, "\nReason: {}", details.reason)?;
            write!(f, "\nSubmitted: {}", details.submitted_at)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequestView {
    Empty,
    Selected {
        letter_id: LetterId,
        student: String,
        sender_id: UserId,
        reason: String,
        submitted_at: String,
    },
}

impl From<Option<&Letter>> for PendingRequestView {
    fn from(letter: Option<&Letter>) -> Self {
        match letter {
            None => PendingRequestView::Empty,
            Some(letter) => PendingRequestView::Selected {
                letter_id: letter.id,
                student: letter.sender_name.clone(),
                sender_id: letter.sender_id,
                reason: letter.body.clone(),
                submitted_at: letter.created_at.clone(),
            },
        }
    }
}

impl fmt::Display for PendingRequestView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingRequestView::Empty => f.write_str("No pending request"),
            PendingRequestView::Selected {
                letter_id,
                student,
                sender_id,
                reason,
                submitted_at,
            } => write!(
                f,
                "Request #{letter_id}\nStudent: {student} (id {sender_id})\nReason: {reason}\nSubmitted: {submitted_at}"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCounterView {
    pub count: usize,
    pub over_limit: bool,
}

impl WordCounterView {
    pub fn for_text(text: &str) -> Self {
        let count = count_words(text);
        Self {
            count,
            over_limit: count > WORD_LIMIT,
        }
    }
}

impl fmt::Display for WordCounterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} words", self.count, WORD_LIMIT)
    }
}

fn status_marker(status: LetterStatus) -> &'static str {
    match status {
        LetterStatus::Pending => "[ ]",
        LetterStatus::Approved => "[+]",
        LetterStatus::Rejected => "[x]",
    }
}

pub fn render_overview(overview: &AdminOverview) -> String {
    let mut out = format!("Pending: {}", overview.pending_count);
    for letter in &overview.recent {
        out.push_str(&format!(
            "\n  #{} {} | {} | {}",
            letter.id, letter.title, letter.sender_name, letter.status
        ));
    }
    out
}

pub fn render_letter_detail(detail: &LetterDetail) -> String {
    let letter = &detail.letter;
    let sender_role = letter
        .sender_role
        .as_ref()
        .map(|role| format!(" ({role})"))
        .unwrap_or_default();
    let mut out = format!(
        "Letter #{}: {}\nFrom: {}{sender_role}\nBody: {}\nStatus: {}\nSent: {}",
        letter.id, letter.title, letter.sender_name, letter.body, letter.status, letter.created_at
    );
    if let Some(current) = &detail.current_step {
        out.push_str(&format!("\nWaiting on: {}", current.role));
    }
    out.push_str(&format!("\nSteps ({}):", detail.total_steps));
    for line in render_history(detail) {
        out.push_str("\n  ");
        out.push_str(&line);
    }
    out
}

/// One line per approval step, with any comments indented beneath.
pub fn render_history(detail: &LetterDetail) -> Vec<String> {
    detail
        .steps
        .iter()
        .map(|step| {
            let mut line = format!(
                "{} Step {}: {}",
                status_marker(step.status),
                step.step_index + 1,
                step.role
            );
            if let Some(actor) = &step.actor_name {
                line.push_str(&format!(" by {actor}"));
            }
            if let Some(acted_at) = &step.acted_at {
                line.push_str(&format!(" on {acted_at}"));
            }
            if let Some(comments) = step.comments.as_deref().filter(|c| !c.is_empty()) {
                for comment in comments.lines() {
                    line.push_str(&format!("\n      {comment}"));
                }
            }
            line
        })
        .collect()
}

pub fn render_queue(role: &str, rows: &[PendingStep]) -> String {
    if rows.is_empty() {
        return format!("No pending letters for role: {role}");
    }
    let mut out = format!("Pending letters for {role}:");
    for row in rows {
        out.push_str(&format!(
            "\n  #{} {} | {} | step {} | {}",
            row.letter_id,
            row.title,
            row.sender_name,
            row.step_index + 1,
            row.created_at
        ));
    }
    out
}

pub fn render_students(students: &[User]) -> String {
    let mut out = format!("Students: {}", students.len());
    for student in students {
        out.push_str(&format!("\n  {:>5}  {}", student.id.0, student.name));
    }
    out
}

pub fn render_action_outcome(outcome: &ActionOutcome) -> String {
    let mut out = format!(
        "Submitted {} as {}",
        outcome.plan.action, outcome.actor_role
    );
    if outcome.plan.overridden() {
        out.push_str(&format!(" (requested {})", outcome.plan.intent));
    }
    if let Some(detail) = outcome.receipt.letter() {
        out.push_str(&format!("\nLetter status: {}", detail.letter.status));
        if let Some(current) = &detail.current_step {
            out.push_str(&format!("\nNext approver: {}", current.role));
        }
    }
    out.push('\n');
    out.push_str(&PendingRequestView::from(outcome.next_pending.as_ref()).to_string());
    out
}
