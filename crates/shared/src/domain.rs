use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(LetterId);

pub const STUDENT_ROLE: &str = "Student";

/// Role as reported by the server. Anything that is not the student role is
/// an administrative office such as "SRC" or "Dean".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Student,
    Admin(String),
}

impl Role {
    pub fn is_student(&self) -> bool {
        matches!(self, Role::Student)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => STUDENT_ROLE,
            Role::Admin(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case(STUDENT_ROLE) {
            Role::Student
        } else {
            Role::Admin(value)
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Student => STUDENT_ROLE.to_string(),
            Role::Admin(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a letter or of one approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LetterStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LetterStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LetterStatus::Pending => "pending",
            LetterStatus::Approved => "approved",
            LetterStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LetterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Approve,
    Reject,
    Comment,
}

impl ActionKind {
    pub fn is_decision(self) -> bool {
        matches!(self, ActionKind::Approve | ActionKind::Reject)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Approve => "approve",
            ActionKind::Reject => "reject",
            ActionKind::Comment => "comment",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses server timestamps. The backend emits offset-less ISO-8601 values
/// which are taken as UTC; RFC 3339 values are accepted too.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_role_is_case_insensitive() {
        assert_eq!(Role::from("student"), Role::Student);
        assert_eq!(Role::from(" STUDENT "), Role::Student);
        assert_eq!(Role::from("SRC"), Role::Admin("SRC".into()));
    }

    #[test]
    fn role_round_trips_as_plain_string() {
        let json = serde_json::to_string(&Role::Admin("Dean".into())).expect("serialize");
        assert_eq!(json, "\"Dean\"");
        let role: Role = serde_json::from_str("\"Student\"").expect("deserialize");
        assert!(role.is_student());
    }

    #[test]
    fn parses_naive_and_offset_timestamps() {
        let naive = parse_timestamp("2024-03-01T10:15:30.123456").expect("naive");
        let offset = parse_timestamp("2024-03-01T10:15:30.123456Z").expect("offset");
        assert_eq!(naive, offset);
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn action_kind_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&ActionKind::Comment).expect("serialize"),
            "\"comment\""
        );
        assert!(ActionKind::Reject.is_decision());
        assert!(!ActionKind::Comment.is_decision());
    }
}
