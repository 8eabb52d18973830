use shared::{
    domain::{ActionKind, LetterId, LetterStatus, UserId},
    protocol::Letter,
};

use crate::{
    error::ValidationError,
    lifecycle::{
        actionable_pending, current_status, pending_count, plan_action, resolve_actor_role,
        StudentStatus, DEFAULT_ACTOR_ROLE,
    },
};

fn letter(id: i64, sender: i64, status: LetterStatus, created_at: &str) -> Letter {
    Letter {
        id: LetterId(id),
        sender_id: UserId(sender),
        sender_name: format!("student-{sender}"),
        sender_role: None,
        title: "Exit Request".into(),
        body: format!("reason for letter {id}"),
        status,
        created_at: created_at.into(),
        current_step: Some(0),
    }
}

#[test]
fn current_status_is_latest_letter_of_sender() {
    let letters = vec![
        letter(1, 1, LetterStatus::Pending, "2024-05-01T09:00:00"),
        letter(2, 1, LetterStatus::Approved, "2024-05-02T09:00:00"),
    ];
    let status = current_status(&letters, UserId(1));
    assert_eq!(status.letter().map(|l| l.status), Some(LetterStatus::Approved));
}

#[test]
fn current_status_ignores_server_order_and_other_senders() {
    let letters = vec![
        letter(7, 2, LetterStatus::Rejected, "2024-06-01T12:00:00"),
        letter(3, 1, LetterStatus::Rejected, "2024-05-03T09:00:00"),
        letter(5, 1, LetterStatus::Pending, "2024-05-04T09:00:00.250000"),
        letter(4, 1, LetterStatus::Approved, "2024-05-04T09:00:00.100000"),
    ];
    let status = current_status(&letters, UserId(1));
    assert_eq!(status.letter().map(|l| l.id), Some(LetterId(5)));
}

#[test]
fn current_status_without_letters_reports_no_request() {
    let letters = vec![letter(1, 2, LetterStatus::Pending, "2024-05-01T09:00:00")];
    assert_eq!(current_status(&letters, UserId(1)), StudentStatus::NoRequest);
    assert_eq!(current_status(&[], UserId(1)), StudentStatus::NoRequest);
}

#[test]
fn unparseable_timestamp_never_wins_current_status() {
    let letters = vec![
        letter(9, 1, LetterStatus::Pending, "not a date"),
        letter(2, 1, LetterStatus::Approved, "2024-01-01T00:00:00"),
    ];
    let status = current_status(&letters, UserId(1));
    assert_eq!(status.letter().map(|l| l.id), Some(LetterId(2)));
}

#[test]
fn equal_timestamps_break_ties_by_id() {
    let letters = vec![
        letter(4, 1, LetterStatus::Approved, "2024-05-01T09:00:00"),
        letter(6, 1, LetterStatus::Rejected, "2024-05-01T09:00:00"),
    ];
    assert_eq!(
        current_status(&letters, UserId(1)).letter().map(|l| l.id),
        Some(LetterId(6))
    );
    let pending = vec![
        letter(8, 1, LetterStatus::Pending, "2024-05-01T09:00:00"),
        letter(5, 2, LetterStatus::Pending, "2024-05-01T09:00:00"),
    ];
    assert_eq!(actionable_pending(&pending).map(|l| l.id), Some(LetterId(5)));
}

#[test]
fn actionable_pending_picks_oldest_pending() {
    let letters = vec![
        letter(10, 3, LetterStatus::Pending, "2024-05-05T09:00:00"),
        letter(8, 2, LetterStatus::Approved, "2024-05-01T09:00:00"),
        letter(9, 1, LetterStatus::Pending, "2024-05-02T09:00:00"),
    ];
    assert_eq!(actionable_pending(&letters).map(|l| l.id), Some(LetterId(9)));
    assert_eq!(pending_count(&letters), 2);
}

#[test]
fn actionable_pending_is_none_when_all_decided() {
    let letters = vec![
        letter(1, 1, LetterStatus::Approved, "2024-05-01T09:00:00"),
        letter(2, 2, LetterStatus::Rejected, "2024-05-02T09:00:00"),
    ];
    assert!(actionable_pending(&letters).is_none());
    assert_eq!(pending_count(&letters), 0);
}

#[test]
fn approve_with_comments_becomes_comment() {
    let plan = plan_action(ActionKind::Approve, Some("check with parents"), None)
        .expect("plan");
    assert_eq!(plan.action, ActionKind::Comment);
    assert!(plan.overridden());
    assert_eq!(plan.comments.as_deref(), Some("check with parents"));
}

#[test]
fn reject_with_recommendation_becomes_comment() {
    let plan = plan_action(ActionKind::Reject, Some("  "), Some("resubmit with dates"))
        .expect("plan");
    assert_eq!(plan.action, ActionKind::Comment);
    assert!(plan.comments.is_none());
    assert_eq!(plan.recommendations.as_deref(), Some("resubmit with dates"));
}

#[test]
fn bare_decisions_are_kept() {
    for intent in [ActionKind::Approve, ActionKind::Reject] {
        let plan = plan_action(intent, Some(""), None).expect("plan");
        assert_eq!(plan.action, intent);
        assert!(!plan.overridden());
    }
}

#[test]
fn comment_requires_some_text() {
    assert_eq!(
        plan_action(ActionKind::Comment, Some(" "), Some("")),
        Err(ValidationError::EmptyComment)
    );
    let plan = plan_action(ActionKind::Comment, None, Some("see dean")).expect("plan");
    assert_eq!(plan.action, ActionKind::Comment);
    assert!(!plan.overridden());
}

#[test]
fn blank_actor_role_uses_default() {
    assert_eq!(resolve_actor_role(None, DEFAULT_ACTOR_ROLE), "SRC");
    assert_eq!(resolve_actor_role(Some("   "), DEFAULT_ACTOR_ROLE), "SRC");
    assert_eq!(resolve_actor_role(Some(" Dean "), DEFAULT_ACTOR_ROLE), "Dean");
}
