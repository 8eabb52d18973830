use shared::{
    domain::{ActionKind, LetterId, LetterStatus, Role, UserId},
    protocol::{ApprovalStep, CurrentStep, Letter, LetterDetail, User},
};

use crate::{
    api::ActionReceipt,
    controller::{ActionOutcome, AdminOverview},
    lifecycle::{plan_action, StudentStatus},
    session::Identity,
    view::{
        render_action_outcome, render_history, render_overview, render_students,
        PendingRequestView, Screen, StudentStatusView, WordCounterView, NO_REQUEST_TEXT,
    },
};

fn letter(status: LetterStatus) -> Letter {
    Letter {
        id: LetterId(12),
        sender_id: UserId(3),
        sender_name: "Ada".into(),
        sender_role: Some(Role::Student),
        title: "Exit Request".into(),
        body: "Dentist appointment downtown".into(),
        status,
        created_at: "2024-05-01T09:00:00".into(),
        current_step: Some(1),
    }
}

#[test]
fn screen_follows_identity() {
    assert_eq!(Screen::for_identity(None), Screen::Login);
    let admin = Identity::Admin {
        name: "Registrar".into(),
        token: None,
    };
    assert_eq!(Screen::for_identity(Some(&admin)), Screen::AdminPanel);
    let student = Identity::Student {
        user: User {
            id: UserId(3),
            name: "Ada".into(),
            role: Role::Student,
        },
        matric: "U3".into(),
    };
    assert_eq!(Screen::for_identity(Some(&student)), Screen::StudentPanel);
}

#[test]
fn student_status_view_hides_details_without_request() {
    let view = StudentStatusView::from(&StudentStatus::NoRequest);
    assert_eq!(view.status, NO_REQUEST_TEXT);
    assert!(view.details.is_none());
    assert_eq!(view.to_string(), "Status: No request yet");
}

#[test]
fn student_status_view_shows_latest_request() {
    let view = StudentStatusView::from(&StudentStatus::Current(letter(LetterStatus::Approved)));
    assert_eq!(view.status, "approved");
    let details = view.details.as_ref().expect("details");
    assert_eq!(details.reason, "Dentist appointment downtown");
    assert!(view.to_string().contains("Submitted: 2024-05-01T09:00:00"));
}

#[test]
fn pending_view_reports_empty_queue() {
    assert_eq!(PendingRequestView::from(None).to_string(), "No pending request");
    let selected = letter(LetterStatus::Pending);
    let view = PendingRequestView::from(Some(&selected));
    assert!(view.to_string().starts_with("Request #12\nStudent: Ada (id 3)"));
}

#[test]
fn word_counter_flags_overflow() {
    let text = vec!["w"; 1001].join(" ");
    let counter = WordCounterView::for_text(&text);
    assert!(counter.over_limit);
    assert_eq!(counter.to_string(), "1001/1000 words");
}

#[test]
fn overview_lists_recent_letters() {
    let rendered = render_overview(&AdminOverview {
        pending_count: 1,
        recent: vec![letter(LetterStatus::Pending)],
    });
    assert_eq!(rendered, "Pending: 1\n  #12 Exit Request | Ada | pending");
}

#[test]
fn history_lists_steps_with_comments() {
    let detail = LetterDetail {
        letter: letter(LetterStatus::Pending),
        steps: vec![
            ApprovalStep {
                step_index: 0,
                role: "SRC".into(),
                status: LetterStatus::Approved,
                actor_name: Some("Registrar".into()),
                actor_role: Some("SRC".into()),
                comments: Some("ok\nRecommendations: travel safe".into()),
                acted_at: Some("2024-05-02T10:00:00".into()),
            },
            ApprovalStep {
                step_index: 1,
                role: "Faculty".into(),
                status: LetterStatus::Pending,
                actor_name: None,
                actor_role: None,
                comments: None,
                acted_at: None,
            },
        ],
        current_step: Some(CurrentStep {
            role: "Faculty".into(),
            status: LetterStatus::Pending,
        }),
        total_steps: 2,
    };
    let lines = render_history(&detail);
    assert_eq!(
        lines[0],
        "[+] Step 1: SRC by Registrar on 2024-05-02T10:00:00\n      ok\n      Recommendations: travel safe"
    );
    assert_eq!(lines[1], "[ ] Step 2: Faculty");
}

#[test]
fn students_and_outcomes_render() {
    let rendered = render_students(&[User {
        id: UserId(7),
        name: "Grace".into(),
        role: Role::Student,
    }]);
    assert_eq!(rendered, "Students: 1\n      7  Grace");

    let outcome = ActionOutcome {
        plan: plan_action(ActionKind::Approve, Some("note"), None).expect("plan"),
        actor_role: "SRC".into(),
        receipt: ActionReceipt::Ack("ok".into()),
        next_pending: None,
    };
    assert_eq!(
        render_action_outcome(&outcome),
        "Submitted comment as SRC (requested approve)\nNo pending request"
    );
}
