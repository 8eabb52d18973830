use anyhow::Result;
use exit_client::{
    validation::clamp_to_word_limit,
    view::{
        render_action_outcome, render_history, render_letter_detail, render_overview,
        render_queue, render_students, PendingRequestView, Screen, StudentStatusView,
        WordCounterView,
    },
    ApprovalController, ClientEvent, NoticeLevel,
};
use shared::domain::{ActionKind, LetterId, UserId};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::{prompt, ActArgs, AdminCommand, StudentCommand};

/// One terminal session: a controller plus the notices it publishes.
pub struct Desk {
    controller: ApprovalController,
    events: broadcast::Receiver<ClientEvent>,
}

impl Desk {
    pub fn new(controller: ApprovalController) -> Self {
        let events = controller.subscribe_events();
        Self { controller, events }
    }

    pub fn flush_notices(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(ClientEvent::Notice(notice)) => match notice.level {
                    NoticeLevel::Error | NoticeLevel::Warning => eprintln!("{notice}"),
                    NoticeLevel::Success | NoticeLevel::Info => println!("{notice}"),
                },
                Ok(ClientEvent::SessionChanged(identity)) => {
                    debug!(screen = ?Screen::for_identity(identity.as_ref()), "session changed");
                }
                Ok(ClientEvent::PendingSelected(letter_id)) => {
                    debug!(?letter_id, "pending selection changed");
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "dropped notices");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    async fn print_header(&self) {
        let identity = self.controller.session().current().await;
        let panel = match Screen::for_identity(identity.as_ref()) {
            Screen::Login => return,
            Screen::StudentPanel => "Student",
            Screen::AdminPanel => "Admin",
        };
        if let Some(identity) = identity {
            println!("== {panel}: {} ==", identity.display_name());
        }
    }

    pub async fn student(&mut self, name: &str, matric: &str, command: StudentCommand) -> Result<()> {
        let login = self.controller.student_login(name, matric).await;
        self.flush_notices();
        login?;
        self.print_header().await;

        match command {
            StudentCommand::Status => {
                let status = self.controller.student_status().await;
                self.flush_notices();
                println!("{}", StudentStatusView::from(&status?));
            }
            StudentCommand::Send { reason } => {
                let reason = self.read_reason(reason)?;
                let sent = self.controller.send_request(&reason).await;
                self.flush_notices();
                println!("Request #{} submitted", sent?.id);
            }
            StudentCommand::Resend { reason } => {
                let reason = self.read_reason(reason)?;
                let letter_id = self.controller.resend_request(&reason).await;
                self.flush_notices();
                println!("Request #{} back in review", letter_id?);
            }
        }
        Ok(())
    }

    fn read_reason(&self, given: Option<String>) -> Result<String> {
        let raw = prompt::read_reason(given)?;
        let clamped = clamp_to_word_limit(&raw);
        println!("{}", WordCounterView::for_text(&clamped.text));
        if clamped.truncated {
            println!("Reason cut to the first {} words", clamped.words);
        }
        Ok(clamped.text)
    }

    pub async fn admin(
        &mut self,
        name: &str,
        token: Option<String>,
        command: AdminCommand,
    ) -> Result<()> {
        let login = self.controller.admin_login(name, token).await;
        self.flush_notices();
        login?;
        self.print_header().await;

        match command {
            AdminCommand::Overview => {
                let overview = self.controller.admin_overview().await;
                self.flush_notices();
                println!("{}", render_overview(&overview?));
            }
            AdminCommand::Pending => {
                let pending = self.controller.load_pending_request().await;
                self.flush_notices();
                println!("{}", PendingRequestView::from(pending?.as_ref()));
            }
            AdminCommand::Approve(args) => self.act(ActionKind::Approve, args).await?,
            AdminCommand::Reject(args) => self.act(ActionKind::Reject, args).await?,
            AdminCommand::Comment(args) => self.act(ActionKind::Comment, args).await?,
            AdminCommand::Show { letter_id } => {
                let detail = self.controller.letter_detail(LetterId(letter_id)).await;
                self.flush_notices();
                println!("{}", render_letter_detail(&detail?));
            }
            AdminCommand::History { letter_id } => {
                let detail = self.controller.letter_detail(LetterId(letter_id)).await;
                self.flush_notices();
                let lines = render_history(&detail?);
                if lines.is_empty() {
                    println!("No approval steps recorded");
                }
                for line in lines {
                    println!("{line}");
                }
            }
            AdminCommand::Queue { role } => {
                let rows = self.controller.role_queue(&role).await;
                self.flush_notices();
                println!("{}", render_queue(role.trim(), &rows?));
            }
            AdminCommand::Students => {
                let students = self.controller.list_students().await;
                self.flush_notices();
                println!("{}", render_students(&students?));
            }
            AdminCommand::AddStudent { name } => {
                let user = self.controller.add_student(&name).await;
                self.flush_notices();
                let user = user?;
                println!("{} has id {}", user.name, user.id);
            }
            AdminCommand::ResetPassword { user_id, yes } => {
                if !yes && !prompt::confirm(&format!("Reset the password of user {user_id}?"))? {
                    println!("Cancelled");
                    return Ok(());
                }
                let reset = self.controller.reset_password(UserId(user_id)).await;
                self.flush_notices();
                reset?;
            }
            AdminCommand::DeleteStudent { user_id, yes } => {
                if !yes
                    && !prompt::confirm(&format!(
                        "Delete student {user_id}? This cannot be undone."
                    ))?
                {
                    println!("Cancelled");
                    return Ok(());
                }
                let deleted = self.controller.delete_student(UserId(user_id)).await;
                self.flush_notices();
                deleted?;
            }
            AdminCommand::Notifications => {
                let notifications = self.controller.notifications().await;
                self.flush_notices();
                let notifications = notifications?;
                if notifications.is_empty() {
                    println!("No notifications");
                }
                for notification in notifications {
                    println!("- {}", notification.message);
                }
            }
        }
        Ok(())
    }

    /// Selects the oldest pending letter, shows it, then submits the action.
    async fn act(&mut self, intent: ActionKind, args: ActArgs) -> Result<()> {
        let pending = self.controller.load_pending_request().await;
        self.flush_notices();
        println!("{}", PendingRequestView::from(pending?.as_ref()));

        let role = match args.role {
            Some(role) => Some(role),
            None => prompt::ask(&format!(
                "Act as role [{}]: ",
                self.controller.default_actor_role()
            ))?,
        };
        let comment = match (intent, args.comment, &args.recommendation) {
            (ActionKind::Comment, None, None) => prompt::ask("Comment: ")?,
            (_, comment, _) => comment,
        };

        let outcome = self
            .controller
            .admin_act(
                intent,
                role.as_deref(),
                comment.as_deref(),
                args.recommendation.as_deref(),
            )
            .await;
        self.flush_notices();
        println!("{}", render_action_outcome(&outcome?));
        Ok(())
    }
}
