use std::sync::Arc;

use shared::{
    domain::{ActionKind, LetterId, LetterStatus, Role, UserId},
    protocol::{
        ActRequest, Letter, LetterDetail, Notification, PasswordReset, PendingStep,
        ResendLetterRequest, SendLetterRequest, SentLetter, User,
    },
};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    api::{ActionReceipt, ApprovalApi},
    error::{ClientError, Notice, ValidationError},
    lifecycle::{
        actionable_pending, current_status, pending_count, plan_action, resolve_actor_role,
        ActionPlan, StudentStatus, DEFAULT_ACTOR_ROLE,
    },
    session::{Identity, SessionStore},
    validation::{require, validate_reason},
};

pub const REQUEST_TITLE: &str = "Exit Request";
pub const OVERVIEW_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub enum ClientEvent {
    Notice(Notice),
    SessionChanged(Option<Identity>),
    PendingSelected(Option<LetterId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOverview {
    pub pending_count: usize,
    pub recent: Vec<Letter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub plan: ActionPlan,
    pub actor_role: String,
    pub receipt: ActionReceipt,
    pub next_pending: Option<Letter>,
}

/// Drives the request lifecycle against an `ApprovalApi`. Every operation
/// returns its result and also publishes a `Notice` describing it; a failure
/// only ends the operation that caused it.
pub struct ApprovalController {
    api: Arc<dyn ApprovalApi>,
    session: SessionStore,
    events: broadcast::Sender<ClientEvent>,
    default_actor_role: String,
}

impl ApprovalController {
    pub fn new(api: Arc<dyn ApprovalApi>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            api,
            session: SessionStore::new(),
            events,
            default_actor_role: DEFAULT_ACTOR_ROLE.to_string(),
        }
    }

    pub fn with_default_actor_role(mut self, role: impl Into<String>) -> Self {
        let role = role.into();
        if !role.trim().is_empty() {
            self.default_actor_role = role.trim().to_string();
        }
        self
    }

    pub fn default_actor_role(&self) -> &str {
        &self.default_actor_role
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    fn notify(&self, notice: Notice) {
        self.emit(ClientEvent::Notice(notice));
    }

    fn report<T>(&self, action: &str, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            warn!(action, error = %err, "operation failed");
            self.notify(Notice::from_error(action, err));
        }
        result
    }

    async fn require_student(&self) -> Result<(User, String), ClientError> {
        self.session
            .student()
            .await
            .ok_or(ClientError::NotLoggedIn("student"))
    }

    async fn require_admin(&self) -> Result<String, ClientError> {
        self.session
            .admin_name()
            .await
            .ok_or(ClientError::NotLoggedIn("admin"))
    }

    pub async fn student_login(
        &self,
        name: &str,
        matric: &str,
    ) -> Result<LoginOutcome, ClientError> {
        let result = self.student_login_impl(name, matric).await;
        self.report("Login failed", result)
    }

    async fn student_login_impl(
        &self,
        name: &str,
        matric: &str,
    ) -> Result<LoginOutcome, ClientError> {
        let (name, matric) = match (name.trim(), matric.trim()) {
            (name, matric) if !name.is_empty() && !matric.is_empty() => {
                (name.to_string(), matric.to_string())
            }
            _ => return Err(ValidationError::MissingField("name and matric").into()),
        };

        let wanted = name.to_lowercase();
        let users = self.api.list_users().await?;
        let existing = users
            .into_iter()
            .find(|user| user.name.to_lowercase() == wanted);

        let (user, created) = match existing {
            Some(user) => (user, false),
            None => {
                let user = self.api.create_user(&name, Role::Student).await?;
                info!(user_id = user.id.0, "created student account");
                self.notify(Notice::success("Student account created"));
                (user, true)
            }
        };

        let identity = Identity::Student {
            user: user.clone(),
            matric,
        };
        self.api.set_session_token(None).await;
        self.session.login(identity.clone()).await;
        self.emit(ClientEvent::SessionChanged(Some(identity)));
        info!(user_id = user.id.0, created, "student signed in");
        Ok(LoginOutcome { user, created })
    }

    /// Opens an admin session. Access control is the server's job: `token`
    /// is forwarded on every request and never checked here.
    pub async fn admin_login(&self, name: &str, token: Option<String>) -> Result<(), ClientError> {
        let result = self.admin_login_impl(name, token).await;
        self.report("Admin login failed", result)
    }

    async fn admin_login_impl(&self, name: &str, token: Option<String>) -> Result<(), ClientError> {
        let name = require(name, "admin name")?;
        let token = token.filter(|token| !token.trim().is_empty());
        self.api.set_session_token(token.clone()).await;
        let identity = Identity::Admin { name, token };
        self.session.login(identity.clone()).await;
        self.emit(ClientEvent::SessionChanged(Some(identity)));
        info!("admin signed in");
        Ok(())
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.api.set_session_token(None).await;
        self.emit(ClientEvent::SessionChanged(None));
    }

    pub async fn send_request(&self, reason: &str) -> Result<SentLetter, ClientError> {
        let result = self.send_request_impl(reason).await;
        self.report("Failed to send request", result)
    }

    async fn send_request_impl(&self, reason: &str) -> Result<SentLetter, ClientError> {
        let (user, _) = self.require_student().await?;
        let body = validate_reason(reason)?;
        let sent = self
            .api
            .send_letter(SendLetterRequest {
                sender_id: user.id,
                title: REQUEST_TITLE.to_string(),
                body,
            })
            .await?;
        info!(letter_id = sent.id.0, sender_id = user.id.0, "exit request sent");
        self.notify(Notice::success("Request sent"));
        Ok(sent)
    }

    pub async fn student_status(&self) -> Result<StudentStatus, ClientError> {
        let result = self.student_status_impl().await;
        self.report("Failed to load status", result)
    }

    async fn student_status_impl(&self) -> Result<StudentStatus, ClientError> {
        let (user, _) = self.require_student().await?;
        let letters = self.api.list_letters().await?;
        Ok(current_status(&letters, user.id))
    }

    /// Puts the student's latest letter back into review with a new reason.
    /// Only a rejected letter can be resent.
    pub async fn resend_request(&self, reason: &str) -> Result<LetterId, ClientError> {
        let result = self.resend_request_impl(reason).await;
        self.report("Failed to resend request", result)
    }

    async fn resend_request_impl(&self, reason: &str) -> Result<LetterId, ClientError> {
        let (user, _) = self.require_student().await?;
        let body = validate_reason(reason)?;
        let letters = self.api.list_letters().await?;
        let letter = match current_status(&letters, user.id) {
            StudentStatus::Current(letter) if letter.status == LetterStatus::Rejected => letter,
            StudentStatus::Current(letter) => {
                return Err(ValidationError::NotResendable(letter.status.to_string()).into())
            }
            StudentStatus::NoRequest => {
                return Err(ValidationError::NotResendable("missing".to_string()).into())
            }
        };

        let title = if letter.title.trim().is_empty() {
            REQUEST_TITLE.to_string()
        } else {
            letter.title.clone()
        };
        self.api
            .resend_letter(ResendLetterRequest {
                letter_id: letter.id,
                sender_id: user.id,
                title,
                body,
            })
            .await?;
        info!(letter_id = letter.id.0, "exit request resent");
        self.notify(Notice::success("Request resent"));
        Ok(letter.id)
    }

    pub async fn admin_overview(&self) -> Result<AdminOverview, ClientError> {
        let result = self.admin_overview_impl().await;
        self.report("Failed to load overview", result)
    }

    async fn admin_overview_impl(&self) -> Result<AdminOverview, ClientError> {
        self.require_admin().await?;
        let letters = self.api.list_letters().await?;
        Ok(AdminOverview {
            pending_count: pending_count(&letters),
            recent: letters.into_iter().take(OVERVIEW_RECENT_LIMIT).collect(),
        })
    }

    /// Picks the letter the admin acts on next and remembers it in the
    /// session; clears the selection when nothing is pending.
    pub async fn load_pending_request(&self) -> Result<Option<Letter>, ClientError> {
        let result = self.load_pending_request_impl().await;
        self.report("Failed to load pending request", result)
    }

    async fn load_pending_request_impl(&self) -> Result<Option<Letter>, ClientError> {
        self.require_admin().await?;
        let letters = self.api.list_letters().await?;
        let pending = actionable_pending(&letters).cloned();
        let selected = pending.as_ref().map(|letter| letter.id);
        self.session.select_pending(selected).await;
        self.emit(ClientEvent::PendingSelected(selected));
        Ok(pending)
    }

    /// Submits an admin action on the selected pending letter. A blank
    /// `actor_role` falls back to the configured default.
    pub async fn admin_act(
        &self,
        intent: ActionKind,
        actor_role: Option<&str>,
        comments: Option<&str>,
        recommendations: Option<&str>,
    ) -> Result<ActionOutcome, ClientError> {
        let result = self
            .admin_act_impl(intent, actor_role, comments, recommendations)
            .await;
        self.report("Action failed", result)
    }

    async fn admin_act_impl(
        &self,
        intent: ActionKind,
        actor_role: Option<&str>,
        comments: Option<&str>,
        recommendations: Option<&str>,
    ) -> Result<ActionOutcome, ClientError> {
        let actor_name = self.require_admin().await?;
        let letter_id = self
            .session
            .selected_pending()
            .await
            .ok_or(ClientError::NoPendingSelected)?;
        let plan = plan_action(intent, comments, recommendations)?;
        let actor_role = resolve_actor_role(actor_role, &self.default_actor_role);

        if plan.overridden() {
            self.notify(Notice::info(format!(
                "Comments attached to {intent}; sending as comment only"
            )));
        }

        let receipt = self
            .api
            .submit_action(ActRequest {
                letter_id,
                actor_name,
                actor_role: actor_role.clone(),
                action: plan.action,
                comments: plan.comments.clone(),
                recommendations: plan.recommendations.clone(),
            })
            .await?;
        info!(
            letter_id = letter_id.0,
            action = %plan.action,
            overridden = plan.overridden(),
            "admin action submitted"
        );
        self.notify(Notice::success("Action submitted"));

        let next_pending = self.load_pending_request().await.ok().flatten();
        Ok(ActionOutcome {
            plan,
            actor_role,
            receipt,
            next_pending,
        })
    }

    /// Adds advisory text without changing the letter's status.
    pub async fn add_comment(
        &self,
        actor_role: Option<&str>,
        comment: Option<&str>,
        recommendation: Option<&str>,
    ) -> Result<ActionOutcome, ClientError> {
        self.admin_act(ActionKind::Comment, actor_role, comment, recommendation)
            .await
    }

    pub async fn letter_detail(&self, letter_id: LetterId) -> Result<LetterDetail, ClientError> {
        let result = self.api.get_letter(letter_id).await;
        self.report("Failed to load letter", result)
    }

    pub async fn role_queue(&self, role: &str) -> Result<Vec<PendingStep>, ClientError> {
        let result = self.role_queue_impl(role).await;
        self.report("Failed to load queue", result)
    }

    async fn role_queue_impl(&self, role: &str) -> Result<Vec<PendingStep>, ClientError> {
        self.require_admin().await?;
        let role = require(role, "role")?;
        self.api.list_pending_for_role(&role).await
    }

    pub async fn list_students(&self) -> Result<Vec<User>, ClientError> {
        let result = self.list_students_impl().await;
        self.report("Failed to load students", result)
    }

    async fn list_students_impl(&self) -> Result<Vec<User>, ClientError> {
        self.require_admin().await?;
        let users = self.api.list_users().await?;
        Ok(users
            .into_iter()
            .filter(|user| user.role.is_student())
            .collect())
    }

    pub async fn add_student(&self, name: &str) -> Result<User, ClientError> {
        let result = self.add_student_impl(name).await;
        self.report("Add failed", result)
    }

    async fn add_student_impl(&self, name: &str) -> Result<User, ClientError> {
        self.require_admin().await?;
        let name = require(name, "student name")?;
        let user = self.api.create_user(&name, Role::Student).await?;
        info!(user_id = user.id.0, "student added");
        self.notify(Notice::success("Student added"));
        Ok(user)
    }

    pub async fn reset_password(&self, user_id: UserId) -> Result<PasswordReset, ClientError> {
        let result = self.reset_password_impl(user_id).await;
        self.report("Reset failed", result)
    }

    async fn reset_password_impl(&self, user_id: UserId) -> Result<PasswordReset, ClientError> {
        self.require_admin().await?;
        let reset = self.api.reset_password(user_id).await?;
        self.notify(Notice::success(format!(
            "Password reset to: {}",
            reset.default_password
        )));
        Ok(reset)
    }

    pub async fn delete_student(&self, user_id: UserId) -> Result<(), ClientError> {
        let result = self.delete_student_impl(user_id).await;
        self.report("Delete failed", result)
    }

    async fn delete_student_impl(&self, user_id: UserId) -> Result<(), ClientError> {
        self.require_admin().await?;
        self.api.delete_user(user_id).await?;
        info!(user_id = user_id.0, "student deleted");
        self.notify(Notice::success("Student deleted"));
        Ok(())
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        let result = self.api.list_notifications().await;
        self.report("Failed to load notifications", result)
    }
}
