use shared::{domain::LetterId, protocol::User};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Student {
        user: User,
        matric: String,
    },
    /// `token` is an opaque server-issued credential; the client only
    /// forwards it.
    Admin {
        name: String,
        token: Option<String>,
    },
}

impl Identity {
    pub fn display_name(&self) -> &str {
        match self {
            Identity::Student { user, .. } => &user.name,
            Identity::Admin { name, .. } => name,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin { .. })
    }
}

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Identity>,
    selected_pending: Option<LetterId>,
}

/// Front-end session state: who is signed in and which pending letter the
/// admin view currently targets. Lives as long as one front-end session.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous identity and forgets the selected letter.
    pub async fn login(&self, identity: Identity) {
        let mut guard = self.inner.lock().await;
        guard.identity = Some(identity);
        guard.selected_pending = None;
    }

    pub async fn current(&self) -> Option<Identity> {
        self.inner.lock().await.identity.clone()
    }

    pub async fn logout(&self) {
        let mut guard = self.inner.lock().await;
        guard.identity = None;
        guard.selected_pending = None;
    }

    pub async fn select_pending(&self, letter_id: Option<LetterId>) {
        self.inner.lock().await.selected_pending = letter_id;
    }

    pub async fn selected_pending(&self) -> Option<LetterId> {
        self.inner.lock().await.selected_pending
    }

    pub(crate) async fn student(&self) -> Option<(User, String)> {
        match self.current().await {
            Some(Identity::Student { user, matric }) => Some((user, matric)),
            _ => None,
        }
    }

    pub(crate) async fn admin_name(&self) -> Option<String> {
        match self.current().await {
            Some(Identity::Admin { name, .. }) => Some(name),
            _ => None,
        }
    }
}
