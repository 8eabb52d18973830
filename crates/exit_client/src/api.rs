use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{LetterId, Role, UserId},
    protocol::{
        ActRequest, CreateUserRequest, Letter, LetterDetail, Notification, PasswordReset,
        PendingStep, ResendLetterRequest, SendLetterRequest, SentLetter, User,
    },
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ClientError;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// What `POST /act` answered with. The backend normally returns the updated
/// letter; anything else is kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionReceipt {
    Letter(Box<LetterDetail>),
    Ack(String),
}

impl ActionReceipt {
    pub fn letter(&self) -> Option<&LetterDetail> {
        match self {
            ActionReceipt::Letter(detail) => Some(detail),
            ActionReceipt::Ack(_) => None,
        }
    }
}

#[async_trait]
pub trait ApprovalApi: Send + Sync {
    async fn set_session_token(&self, token: Option<String>);
    async fn list_users(&self) -> Result<Vec<User>, ClientError>;
    async fn create_user(&self, name: &str, role: Role) -> Result<User, ClientError>;
    async fn list_letters(&self) -> Result<Vec<Letter>, ClientError>;
    async fn send_letter(&self, request: SendLetterRequest) -> Result<SentLetter, ClientError>;
    async fn submit_action(&self, request: ActRequest) -> Result<ActionReceipt, ClientError>;
    async fn get_letter(&self, letter_id: LetterId) -> Result<LetterDetail, ClientError>;
    async fn list_pending_for_role(&self, role: &str) -> Result<Vec<PendingStep>, ClientError>;
    async fn resend_letter(&self, request: ResendLetterRequest) -> Result<(), ClientError>;
    async fn reset_password(&self, user_id: UserId) -> Result<PasswordReset, ClientError>;
    async fn delete_user(&self, user_id: UserId) -> Result<(), ClientError>;
    async fn list_notifications(&self) -> Result<Vec<Notification>, ClientError>;
}

/// `ApprovalApi` over the backend's JSON endpoints. One round-trip per call,
/// no retries.
pub struct HttpApprovalApi {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpApprovalApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends and returns the body text; non-2xx becomes `ClientError::Server`
    /// carrying the raw text.
    async fn execute(&self, builder: RequestBuilder) -> Result<String, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "api request failed");
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        debug!(%url, status = status.as_u16(), bytes = body.len(), "api request ok");
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let body = self.execute(builder).await?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Parse(e.to_string()))
}

#[async_trait]
impl ApprovalApi for HttpApprovalApi {
    async fn set_session_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let request = self.request(Method::GET, "/users").await;
        self.fetch(request).await
    }

    async fn create_user(&self, name: &str, role: Role) -> Result<User, ClientError> {
        let request = self.request(Method::POST, "/users").await.json(&CreateUserRequest {
            name: name.to_string(),
            role,
        });
        self.fetch(request).await
    }

    async fn list_letters(&self) -> Result<Vec<Letter>, ClientError> {
        let request = self.request(Method::GET, "/letters").await;
        self.fetch(request).await
    }

    async fn send_letter(&self, payload: SendLetterRequest) -> Result<SentLetter, ClientError> {
        let request = self.request(Method::POST, "/send").await.json(&payload);
        self.fetch(request).await
    }

    async fn submit_action(&self, payload: ActRequest) -> Result<ActionReceipt, ClientError> {
        let request = self.request(Method::POST, "/act").await.json(&payload);
        let body = self.execute(request).await?;
        match serde_json::from_str::<LetterDetail>(&body) {
            Ok(detail) => Ok(ActionReceipt::Letter(Box::new(detail))),
            Err(err) => {
                debug!(error = %err, "act response is not a letter, keeping raw text");
                Ok(ActionReceipt::Ack(body))
            }
        }
    }

    async fn get_letter(&self, letter_id: LetterId) -> Result<LetterDetail, ClientError> {
        let request = self
            .request(Method::GET, &format!("/letter/{}", letter_id.0))
            .await;
        self.fetch(request).await
    }

    async fn list_pending_for_role(&self, role: &str) -> Result<Vec<PendingStep>, ClientError> {
        let request = self
            .request(Method::GET, "/pending")
            .await
            .query(&[("role", role)]);
        self.fetch(request).await
    }

    async fn resend_letter(&self, payload: ResendLetterRequest) -> Result<(), ClientError> {
        let request = self.request(Method::POST, "/resend").await.json(&payload);
        self.execute(request).await.map(|_| ())
    }

    async fn reset_password(&self, user_id: UserId) -> Result<PasswordReset, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/users/{}/password", user_id.0))
            .await;
        self.fetch(request).await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), ClientError> {
        let request = self
            .request(Method::DELETE, &format!("/users/{}", user_id.0))
            .await;
        self.execute(request).await.map(|_| ())
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, ClientError> {
        let request = self.request(Method::GET, "/notifications").await;
        self.fetch(request).await
    }
}
