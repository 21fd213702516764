//! Push-notification delivery: credential provider and fan-out sender.
//!
//! The credential client is process-wide and lazily initialised exactly
//! once; every fan-out fetches a fresh bearer token through it. Deliveries
//! are issued concurrently and jointly awaited — all-or-nothing, no retry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::PushConfig;
use crate::error::AppError;
use crate::session::NotificationSubscription;

// ── Wire shapes ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushEnvelope<'a> {
    custom_push_message: CustomPushMessage<'a>,
    is_in_sandbox: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomPushMessage<'a> {
    user_notification: UserNotification<'a>,
    target: Target<'a>,
}

#[derive(Debug, Serialize)]
struct UserNotification<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Target<'a> {
    user_id: &'a str,
    intent: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

// ── Credential provider ───────────────────────────────────────────────────────

/// Source of bearer tokens for the push API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AppError>;
}

struct TokenClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: Option<String>,
    refresh_token: String,
}

/// OAuth2 refresh-token credential provider.
///
/// Credentials come from `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`
/// (optional) and `GOOGLE_REFRESH_TOKEN` — environment only, never TOML.
/// The underlying client handle is built on first use and reused; a fresh
/// access token is requested per call.
pub struct GoogleTokenProvider {
    token_url: String,
    timeout: Duration,
    client: OnceCell<TokenClient>,
}

impl GoogleTokenProvider {
    pub fn new(config: &PushConfig) -> Self {
        Self {
            token_url: config.token_url.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&TokenClient, AppError> {
        self.client
            .get_or_try_init(|| async {
                let client_id = std::env::var("GOOGLE_CLIENT_ID")
                    .map_err(|_| AppError::Auth("missing GOOGLE_CLIENT_ID".into()))?;
                let refresh_token = std::env::var("GOOGLE_REFRESH_TOKEN")
                    .map_err(|_| AppError::Auth("missing GOOGLE_REFRESH_TOKEN".into()))?;
                let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok();

                let http = reqwest::Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| AppError::Auth(format!("failed building HTTP client: {e}")))?;

                debug!("credential client initialised");
                Ok(TokenClient { http, client_id, client_secret, refresh_token })
            })
            .await
    }
}

#[async_trait]
impl TokenProvider for GoogleTokenProvider {
    async fn access_token(&self) -> Result<String, AppError> {
        let client = self.client().await?;

        let mut form: Vec<(&str, &str)> = vec![
            ("client_id", client.client_id.as_str()),
            ("refresh_token", client.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = client.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let res = client
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("token request failed: {e}")))?;

        if !res.status().is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AppError::Auth(format!("token endpoint rejected: {body}")));
        }

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("token parse failed: {e}")))?;

        Ok(token.access_token)
    }
}

// ── Fan-out sender ────────────────────────────────────────────────────────────

/// Sends one push notification per subscription through the push API.
pub struct Notifier {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    endpoint: String,
    title: String,
    sandbox: bool,
}

impl Notifier {
    pub fn new(config: &PushConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("failed building HTTP client: {e}")))?;

        Ok(Self {
            http,
            tokens,
            endpoint: config.endpoint.clone(),
            title: config.title.clone(),
            sandbox: config.sandbox,
        })
    }

    /// Deliver one notification per subscription, all in flight at once,
    /// jointly awaited. An empty list is a vacuous success — no network
    /// calls are made, token fetch included. The first failed delivery
    /// fails the whole operation.
    pub async fn notify_all(
        &self,
        subscriptions: &[NotificationSubscription],
    ) -> Result<usize, AppError> {
        if subscriptions.is_empty() {
            debug!("no subscriptions — nothing to deliver");
            return Ok(0);
        }

        let token = self.tokens.access_token().await?;

        let posts = subscriptions.iter().map(|sub| self.send_one(&token, sub));
        futures::future::try_join_all(posts).await?;

        Ok(subscriptions.len())
    }

    async fn send_one(
        &self,
        token: &str,
        sub: &NotificationSubscription,
    ) -> Result<(), AppError> {
        let envelope = PushEnvelope {
            custom_push_message: CustomPushMessage {
                user_notification: UserNotification { title: &self.title },
                target: Target { user_id: &sub.user_id, intent: &sub.intent },
            },
            is_in_sandbox: self.sandbox,
        };

        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| AppError::Delivery(format!("push request failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AppError::Delivery(format!("push API returned {status}: {body}")));
        }

        debug!(target_user = %sub.user_id, "push notification accepted");
        Ok(())
    }
}
