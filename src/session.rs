//! Per-user session state and the notification opt-in recorder.
//!
//! Session state is owned by a [`SessionStore`] keyed on an opaque user
//! key. The in-memory implementation lives for the process only; the
//! platform is the durable owner of conversation state.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

/// One user's opt-in to push notifications.
///
/// `user_id` is the opaque push-target token handed over by the platform's
/// permission grant — not necessarily the conversing user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSubscription {
    pub user_id: String,
    /// Intent re-triggered on the receiving end when the notification fires.
    pub intent: String,
}

/// Session-scoped state for one user key. Subscriptions are append-only;
/// there is no unsubscribe flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub subscriptions: Vec<NotificationSubscription>,
}

/// Permission outcome reported by the platform's notification slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PermissionStatus {
    #[serde(rename = "PERMISSION_GRANTED")]
    Granted,
    /// Any other reported status — denied, dismissed, unspecified.
    #[serde(other)]
    NotGranted,
}

/// Keyed session-state storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// State for `user_key`; default (empty) state when none exists yet.
    async fn get(&self, user_key: &str) -> SessionState;
    async fn put(&self, user_key: &str, state: SessionState);
}

/// Process-lifetime store backed by a mutexed map.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_key: &str) -> SessionState {
        self.sessions
            .lock()
            .await
            .get(user_key)
            .cloned()
            .unwrap_or_default()
    }

    async fn put(&self, user_key: &str, state: SessionState) {
        self.sessions.lock().await.insert(user_key.to_string(), state);
    }
}

/// Append a subscription for `user_key` when the permission was granted.
/// Anything other than a grant is a no-op.
pub async fn record_subscription(
    store: &dyn SessionStore,
    user_key: &str,
    status: PermissionStatus,
    update_user_id: Option<&str>,
    intent: &str,
) {
    if status != PermissionStatus::Granted {
        debug!(%user_key, "notification permission not granted — nothing recorded");
        return;
    }
    let Some(update_user_id) = update_user_id else {
        debug!(%user_key, "permission granted but no update user id supplied");
        return;
    };

    let mut state = store.get(user_key).await;
    state.subscriptions.push(NotificationSubscription {
        user_id: update_user_id.to_string(),
        intent: intent.to_string(),
    });
    let count = state.subscriptions.len();
    store.put(user_key, state).await;
    debug!(%user_key, count, "notification subscription recorded");
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTENT: &str = "notification_trigger";

    #[tokio::test]
    async fn not_granted_records_nothing() {
        let store = InMemorySessionStore::new();

        record_subscription(&store, "u1", PermissionStatus::NotGranted, Some("tok"), INTENT)
            .await;
        assert!(store.get("u1").await.subscriptions.is_empty());

        // Still a no-op when prior subscriptions exist.
        record_subscription(&store, "u1", PermissionStatus::Granted, Some("a"), INTENT).await;
        record_subscription(&store, "u1", PermissionStatus::NotGranted, Some("b"), INTENT)
            .await;
        assert_eq!(store.get("u1").await.subscriptions.len(), 1);
    }

    #[tokio::test]
    async fn grants_append_in_call_order() {
        let store = InMemorySessionStore::new();

        record_subscription(&store, "u1", PermissionStatus::Granted, Some("target-a"), INTENT)
            .await;
        record_subscription(&store, "u1", PermissionStatus::Granted, Some("target-b"), INTENT)
            .await;

        let subs = store.get("u1").await.subscriptions;
        assert_eq!(
            subs,
            vec![
                NotificationSubscription { user_id: "target-a".into(), intent: INTENT.into() },
                NotificationSubscription { user_id: "target-b".into(), intent: INTENT.into() },
            ]
        );
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = InMemorySessionStore::new();

        record_subscription(&store, "u1", PermissionStatus::Granted, Some("t1"), INTENT).await;
        record_subscription(&store, "u2", PermissionStatus::Granted, Some("t2"), INTENT).await;

        assert_eq!(store.get("u1").await.subscriptions.len(), 1);
        assert_eq!(store.get("u2").await.subscriptions.len(), 1);
        assert_eq!(store.get("u1").await.subscriptions[0].user_id, "t1");
    }

    #[test]
    fn permission_status_parses_wire_values() {
        let granted: PermissionStatus =
            serde_json::from_str("\"PERMISSION_GRANTED\"").unwrap();
        assert_eq!(granted, PermissionStatus::Granted);

        let denied: PermissionStatus = serde_json::from_str("\"PERMISSION_DENIED\"").unwrap();
        assert_eq!(denied, PermissionStatus::NotGranted);
    }
}
