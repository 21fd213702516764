//! Wire shapes for the conversational platform's webhook exchange.
//!
//! Field names mirror the platform's JSON exactly (`firstSimple`,
//! `NotificationsSlot_<intent>`, `additionalUserData.updateUserId`), so the
//! serde renames here are the contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::PermissionStatus;

// ── Inbound ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub handler: Handler,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub user: User,
}

impl WebhookRequest {
    /// Session-store key: the conversing user's id, session id fallback.
    pub fn user_key(&self) -> &str {
        self.user.id.as_deref().unwrap_or(&self.session.id)
    }

    /// Resolved value of a named intent parameter, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.intent
            .params
            .get(name)
            .and_then(|p| p.resolved.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct Handler {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub params: HashMap<String, IntentParam>,
}

#[derive(Debug, Deserialize)]
pub struct IntentParam {
    #[serde(default)]
    pub resolved: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub id: String,
    /// Opaque session parameters; the notifications slot is extracted from
    /// here by key.
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
}

/// Permission-request outcome slot, stored by the platform under
/// `NotificationsSlot_<intentName>` in the session parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsSlot {
    pub permission_status: PermissionStatus,
    #[serde(default)]
    pub additional_user_data: Option<AdditionalUserData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalUserData {
    pub update_user_id: String,
}

// ── Outbound ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct WebhookResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Prompt>,
}

#[derive(Debug, Default, Serialize)]
pub struct Prompt {
    #[serde(rename = "firstSimple", skip_serializing_if = "Option::is_none")]
    pub first_simple: Option<FirstSimple>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub struct FirstSimple {
    pub speech: String,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub title: String,
}

impl WebhookResponse {
    /// Response carrying only spoken/displayed text.
    pub fn with_speech(speech: impl Into<String>) -> Self {
        Self {
            prompt: Some(Prompt {
                first_simple: Some(FirstSimple { speech: speech.into() }),
                suggestions: Vec::new(),
            }),
        }
    }

    /// Append suggestion chips, in order.
    pub fn with_suggestions<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prompt = self.prompt.get_or_insert_with(Prompt::default);
        prompt
            .suggestions
            .extend(titles.into_iter().map(|t| Suggestion { title: t.into() }));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parses_platform_shape() {
        let raw = serde_json::json!({
            "handler": { "name": "classes" },
            "intent": {
                "name": "classes",
                "params": { "day": { "resolved": "Monday" } }
            },
            "session": { "id": "sess-1", "params": {} },
            "user": { "id": "user-1" }
        });

        let req: WebhookRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(req.handler.name, "classes");
        assert_eq!(req.param("day"), Some("Monday"));
        assert_eq!(req.user_key(), "user-1");
    }

    #[test]
    fn user_key_falls_back_to_session_id() {
        let raw = serde_json::json!({
            "handler": { "name": "classes" },
            "session": { "id": "sess-9" }
        });

        let req: WebhookRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(req.user_key(), "sess-9");
    }

    #[test]
    fn notifications_slot_parses() {
        let raw = serde_json::json!({
            "permissionStatus": "PERMISSION_GRANTED",
            "additionalUserData": { "updateUserId": "push-target-1" }
        });

        let slot: NotificationsSlot = serde_json::from_value(raw).unwrap();
        assert_eq!(slot.permission_status, PermissionStatus::Granted);
        assert_eq!(
            slot.additional_user_data.unwrap().update_user_id,
            "push-target-1"
        );
    }

    #[test]
    fn response_serialises_prompt_shape() {
        let resp = WebhookResponse::with_speech("hello")
            .with_suggestions(["Send daily reminders", "Get notifications"]);

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "prompt": {
                    "firstSimple": { "speech": "hello" },
                    "suggestions": [
                        { "title": "Send daily reminders" },
                        { "title": "Get notifications" }
                    ]
                }
            })
        );
    }

    #[test]
    fn empty_response_serialises_to_empty_object() {
        let value = serde_json::to_value(WebhookResponse::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
