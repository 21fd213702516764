//! Axum handlers for the fulfillment routes.
//!
//! One POST entry point dispatches on the resolved handler name; errors are
//! mapped to JSON error responses here rather than recovered locally.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, info, warn};

use super::AppState;
use super::types::{NotificationsSlot, WebhookRequest, WebhookResponse};
use crate::error::AppError;
use crate::schedule::{self, Day};
use crate::session;

// Suggestion chip titles
const SUGGESTION_HOURS: &str = "Ask about hours";
const SUGGESTION_DAILY: &str = "Send daily reminders";
const SUGGESTION_NOTIFICATIONS: &str = "Get notifications";

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

fn error_response(e: AppError) -> Response {
    let (status, code) = match &e {
        AppError::InvalidDay(_) => (StatusCode::BAD_REQUEST, "invalid_day"),
        AppError::Webhook(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        AppError::Auth(_) => (StatusCode::BAD_GATEWAY, "auth"),
        AppError::Delivery(_) => (StatusCode::BAD_GATEWAY, "delivery"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };
    warn!("webhook handler failed: {e}");
    (status, json_error(code, e)).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health
pub(super) async fn health(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "bot": &*state.bot_name })),
    )
        .into_response()
}

/// POST /fulfillment — single entry point, dispatched by handler name.
pub(super) async fn fulfillment(
    State(state): State<AppState>,
    Json(req): Json<WebhookRequest>,
) -> Response {
    debug!(handler = %req.handler.name, user_key = %req.user_key(), "webhook request");

    let result = match req.handler.name.as_str() {
        "classes" => classes(&req),
        "subscribe_to_notifications" => subscribe(&state, &req).await,
        "cancel_class" => cancel_class(&state, &req).await,
        other => {
            warn!(handler = %other, "no handler registered for name");
            return (
                StatusCode::NOT_FOUND,
                json_error("unknown_handler", format!("no handler named '{other}'")),
            )
                .into_response();
        }
    };

    match result {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => error_response(e),
    }
}

/// "classes" — answer the day's distinct offerings with follow-up chips.
fn classes(req: &WebhookRequest) -> Result<WebhookResponse, AppError> {
    let day = match req.param("day") {
        Some(name) => Day::from_name(name)?,
        None => Day::today(),
    };

    let offerings = schedule::distinct_offerings(day).join(", ");
    let speech = format!(
        "On {day} we offer the following classes: {offerings}. \
         Would you like to receive daily reminders of upcoming classes, \
         subscribe to notifications about cancelations, or can I help you \
         with anything else?"
    );

    Ok(WebhookResponse::with_speech(speech).with_suggestions([
        SUGGESTION_DAILY,
        SUGGESTION_NOTIFICATIONS,
        SUGGESTION_HOURS,
    ]))
}

/// "subscribe_to_notifications" — record an opt-in from the permission slot.
/// Emits no prompt text; conversation continuation is the platform's concern.
async fn subscribe(state: &AppState, req: &WebhookRequest) -> Result<WebhookResponse, AppError> {
    let slot_key = format!("NotificationsSlot_{}", state.notification_intent);

    let Some(raw) = req.session.params.get(&slot_key) else {
        warn!(%slot_key, "notifications slot missing from session params");
        return Ok(WebhookResponse::default());
    };

    let slot: NotificationsSlot = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::Webhook(format!("malformed notifications slot: {e}")))?;

    session::record_subscription(
        &*state.store,
        req.user_key(),
        slot.permission_status,
        slot.additional_user_data
            .as_ref()
            .map(|d| d.update_user_id.as_str()),
        &state.notification_intent,
    )
    .await;

    Ok(WebhookResponse::default())
}

/// "cancel_class" — push a notification to every recorded subscription.
async fn cancel_class(state: &AppState, req: &WebhookRequest) -> Result<WebhookResponse, AppError> {
    let session_state = state.store.get(req.user_key()).await;

    let sent = state.notifier.notify_all(&session_state.subscriptions).await?;
    info!(count = sent, "push notifications delivered");

    Ok(WebhookResponse::with_speech(
        "A notification has been sent to all subscribed users.",
    ))
}
