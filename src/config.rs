//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `GYMBOT_BIND` and `GYMBOT_LOG_LEVEL` env overrides.
//! OAuth credentials come only from the environment, never from TOML.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

/// Push-notification delivery configuration (`[push]` in the TOML).
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Push API endpoint the fan-out POSTs to.
    pub endpoint: String,
    /// OAuth2 token endpoint used by the credential provider.
    pub token_url: String,
    /// Sandbox flag attached to every outbound notification.
    pub sandbox: bool,
    /// Display title of every outbound notification.
    pub title: String,
    /// Intent re-triggered on the receiving end when a notification fires.
    pub notification_intent: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    /// Socket address the webhook listener binds to.
    pub bind: String,
    pub log_level: String,
    pub push: PushConfig,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    service: RawService,
    #[serde(default)]
    push: RawPush,
}

#[derive(Deserialize)]
struct RawService {
    bot_name: String,
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize)]
struct RawPush {
    #[serde(default = "default_push_endpoint")]
    endpoint: String,
    #[serde(default = "default_token_url")]
    token_url: String,
    #[serde(default = "default_true")]
    sandbox: bool,
    #[serde(default = "default_push_title")]
    title: String,
    #[serde(default = "default_notification_intent")]
    notification_intent: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawPush {
    fn default() -> Self {
        Self {
            endpoint: default_push_endpoint(),
            token_url: default_token_url(),
            sandbox: true,
            title: default_push_title(),
            notification_intent: default_notification_intent(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_push_endpoint() -> String {
    "https://actions.googleapis.com/v2/conversations:send".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_push_title() -> String {
    "Test Notification from Action Gym".to_string()
}

fn default_notification_intent() -> String {
    "notification_trigger".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let bind_override = env::var("GYMBOT_BIND").ok();
    let log_level_override = env::var("GYMBOT_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        bind_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    bind_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let s = parsed.service;
    let p = parsed.push;

    Ok(Config {
        bot_name: s.bot_name,
        bind: bind_override.unwrap_or(&s.bind).to_string(),
        log_level: log_level_override.unwrap_or(&s.log_level).to_string(),
        push: PushConfig {
            endpoint: p.endpoint,
            token_url: p.token_url,
            sandbox: p.sandbox,
            title: p.title,
            notification_intent: p.notification_intent,
            timeout_seconds: p.timeout_seconds,
        },
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — localhost endpoints, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            bot_name: "test".into(),
            bind: default_bind(),
            log_level: "info".into(),
            push: PushConfig {
                endpoint: "http://localhost:0/v2/conversations:send".into(),
                token_url: "http://localhost:0/token".into(),
                sandbox: true,
                title: default_push_title(),
                notification_intent: default_notification_intent(),
                timeout_seconds: 1,
            },
        }
    }
}
