//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    /// Day name not in the fixed seven-day enumeration. Checked before any
    /// schedule lookup, so an unknown day never reaches the table.
    #[error("unknown day: {0}")]
    InvalidDay(String),

    /// Credential client or access-token acquisition failed.
    #[error("auth error: {0}")]
    Auth(String),

    /// One or more push deliveries failed. Carries the first failure; there
    /// is no partial-success reporting.
    #[error("notification delivery failed: {0}")]
    Delivery(String),

    #[error("webhook error: {0}")]
    Webhook(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn invalid_day_carries_name() {
        let e = AppError::InvalidDay("Mittwoch".into());
        assert!(e.to_string().contains("unknown day"));
        assert!(e.to_string().contains("Mittwoch"));
    }

    #[test]
    fn auth_error_display() {
        let e = AppError::Auth("token endpoint rejected".into());
        assert!(e.to_string().contains("auth error"));
    }

    #[test]
    fn delivery_error_display() {
        let e = AppError::Delivery("503 from push API".into());
        assert!(e.to_string().contains("delivery failed"));
        assert!(e.to_string().contains("503"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: AppError = io_err.into();
        assert!(e.to_string().contains("io error"));
        // satisfies std::error::Error trait
        let _: &dyn Error = &e;
    }
}
