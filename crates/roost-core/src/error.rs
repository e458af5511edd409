// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the Roost gateway.
//!
//! Every provider, storage, and platform failure is folded into
//! [`GatewayError`]. The router recovers all of them locally and converts
//! them into at most one short user-visible notice via [`user_notice`].
//!
//! [`user_notice`]: GatewayError::user_notice

use thiserror::Error;

/// The primary error type used across the Roost workspace.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or invalid provider API key (401/403).
    #[error("provider authentication failed")]
    AuthFailure,

    /// Provider quota or rate limit hit (402/429/resource-exhausted).
    #[error("provider quota exceeded")]
    QuotaExceeded,

    /// Provider rejected the request (400, unknown model, invalid content).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Provider 5xx, connection error, or request timeout.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Prompt or reply blocked by a safety/recitation/content filter.
    #[error("filtered by provider: {0}")]
    Filtered(String),

    /// The platform refused an action the bot needs.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A platform object vanished mid-operation. Cleaned up silently.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unknown model prefix, missing config key, corrupt row.
    #[error("configuration error: {0}")]
    InternalConfig(String),

    /// Persistence failures (connection, query, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Platform transport or API failures not otherwise classified.
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Anything else worth retrying by simply resending the message.
    #[error("transient error: {0}")]
    Transient(String),
}

impl GatewayError {
    /// The short user-visible notice for this failure, or `None` when the
    /// failure is handled silently (vanished platform objects, storage
    /// hiccups that in-memory state papers over).
    pub fn user_notice(&self) -> Option<&'static str> {
        match self {
            GatewayError::AuthFailure => Some("There is a problem with the API key."),
            GatewayError::QuotaExceeded => {
                Some("The rate limit has been reached. Please try again later.")
            }
            GatewayError::BadRequest(_) => Some("The provider rejected the request as invalid."),
            GatewayError::ProviderUnavailable(_) => {
                Some("The model provider is temporarily unavailable. Please try again.")
            }
            GatewayError::Filtered(_) => {
                Some("The message or reply was blocked by safety filters.")
            }
            GatewayError::PermissionDenied(_) => {
                Some("I lack the required permission to do that.")
            }
            GatewayError::InternalConfig(_) => Some("There is a configuration problem."),
            GatewayError::Transient(_) => {
                Some("Something went wrong. Please try sending that again.")
            }
            GatewayError::NotFound(_) | GatewayError::Storage { .. } => None,
            GatewayError::Platform { .. } => {
                Some("Something went wrong. Please try sending that again.")
            }
        }
    }

    /// Maps an HTTP status from a provider endpoint into the taxonomy.
    pub fn from_provider_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => GatewayError::AuthFailure,
            402 | 429 => GatewayError::QuotaExceeded,
            400 => GatewayError::BadRequest(body.to_string()),
            s if s >= 500 => GatewayError::ProviderUnavailable(format!("HTTP {s}")),
            s => GatewayError::Transient(format!("HTTP {s}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_mapping() {
        assert!(matches!(
            GatewayError::from_provider_status(401, ""),
            GatewayError::AuthFailure
        ));
        assert!(matches!(
            GatewayError::from_provider_status(403, ""),
            GatewayError::AuthFailure
        ));
        assert!(matches!(
            GatewayError::from_provider_status(429, ""),
            GatewayError::QuotaExceeded
        ));
        assert!(matches!(
            GatewayError::from_provider_status(402, ""),
            GatewayError::QuotaExceeded
        ));
        assert!(matches!(
            GatewayError::from_provider_status(400, "bad model"),
            GatewayError::BadRequest(_)
        ));
        assert!(matches!(
            GatewayError::from_provider_status(503, ""),
            GatewayError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            GatewayError::from_provider_status(418, ""),
            GatewayError::Transient(_)
        ));
    }

    #[test]
    fn silent_errors_have_no_notice() {
        assert!(GatewayError::NotFound("msg".into()).user_notice().is_none());
        assert!(
            GatewayError::Storage {
                source: Box::new(std::io::Error::other("disk"))
            }
            .user_notice()
            .is_none()
        );
    }

    #[test]
    fn filtered_has_blocked_notice() {
        let notice = GatewayError::Filtered("SAFETY".into()).user_notice().unwrap();
        assert!(notice.contains("safety filters"));
    }
}
