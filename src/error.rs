use thiserror::Error;

use crate::services::integrations::ProviderId;

/// Errors surfaced by the integration store and the dashboard loaders.
///
/// Probes never use this type: every probe failure is folded into a
/// [`ProbeResult`](crate::models::ProbeResult).
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Falha ao salvar: {status}")]
    SaveRejected { status: u16 },

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid payload: {0}")]
    Payload(String),

    #[error("invalid update for {provider}: {source}")]
    InvalidPatch {
        provider: ProviderId,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntegrationError {
    /// HTTP status carried by protocol failures, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            IntegrationError::SaveRejected { status } | IntegrationError::Status { status } => {
                Some(*status)
            }
            IntegrationError::Transport(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_rejection_names_status_code() {
        let err = IntegrationError::SaveRejected { status: 503 };
        assert_eq!(err.to_string(), "Falha ao salvar: 503");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn invalid_patch_names_provider() {
        let source = serde_json::from_str::<bool>("\"yes\"").unwrap_err();
        let err = IntegrationError::InvalidPatch {
            provider: ProviderId::Fintz,
            source,
        };
        assert!(err.to_string().starts_with("invalid update for fintz"));
        assert_eq!(err.status(), None);
    }
}
