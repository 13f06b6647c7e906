use thiserror::Error;

/// All errors generated in `wsb-dashboard`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DashboardError {
    #[error("column is not sortable: {0}")]
    UnsortableColumn(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("{0}")]
    Backend(String),

    #[error("invalid value for {var}: {value:?} ({reason})")]
    Config {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl DashboardError {
    /// Determine if the next poll has a chance of succeeding where this one failed.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_transient(&self) -> bool {
        match self {
            DashboardError::Http(_) => true,
            DashboardError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(value: reqwest::Error) -> Self {
        let url = value
            .url()
            .map(|url| url.to_string())
            .unwrap_or_default();

        if value.is_decode() {
            Self::Decode {
                url,
                reason: value.to_string(),
            }
        } else if let Some(status) = value.status() {
            Self::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            Self::Http(value.to_string())
        }
    }
}
