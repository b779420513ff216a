use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid JSON structure. Expected {{ entries: [] }} ({0})")]
    InvalidFormat(String),
    #[error("No file connected")]
    NoChannelConnected,
    #[error("{0}")]
    ChannelFailure(String),
    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("failed to encode data: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidFormat(_) | Self::UnknownMetric(_) | Self::InvalidDate(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NoChannelConnected => StatusCode::CONFLICT,
            Self::ChannelFailure(_) => StatusCode::BAD_GATEWAY,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::ChannelFailure(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    pub fn no_entries() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "No entries yet.".to_string(),
        }
    }

    /// Status line for a failed user action, e.g. `Load failed: No file connected`.
    pub fn action(action: &str, err: TrackerError) -> Self {
        Self {
            status: err.status(),
            message: format!("{action} failed: {err}"),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_prefixes_status_line() {
        let err = AppError::action("Load", TrackerError::NoChannelConnected);
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, "Load failed: No file connected");
    }

    #[test]
    fn io_errors_become_channel_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TrackerError::from(io);
        assert!(matches!(err, TrackerError::ChannelFailure(ref reason) if reason == "denied"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
