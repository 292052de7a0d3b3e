use thiserror::Error;

use crate::remote::UserId;

/// Result type used by the binary and the event loop.
pub type Result<T> = anyhow::Result<T>;

/// Failure of any call against the remote user service.
///
/// Network failures, non-success statuses and undecodable bodies all end up
/// here; only the human-readable message is kept.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteCallFailure {
    pub message: String,
}

impl RemoteCallFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Failure for a response that came back with a non-success status.
    pub fn status(code: u16) -> Self {
        Self::new(format!("Request failed with status code {code}"))
    }
}

impl From<reqwest::Error> for RemoteCallFailure {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::status(status.as_u16()),
            None => Self::new(err.to_string()),
        }
    }
}

/// Rejections raised by the controller before any state is touched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("a request is already in flight")]
    Busy,
    #[error("no user is being edited")]
    NoEditDraft,
    #[error("the create form is not open")]
    NoCreateDraft,
    #[error("another draft is already open")]
    DraftOpen,
    #[error("user {0} is not in the current list")]
    UnknownUser(UserId),
    #[error(transparent)]
    Remote(#[from] RemoteCallFailure),
}
