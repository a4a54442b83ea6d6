use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("remote request failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("meal plan could not be saved: {0}")]
    Persistence(RemoteError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("local storage: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl Error {
    /// Remote failure behind this error, if any.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Error::Remote(err) | Error::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteErrorKind {
    Network,
    Timeout,
    Server { status: u16 },
    Decode,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorKind::Network => f.write_str("network error"),
            RemoteErrorKind::Timeout => f.write_str("request timed out"),
            RemoteErrorKind::Server { status } => write!(f, "server error {status}"),
            RemoteErrorKind::Decode => f.write_str("invalid response"),
        }
    }
}

/// Failure reported by, or while talking to, the remote API.
///
/// `detail` carries the structured payload the server sent back, when there
/// was one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
    pub detail: Option<serde_json::Value>,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Timeout, message)
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Server { status }, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Decode, message)
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            RemoteErrorKind::Server { status } => Some(status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("quota exceeded: {needed} bytes requested, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt entry `{key}`: {reason}")]
    Corrupt { key: String, reason: String },
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Invalid(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Invalid(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Invalid(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::server(503, "maintenance");
        assert_eq!(err.to_string(), "server error 503: maintenance");
        assert_eq!(err.status(), Some(503));
        assert_eq!(RemoteError::network("refused").status(), None);
    }

    #[test]
    fn test_persistence_error_keeps_detail() {
        let detail = serde_json::json!({"detail": "quota"});
        let err = Error::Persistence(RemoteError::server(500, "rejected").with_detail(detail.clone()));

        assert_eq!(err.remote().and_then(|e| e.detail.clone()), Some(detail));
        assert!(err.to_string().starts_with("meal plan could not be saved"));
    }

    #[test]
    fn test_bail() {
        fn check(value: u8) -> Result<()> {
            if value > 6 {
                bail!("day offset {value} out of range");
            }
            Ok(())
        }

        assert!(check(3).is_ok());
        assert!(matches!(check(7), Err(Error::Invalid(msg)) if msg == "day offset 7 out of range"));
    }
}
