/// Error kinds surfaced by the dashboard engine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Transport or reachability failure, including non-2xx responses.
    NetworkError(String),
    /// The upstream answered with a payload of unexpected shape.
    DecodeError(String),
    /// Preference read/write failure. Always recovered locally.
    StorageError(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NetworkError(_) => "network",
            AppError::DecodeError(_) => "decode",
            AppError::StorageError(_) => "storage",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            AppError::DecodeError(msg) => write!(f, "Decode Error: {}", msg),
            AppError::StorageError(msg) => write!(f, "Storage Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::DecodeError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_kind() {
        let err = AppError::NetworkError("HTTP error: 503".to_string());
        assert_eq!(err.to_string(), "Network Error: HTTP error: 503");
        assert_eq!(err.kind(), "network");
    }

    #[test]
    fn serde_failures_become_decode_errors() {
        let err: AppError = serde_json::from_str::<Vec<u32>>("{").unwrap_err().into();
        assert_eq!(err.kind(), "decode");
    }
}
