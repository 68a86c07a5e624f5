//! Flat success/error envelope.
//!
//! Library code returns [`crate::Result`]. `Outcome` is the flattened form
//! handed to callers that need a single serializable value, such as the
//! command-line JSON output.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Tagged outcome of an operation.
///
/// On success `value` holds the payload and `error_message` is empty. On
/// failure `value` is `T::default()` and `error_message` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub value: T,
    pub error_message: String,
    pub error_code: i32,
}

/// Outcome of a write: the number of bytes written.
pub type WriteOutcome = Outcome<usize>;

impl<T> Outcome<T> {
    /// Successful outcome carrying `value`.
    pub fn success(value: T) -> Self {
        Self {
            success: true,
            value,
            error_message: String::new(),
            error_code: 0,
        }
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Convert back into a `Result`, keeping the message on failure.
    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            Ok(self.value)
        } else {
            Err(self.error_message)
        }
    }
}

impl<T: Default> Outcome<T> {
    /// Failed outcome with a default payload.
    pub fn error(message: impl Into<String>, code: i32) -> Self {
        Self {
            success: false,
            value: T::default(),
            error_message: message.into(),
            error_code: code,
        }
    }
}

impl<T: Default> From<Result<T, DataError>> for Outcome<T> {
    fn from(result: Result<T, DataError>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => Self::error(err.to_string(), err.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let outcome = Outcome::success(42);
        assert!(outcome.success);
        assert_eq!(outcome.value, 42);
        assert!(outcome.error_message.is_empty());
        assert_eq!(outcome.error_code, 0);
    }

    #[test]
    fn test_error_envelope() {
        let outcome: Outcome<i32> = Outcome::error("Test error", 404);
        assert!(!outcome.success);
        assert_eq!(outcome.value, 0);
        assert_eq!(outcome.error_message, "Test error");
        assert_eq!(outcome.error_code, 404);
    }

    #[test]
    fn test_from_result() {
        let ok: WriteOutcome = Ok::<usize, DataError>(12).into();
        assert!(ok.is_success());
        assert_eq!(ok.value, 12);

        let err: WriteOutcome = Err(DataError::NotOpen { session: "Writer" }).into();
        assert!(!err.is_success());
        assert_eq!(err.value, 0);
        assert_eq!(err.error_message, "Writer not open");
        assert_eq!(err.error_code, 10);
        assert_eq!(err.into_result(), Err("Writer not open".to_string()));
    }
}
