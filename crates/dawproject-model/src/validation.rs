//! Accumulating validation diagnostics.

use serde::{Deserialize, Serialize};

/// Errors and warnings collected while checking a file or record.
///
/// Errors make the result invalid; warnings never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// What was validated (usually a path or record label).
    pub context: String,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new("")
    }
}

impl ValidationResult {
    /// Create an empty, valid result for `context`.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            context: context.into(),
        }
    }

    /// Record an error and mark the result invalid.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    /// Record a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Absorb another result. Validity becomes the AND of both.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.is_valid = self.is_valid && other.is_valid;
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
