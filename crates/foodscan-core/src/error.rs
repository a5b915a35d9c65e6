//! # Error Types
//!
//! Domain-specific error types for foodscan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  foodscan-core errors (this file)                                       │
//! │  ├── CoreError        - Response decoding failures                      │
//! │  └── ValidationError  - Barcode / configuration input failures          │
//! │                                                                         │
//! │  foodscan-capture errors                                                │
//! │  ├── BackendError     - A capture capability step failed                │
//! │  └── SessionError     - Session API used in the wrong state             │
//! │                                                                         │
//! │  foodscan-lookup errors                                                 │
//! │  └── FetchError       - Transport failures                              │
//! │                                                                         │
//! │  None of these escape to the presentation layer: they are folded into   │
//! │  ScanResult::DeviceFailure or one of the LookupOutcome variants.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while turning upstream bytes into domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Body is not JSON, or does not match the response schema.
    ///
    /// ## When This Occurs
    /// - Body is HTML or plain text (captive portals, error pages)
    /// - Required `status` field is missing
    /// - A field has a type the schema does not allow
    #[error("Malformed lookup response: {0}")]
    MalformedResponse(String),

    /// Upstream said "found" but sent no product to go with it.
    #[error("Lookup response has status {status} but no product")]
    MissingProduct { status: i64 },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::MalformedResponse(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g. characters that break URL construction).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "contains '/'".to_string(),
        };
        assert_eq!(err.to_string(), "barcode has invalid format: contains '/'");
    }

    #[test]
    fn test_json_error_converts_to_malformed_response() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_product_message() {
        let err = CoreError::MissingProduct { status: 1 };
        assert_eq!(err.to_string(), "Lookup response has status 1 but no product");
    }
}
