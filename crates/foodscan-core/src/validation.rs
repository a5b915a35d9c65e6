//! # Validation Module
//!
//! Checks a barcode before it is substituted into a request URL.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where a Code Can Go Wrong                          │
//! │                                                                         │
//! │  Layer 1: Decoder (camera / wedge scanner)                              │
//! │  └── Anything it reports is accepted, no checksum check                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Empty code                         → Required                      │
//! │  ├── / \ ? # %, whitespace, non-ASCII   → InvalidFormat                 │
//! │  └── "." / ".." (dot segments)          → InvalidFormat                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: URL parser (url crate)                                        │
//! │  └── Template + code must parse as an absolute URL                      │
//! │                                                                         │
//! │  Failing any layer ⇒ LookupOutcome::InvalidInput, no network call       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use foodscan_core::validation::validate_barcode;
//!
//! assert!(validate_barcode("5941132022421").is_ok());
//! assert!(validate_barcode("12/34").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates that a code can be embedded verbatim in a URL path segment.
///
/// ## Rules
/// - Must not be empty
/// - Printable ASCII only: no whitespace, control or non-ASCII characters
/// - None of `/ \ ? # %`, which would end or re-shape the path segment
/// - Must not be a dot segment (`.` or `..`)
///
/// Sub-delimiters such as `+ : @ = $` are legal inside a path segment and
/// pass through unchanged.
///
/// The code is not trimmed: leading or trailing whitespace is an error, not
/// something to silently repair.
pub fn validate_barcode(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if let Some(bad) = code.chars().find(|c| !is_segment_char(*c)) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: format!("character {:?} cannot appear in a request URL", bad),
        });
    }

    if code == "." || code == ".." {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "dot segments are not product codes".to_string(),
        });
    }

    Ok(())
}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '/' | '\\' | '?' | '#' | '%')
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_barcode_accepts_retail_codes() {
        assert!(validate_barcode("5941132022421").is_ok());
        assert!(validate_barcode("96385074").is_ok());
        assert!(validate_barcode("0000000000000").is_ok());
        // Code 128 payloads are not digit-only
        assert!(validate_barcode("ABC-123_x.y~z").is_ok());
    }

    #[test]
    fn test_validate_barcode_accepts_path_sub_delimiters() {
        for code in ["12+34", "A:B", "AB$1", "X@1", "a=b", "(1)!*,;'&"] {
            assert!(validate_barcode(code).is_ok(), "{:?} should be accepted", code);
        }
    }

    #[test]
    fn test_validate_barcode_rejects_empty() {
        assert_eq!(
            validate_barcode(""),
            Err(ValidationError::Required {
                field: "barcode".to_string()
            })
        );
    }

    #[test]
    fn test_validate_barcode_rejects_url_breaking_characters() {
        for code in [
            "12 34", "12/34", "12\\34", "12?x=1", "12#frag", "%41", "12\n", "1\t2", " 123", "ü123",
        ] {
            assert!(
                matches!(
                    validate_barcode(code),
                    Err(ValidationError::InvalidFormat { .. })
                ),
                "{:?} should be rejected",
                code
            );
        }
    }

    #[test]
    fn test_validate_barcode_rejects_dot_segments() {
        assert!(validate_barcode(".").is_err());
        assert!(validate_barcode("..").is_err());
        assert!(validate_barcode("...").is_ok());
    }
}
