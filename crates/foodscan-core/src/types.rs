//! # Domain Types
//!
//! Values exchanged between the capture session, the lookup pipeline and the
//! presentation layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  CAPTURE SIDE                         LOOKUP SIDE                       │
//! │  ┌─────────────────┐                  ┌─────────────────────────────┐   │
//! │  │   ScanResult    │                  │       LookupResponse        │   │
//! │  │  ─────────────  │                  │  ─────────────────────────  │   │
//! │  │  Found(Barcode) │ ──── Barcode ──► │  status: i64 (wire)         │   │
//! │  │  DeviceFailure  │                  │  product: Option<Product>   │   │
//! │  └─────────────────┘                  └──────────────┬──────────────┘   │
//! │                                                      │ into_outcome     │
//! │  ┌─────────────────┐                  ┌──────────────▼──────────────┐   │
//! │  │   Symbology     │                  │       LookupOutcome         │   │
//! │  │  EAN-8, EAN-13  │                  │  Success(Product)           │   │
//! │  │  Code128, ...   │                  │  NotFound                   │   │
//! │  └─────────────────┘                  │  InvalidInput / Transport / │   │
//! │                                       │  DecodeError                │   │
//! │                                       └─────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Partial Records
//! The upstream database omits any field it has no data for. Every
//! [`Product`] and [`Nutrients`] field is an `Option`, and an absent value
//! stays `None`. Numeric fields never default to `0.0`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::STATUS_FOUND;

// =============================================================================
// Barcode
// =============================================================================

/// A decoded retail barcode payload.
///
/// Opaque and non-empty. No checksum validation is performed: whatever the
/// decoding layer reports is accepted as-is. Whether it can be embedded in a
/// request URL is checked later by [`crate::validation::validate_barcode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    /// Wraps a decoded payload.
    ///
    /// ## Example
    /// ```rust
    /// use foodscan_core::Barcode;
    ///
    /// assert!(Barcode::new("5941132022421").is_ok());
    /// assert!(Barcode::new("").is_err());
    /// ```
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        if code.is_empty() {
            return Err(ValidationError::Required {
                field: "barcode".to_string(),
            });
        }
        Ok(Barcode(code))
    }

    /// Returns the payload.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the barcode, returning the payload.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Barcode {
    type Error = ValidationError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Barcode::new(code)
    }
}

impl From<Barcode> for String {
    fn from(code: Barcode) -> Self {
        code.0
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Symbology
// =============================================================================

/// Machine-readable code formats a metadata output can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    /// EAN-8 (short retail code).
    Ean8,
    /// EAN-13 (standard retail code, includes UPC-A with a leading zero).
    Ean13,
    /// Code 128 (variable length linear code).
    Code128,
    /// UPC-E (zero-suppressed UPC).
    UpcE,
    /// Code 39.
    Code39,
    /// QR code (2D).
    Qr,
    /// Data Matrix (2D).
    DataMatrix,
    /// PDF417 (stacked 2D).
    Pdf417,
}

impl Symbology {
    /// Returns true for the linear retail codes a session reports.
    pub fn is_retail_linear(&self) -> bool {
        matches!(self, Symbology::Ean8 | Symbology::Ean13 | Symbology::Code128)
    }

    /// Guesses the linear symbology of a bare payload.
    ///
    /// Keyboard-wedge scanners only send the payload, so the format is
    /// inferred from its shape: 8 digits is EAN-8, 13 digits is EAN-13,
    /// anything else is treated as Code 128.
    ///
    /// ## Example
    /// ```rust
    /// use foodscan_core::Symbology;
    ///
    /// assert_eq!(Symbology::infer_linear("96385074"), Symbology::Ean8);
    /// assert_eq!(Symbology::infer_linear("5941132022421"), Symbology::Ean13);
    /// assert_eq!(Symbology::infer_linear("ABC-123"), Symbology::Code128);
    /// ```
    pub fn infer_linear(payload: &str) -> Self {
        let all_digits = !payload.is_empty() && payload.bytes().all(|b| b.is_ascii_digit());
        match (all_digits, payload.len()) {
            (true, 8) => Symbology::Ean8,
            (true, 13) => Symbology::Ean13,
            _ => Symbology::Code128,
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbology::Ean8 => write!(f, "EAN-8"),
            Symbology::Ean13 => write!(f, "EAN-13"),
            Symbology::Code128 => write!(f, "Code 128"),
            Symbology::UpcE => write!(f, "UPC-E"),
            Symbology::Code39 => write!(f, "Code 39"),
            Symbology::Qr => write!(f, "QR"),
            Symbology::DataMatrix => write!(f, "Data Matrix"),
            Symbology::Pdf417 => write!(f, "PDF417"),
        }
    }
}

// =============================================================================
// Scan Result
// =============================================================================

/// Which capture setup step failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "detail", rename_all = "snake_case")]
pub enum DeviceFailureReason {
    /// There is no default video-capable capture device.
    NoDevice,
    /// The device exists but could not be opened.
    CannotOpen(String),
    /// The opened device could not be attached as a capture input.
    CannotAddInput(String),
    /// The barcode metadata output could not be attached.
    CannotAddOutput(String),
}

impl fmt::Display for DeviceFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceFailureReason::NoDevice => write!(f, "no video capture device available"),
            DeviceFailureReason::CannotOpen(detail) => {
                write!(f, "cannot open capture device: {}", detail)
            }
            DeviceFailureReason::CannotAddInput(detail) => {
                write!(f, "cannot add capture input: {}", detail)
            }
            DeviceFailureReason::CannotAddOutput(detail) => {
                write!(f, "cannot add metadata output: {}", detail)
            }
        }
    }
}

/// What a capture session emits, at most once per activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum ScanResult {
    /// A recognized code was decoded.
    Found(Barcode),
    /// The capture device could not be set up.
    DeviceFailure(DeviceFailureReason),
}

// =============================================================================
// Nutrients
// =============================================================================

/// Amounts per 100g, exactly as the upstream database reports them.
///
/// Energy is in kcal, everything else in grams. Values are passed through
/// without range checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    #[serde(rename = "energy-kcal_100g", default, skip_serializing_if = "Option::is_none")]
    pub energy_kcal_100g: Option<f64>,

    #[serde(rename = "fat_100g", default, skip_serializing_if = "Option::is_none")]
    pub fat_100g: Option<f64>,

    #[serde(rename = "saturated-fat_100g", default, skip_serializing_if = "Option::is_none")]
    pub saturated_fat_100g: Option<f64>,

    #[serde(rename = "carbohydrates_100g", default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates_100g: Option<f64>,

    #[serde(rename = "sugars_100g", default, skip_serializing_if = "Option::is_none")]
    pub sugars_100g: Option<f64>,

    #[serde(rename = "fiber_100g", default, skip_serializing_if = "Option::is_none")]
    pub fiber_100g: Option<f64>,

    #[serde(rename = "proteins_100g", default, skip_serializing_if = "Option::is_none")]
    pub proteins_100g: Option<f64>,

    #[serde(rename = "salt_100g", default, skip_serializing_if = "Option::is_none")]
    pub salt_100g: Option<f64>,
}

// =============================================================================
// Product
// =============================================================================

/// A food product as returned by the nutrition database.
///
/// There is no public constructor: a `Product` only comes out of decoding
/// upstream bytes (see [`LookupResponse::from_slice`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,

    #[serde(rename = "product_name", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,

    #[serde(rename = "nutriments", default, skip_serializing_if = "Option::is_none")]
    nutrients: Option<Nutrients>,
}

impl Product {
    /// Barcode as echoed back by the database.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Product name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Front image URL.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Per-100g nutrient values.
    pub fn nutrients(&self) -> Option<&Nutrients> {
        self.nutrients.as_ref()
    }
}

// =============================================================================
// Lookup Response (wire level)
// =============================================================================

/// Body of `GET .../product/{code}.json`.
///
/// Unknown fields (`status_verbose`, `code` at top level, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LookupResponse {
    /// `1` means found, anything else means not found.
    pub status: i64,

    /// Present on success; may also be present when `status != 1`.
    #[serde(default)]
    pub product: Option<Product>,
}

impl LookupResponse {
    /// Decodes a response body.
    ///
    /// Fails on invalid JSON, a missing `status`, or fields whose JSON type
    /// does not match the schema.
    pub fn from_slice(body: &[u8]) -> CoreResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Returns true when upstream reported the product as found.
    #[inline]
    pub fn is_found(&self) -> bool {
        self.status == STATUS_FOUND
    }

    /// Interprets the status field.
    ///
    /// ## Rules
    /// ```text
    /// status == 1, product present  ──► Success(product)
    /// status == 1, product absent   ──► DecodeError (schema violated)
    /// status != 1 (any value)       ──► NotFound, even if product present
    /// ```
    pub fn into_outcome(self) -> LookupOutcome {
        if !self.is_found() {
            return LookupOutcome::NotFound;
        }

        match self.product {
            Some(product) => LookupOutcome::Success(product),
            None => LookupOutcome::DecodeError {
                reason: CoreError::MissingProduct {
                    status: self.status,
                }
                .to_string(),
            },
        }
    }
}

// =============================================================================
// Lookup Outcome
// =============================================================================

/// Terminal, fully classified result of one lookup.
///
/// A `Success` always carries a usable [`Product`]; no variant carries
/// partial state.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The product was found.
    Success(Product),

    /// Well-formed response, no matching product. Terminal for this code.
    NotFound,

    /// The code cannot be embedded in a request URL. Nothing was sent.
    InvalidInput { reason: String },

    /// Network / IO failure. Safe to retry the same code.
    TransportError { reason: String },

    /// Upstream data does not match the expected schema.
    DecodeError { reason: String },
}

impl LookupOutcome {
    /// Returns true for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }

    /// Returns the product of a `Success`.
    pub fn product(&self) -> Option<&Product> {
        match self {
            LookupOutcome::Success(product) => Some(product),
            _ => None,
        }
    }

    /// Returns true if the caller may retry the same code.
    ///
    /// Only transport failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LookupOutcome::TransportError { .. })
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupOutcome::Success(_) => "success",
            LookupOutcome::NotFound => "not_found",
            LookupOutcome::InvalidInput { .. } => "invalid_input",
            LookupOutcome::TransportError { .. } => "transport_error",
            LookupOutcome::DecodeError { .. } => "decode_error",
        }
    }

    /// Diagnostic reason carried by the failure variants.
    pub fn reason(&self) -> Option<&str> {
        match self {
            LookupOutcome::InvalidInput { reason }
            | LookupOutcome::TransportError { reason }
            | LookupOutcome::DecodeError { reason } => Some(reason),
            LookupOutcome::Success(_) | LookupOutcome::NotFound => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: &str = r#"{
        "status": 1,
        "product": {
            "code": "5941132022421",
            "product_name": "mix pentru Gustare de ovaz cu ciocolata",
            "nutriments": { "energy-kcal_100g": 113, "fat_100g": 2.9 }
        }
    }"#;

    #[test]
    fn test_barcode_rejects_empty() {
        assert!(Barcode::new("").is_err());
        let code = Barcode::new("5941132022421").unwrap();
        assert_eq!(code.as_str(), "5941132022421");
        assert_eq!(code.to_string(), "5941132022421");
    }

    #[test]
    fn test_symbology_inference() {
        assert_eq!(Symbology::infer_linear("12345678"), Symbology::Ean8);
        assert_eq!(Symbology::infer_linear("0000000000000"), Symbology::Ean13);
        assert_eq!(Symbology::infer_linear("123456789012"), Symbology::Code128);
        assert_eq!(Symbology::infer_linear("1234567A"), Symbology::Code128);
        assert!(Symbology::Ean13.is_retail_linear());
        assert!(!Symbology::Qr.is_retail_linear());
        assert!(!Symbology::UpcE.is_retail_linear());
    }

    #[test]
    fn test_decode_keeps_present_fields_and_leaves_absent_unset() {
        let response = LookupResponse::from_slice(SCENARIO_A.as_bytes()).unwrap();
        assert!(response.is_found());

        let product = response.product.unwrap();
        assert_eq!(product.code(), Some("5941132022421"));
        assert_eq!(product.name(), Some("mix pentru Gustare de ovaz cu ciocolata"));
        assert_eq!(product.image_url(), None);

        let nutrients = product.nutrients().unwrap();
        assert_eq!(nutrients.energy_kcal_100g, Some(113.0));
        assert_eq!(nutrients.fat_100g, Some(2.9));
        assert_eq!(nutrients.sugars_100g, None);
        assert_eq!(nutrients.salt_100g, None);
    }

    #[test]
    fn test_decode_keeps_image_url() {
        let body = r#"{"status":1,"product":{"code":"96385074","image_url":"https://images.openfoodfacts.org/images/products/963/850/74/front.jpg"}}"#;
        let product = LookupResponse::from_slice(body.as_bytes())
            .unwrap()
            .product
            .unwrap();

        assert_eq!(
            product.image_url(),
            Some("https://images.openfoodfacts.org/images/products/963/850/74/front.jpg")
        );
        assert_eq!(product.name(), None);
        assert!(product.nutrients().is_none());
    }

    #[test]
    fn test_status_one_is_success() {
        let outcome = LookupResponse::from_slice(SCENARIO_A.as_bytes())
            .unwrap()
            .into_outcome();
        assert!(outcome.is_success());
        assert_eq!(outcome.kind(), "success");
        assert_eq!(outcome.product().and_then(Product::code), Some("5941132022421"));
    }

    #[test]
    fn test_status_zero_is_not_found_even_with_product() {
        let body = r#"{"status":0,"product":{"code":"123","product_name":"ghost"}}"#;
        let outcome = LookupResponse::from_slice(body.as_bytes())
            .unwrap()
            .into_outcome();
        assert_eq!(outcome, LookupOutcome::NotFound);
    }

    #[test]
    fn test_any_other_status_is_not_found() {
        for status in ["-1", "2", "404"] {
            let body = format!(r#"{{"status":{}}}"#, status);
            let outcome = LookupResponse::from_slice(body.as_bytes())
                .unwrap()
                .into_outcome();
            assert_eq!(outcome, LookupOutcome::NotFound, "status {}", status);
        }
    }

    #[test]
    fn test_found_without_product_is_decode_error() {
        let outcome = LookupResponse::from_slice(br#"{"status":1}"#)
            .unwrap()
            .into_outcome();
        assert!(matches!(outcome, LookupOutcome::DecodeError { .. }));
    }

    #[test]
    fn test_product_with_only_code_is_success() {
        let outcome = LookupResponse::from_slice(br#"{"status":1,"product":{"code":"42"}}"#)
            .unwrap()
            .into_outcome();
        let product = outcome.product().unwrap();
        assert_eq!(product.code(), Some("42"));
        assert!(product.name().is_none());
        assert!(product.nutrients().is_none());
    }

    #[test]
    fn test_missing_status_fails_to_decode() {
        let err = LookupResponse::from_slice(br#"{"product":{"code":"1"}}"#).unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse(_)));
    }

    #[test]
    fn test_invalid_json_fails_to_decode() {
        assert!(LookupResponse::from_slice(b"This is not valid JSON!").is_err());
    }

    #[test]
    fn test_wrong_field_type_fails_to_decode() {
        let body = br#"{"status":1,"product":{"nutriments":{"fat_100g":"lots"}}}"#;
        assert!(LookupResponse::from_slice(body).is_err());
    }

    #[test]
    fn test_null_fields_are_unset() {
        let body = br#"{"status":1,"product":{"product_name":null,"nutriments":{"salt_100g":null}}}"#;
        let response = LookupResponse::from_slice(body).unwrap();
        let product = response.product.unwrap();
        assert!(product.name().is_none());
        assert_eq!(product.nutrients().unwrap().salt_100g, None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let body = br#"{"code":"0000000000000","status":0,"status_verbose":"product not found"}"#;
        let response = LookupResponse::from_slice(body).unwrap();
        assert_eq!(response.status, 0);
        assert!(response.product.is_none());
    }

    #[test]
    fn test_outcome_helpers() {
        let outcome = LookupOutcome::TransportError {
            reason: "offline".into(),
        };
        assert!(outcome.is_retryable());
        assert_eq!(outcome.reason(), Some("offline"));

        assert!(!LookupOutcome::NotFound.is_retryable());
        assert!(LookupOutcome::NotFound.reason().is_none());
        assert!(!LookupOutcome::DecodeError { reason: "x".into() }.is_retryable());
    }

    #[test]
    fn test_scan_result_serialization() {
        let found = ScanResult::Found(Barcode::new("96385074").unwrap());
        let json = serde_json::to_string(&found).unwrap();
        assert_eq!(json, r#"{"result":"found","value":"96385074"}"#);

        let failure = ScanResult::DeviceFailure(DeviceFailureReason::NoDevice);
        let json = serde_json::to_string(&failure).unwrap();
        assert!(json.contains("no_device"));
    }
}
