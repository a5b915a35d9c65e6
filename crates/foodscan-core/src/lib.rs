//! # foodscan-core: Pure Data Model for FoodScan
//!
//! This crate holds the values that flow between the capture session, the
//! product lookup pipeline and whatever presents the result. It has zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FoodScan Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Orchestrator (apps/foodscan-cli)                │   │
//! │  │      activate ──► ScanResult ──► deactivate ──► lookup          │   │
//! │  └───────────┬──────────────────────────────────────┬──────────────┘   │
//! │              │                                      │                   │
//! │  ┌───────────▼───────────┐              ┌───────────▼───────────┐      │
//! │  │   foodscan-capture    │   Barcode    │    foodscan-lookup    │      │
//! │  │   CaptureSession      │ ───────────► │    ProductLookup      │      │
//! │  └───────────┬───────────┘              └───────────┬───────────┘      │
//! │              │                                      │                   │
//! │  ┌───────────▼──────────────────────────────────────▼──────────────┐   │
//! │  │               ★ foodscan-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation│  │  display  │  │   error   │  │   │
//! │  │   │  Barcode  │  │  barcode  │  │ nutrient  │  │Validation │  │   │
//! │  │   │  Product  │  │  URL-safe │  │   rows    │  │  Error    │  │   │
//! │  │   │  Outcome  │  │           │  │ messages  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO DEVICES • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Barcode, Product, Nutrients, ScanResult, LookupOutcome
//! - [`error`] - Domain error types
//! - [`validation`] - Barcode checks before a code is embedded in a URL
//! - [`display`] - Nutrient rows and user-facing messages
//!
//! ## Example Usage
//!
//! ```rust
//! use foodscan_core::{LookupResponse, LookupOutcome};
//!
//! let body = br#"{"status":1,"product":{"code":"5941132022421"}}"#;
//! let response = LookupResponse::from_slice(body).unwrap();
//! let outcome = response.into_outcome();
//!
//! assert!(matches!(outcome, LookupOutcome::Success(_)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod display;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use display::{NutrientKind, NutrientRow};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Endpoint of the public nutrition database, `{code}` is substituted.
///
/// The path and the `.json` suffix are fixed by the upstream API.
pub const DEFAULT_ENDPOINT_TEMPLATE: &str =
    "https://world.openfoodfacts.org/api/v2/product/{code}.json";

/// Placeholder replaced by the barcode in an endpoint template.
pub const CODE_PLACEHOLDER: &str = "{code}";

/// Upstream `status` value meaning "product found".
pub const STATUS_FOUND: i64 = 1;

/// Linear retail symbologies a capture session reports.
///
/// 2D formats are intentionally absent.
pub const RETAIL_SYMBOLOGIES: [Symbology; 3] =
    [Symbology::Ean8, Symbology::Ean13, Symbology::Code128];
