//! # Display Module
//!
//! Presentation-neutral text for products and outcomes: nutrient rows and the
//! user-facing message for every outcome. Renderers (terminal, GUI, JSON)
//! decide layout; the wording lives here so every front end says the same
//! thing.
//!
//! ## Nutrient Table
//! ```text
//! Values per 100g:
//!   Energy              113.0 kcal
//!   Fat                   2.9 g
//!   Saturated fat         1.2 g
//!   Carbohydrates        17.0 g
//!   Sugars                  -        ◄── unset, never shown as 0.0
//!   ...
//! ```

use std::fmt;

use crate::types::{DeviceFailureReason, LookupOutcome, Nutrients, Product};

/// Fallback shown when a product has no name.
pub const UNKNOWN_PRODUCT: &str = "Unknown product";

/// Header above the nutrient table.
pub const NUTRIENTS_HEADER: &str = "Values per 100g:";

/// Placeholder for an unset nutrient value.
pub const MISSING_VALUE: &str = "-";

// =============================================================================
// Nutrient Kind
// =============================================================================

/// The eight nutrients, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NutrientKind {
    Energy,
    Fat,
    SaturatedFat,
    Carbohydrates,
    Sugars,
    Fiber,
    Protein,
    Salt,
}

impl NutrientKind {
    /// All nutrients in display order.
    pub const ALL: [NutrientKind; 8] = [
        NutrientKind::Energy,
        NutrientKind::Fat,
        NutrientKind::SaturatedFat,
        NutrientKind::Carbohydrates,
        NutrientKind::Sugars,
        NutrientKind::Fiber,
        NutrientKind::Protein,
        NutrientKind::Salt,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            NutrientKind::Energy => "Energy",
            NutrientKind::Fat => "Fat",
            NutrientKind::SaturatedFat => "Saturated fat",
            NutrientKind::Carbohydrates => "Carbohydrates",
            NutrientKind::Sugars => "Sugars",
            NutrientKind::Fiber => "Fiber",
            NutrientKind::Protein => "Protein",
            NutrientKind::Salt => "Salt",
        }
    }

    /// Unit of the per-100g amount.
    pub fn unit(&self) -> &'static str {
        match self {
            NutrientKind::Energy => "kcal",
            _ => "g",
        }
    }

    /// Key used by the upstream API.
    pub fn wire_key(&self) -> &'static str {
        match self {
            NutrientKind::Energy => "energy-kcal_100g",
            NutrientKind::Fat => "fat_100g",
            NutrientKind::SaturatedFat => "saturated-fat_100g",
            NutrientKind::Carbohydrates => "carbohydrates_100g",
            NutrientKind::Sugars => "sugars_100g",
            NutrientKind::Fiber => "fiber_100g",
            NutrientKind::Protein => "proteins_100g",
            NutrientKind::Salt => "salt_100g",
        }
    }
}

impl Nutrients {
    /// Returns the value of one nutrient.
    pub fn get(&self, kind: NutrientKind) -> Option<f64> {
        match kind {
            NutrientKind::Energy => self.energy_kcal_100g,
            NutrientKind::Fat => self.fat_100g,
            NutrientKind::SaturatedFat => self.saturated_fat_100g,
            NutrientKind::Carbohydrates => self.carbohydrates_100g,
            NutrientKind::Sugars => self.sugars_100g,
            NutrientKind::Fiber => self.fiber_100g,
            NutrientKind::Protein => self.proteins_100g,
            NutrientKind::Salt => self.salt_100g,
        }
    }

    /// All eight rows in display order, unset values included.
    pub fn rows(&self) -> Vec<NutrientRow> {
        NutrientKind::ALL
            .iter()
            .map(|kind| NutrientRow {
                kind: *kind,
                value: self.get(*kind),
            })
            .collect()
    }
}

// =============================================================================
// Nutrient Row
// =============================================================================

/// One line of the nutrient table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientRow {
    pub kind: NutrientKind,
    pub value: Option<f64>,
}

impl NutrientRow {
    /// Display label.
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Value with one decimal and unit, or `-` when unset.
    ///
    /// ```rust
    /// use foodscan_core::{NutrientKind, NutrientRow};
    ///
    /// let row = NutrientRow { kind: NutrientKind::Energy, value: Some(113.0) };
    /// assert_eq!(row.formatted_value(), "113.0 kcal");
    ///
    /// let row = NutrientRow { kind: NutrientKind::Sugars, value: None };
    /// assert_eq!(row.formatted_value(), "-");
    /// ```
    pub fn formatted_value(&self) -> String {
        match self.value {
            Some(value) => format!("{:.1} {}", value, self.kind.unit()),
            None => MISSING_VALUE.to_string(),
        }
    }
}

impl fmt::Display for NutrientRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.formatted_value())
    }
}

// =============================================================================
// Product / Outcome Messages
// =============================================================================

impl Product {
    /// Name to show, falling back to [`UNKNOWN_PRODUCT`].
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(UNKNOWN_PRODUCT)
    }
}

impl LookupOutcome {
    /// Message for the user, or `None` for `Success` (the product is shown
    /// instead).
    ///
    /// Every failure variant has its own non-empty wording.
    pub fn user_message(&self) -> Option<String> {
        match self {
            LookupOutcome::Success(_) => None,
            LookupOutcome::NotFound => Some("Product not found.".to_string()),
            LookupOutcome::InvalidInput { reason } => {
                Some(format!("This code cannot be looked up: {}", reason))
            }
            LookupOutcome::TransportError { reason } => {
                Some(format!("Error downloading data: {}", reason))
            }
            LookupOutcome::DecodeError { reason } => Some(format!(
                "The nutrition database sent data in an unexpected format: {}",
                reason
            )),
        }
    }
}

impl DeviceFailureReason {
    /// Message for the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            DeviceFailureReason::NoDevice => "Camera unavailable.",
            DeviceFailureReason::CannotOpen(_) => "Could not access the camera.",
            DeviceFailureReason::CannotAddInput(_) => "Could not add the camera input.",
            DeviceFailureReason::CannotAddOutput(_) => "Could not add the barcode output.",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
