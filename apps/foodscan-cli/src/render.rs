//! # Output Rendering
//!
//! Text for people, JSON for scripts. Wording comes from `foodscan-core` so
//! both say the same thing.
//!
//! ## Text
//! ```text
//! Scanned code: 5941132022421
//! Oat mix
//! Code: 5941132022421
//! Values per 100g:
//!   Energy            113.0 kcal
//!   Fat                  2.9 g
//!   Saturated fat           -
//! ```
//!
//! ## JSON
//! ```text
//! {"outcome":"success","code":"5941132022421","product":{...}}
//! {"outcome":"not_found","message":"Product not found."}
//! {"outcome":"transport_error","reason":"...","message":"..."}
//! {"outcome":"device_failure","reason":{"step":"no_device"},"message":"..."}
//! ```

use std::fmt::Write;

use foodscan_core::display::NUTRIENTS_HEADER;
use foodscan_core::{Barcode, DeviceFailureReason, LookupOutcome, Product};
use serde_json::{json, Value};

use crate::orchestrator::ScanReport;

// =============================================================================
// Exit Status
// =============================================================================

/// Process exit status for an outcome: 0 found, 1 not found, 2 otherwise.
pub fn exit_status(outcome: &LookupOutcome) -> u8 {
    match outcome {
        LookupOutcome::Success(_) => 0,
        LookupOutcome::NotFound => 1,
        _ => 2,
    }
}

/// Exit status for a whole scan.
pub fn report_exit_status(report: &ScanReport) -> u8 {
    match report {
        ScanReport::Looked { outcome, .. } => exit_status(outcome),
        ScanReport::DeviceFailure(_) | ScanReport::Cancelled => 2,
    }
}

// =============================================================================
// Text
// =============================================================================

/// Name, code, image and nutrient table of a product.
///
/// The table is left out when the product has no nutrient data at all.
pub fn product_text(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.display_name());
    if let Some(code) = product.code() {
        let _ = writeln!(out, "Code: {}", code);
    }
    if let Some(image) = product.image_url() {
        let _ = writeln!(out, "Image: {}", image);
    }

    if let Some(nutrients) = product.nutrients() {
        let _ = writeln!(out, "{}", NUTRIENTS_HEADER);
        for row in nutrients.rows() {
            let _ = writeln!(out, "  {:<15} {:>12}", row.label(), row.formatted_value());
        }
    }
    out
}

/// The product, or the user-facing message for a failure.
pub fn outcome_text(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Success(product) => product_text(product),
        other => format!("{}\n", other.user_message().unwrap_or_default()),
    }
}

/// Line echoed once a code has been scanned.
pub fn scanned_text(code: &Barcode) -> String {
    format!("Scanned code: {}", code)
}

/// Text for a device failure.
pub fn device_failure_text(reason: &DeviceFailureReason) -> String {
    format!("{} ({})\n", reason.user_message(), reason)
}

// =============================================================================
// JSON
// =============================================================================

/// JSON document for an outcome.
pub fn outcome_json(outcome: &LookupOutcome) -> Value {
    match outcome {
        LookupOutcome::Success(product) => json!({
            "outcome": outcome.kind(),
            "product": product,
        }),
        LookupOutcome::NotFound => json!({
            "outcome": outcome.kind(),
            "message": outcome.user_message(),
        }),
        other => json!({
            "outcome": other.kind(),
            "reason": other.reason(),
            "message": other.user_message(),
        }),
    }
}

/// JSON document for a whole scan.
pub fn report_json(report: &ScanReport) -> Value {
    match report {
        ScanReport::Looked { code, outcome } => {
            let mut value = outcome_json(outcome);
            if let Value::Object(map) = &mut value {
                map.insert("code".to_string(), Value::String(code.to_string()));
            }
            value
        }
        ScanReport::DeviceFailure(reason) => json!({
            "outcome": "device_failure",
            "reason": reason,
            "message": reason.user_message(),
        }),
        ScanReport::Cancelled => json!({ "outcome": "cancelled" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodscan_core::LookupResponse;

    fn success(body: &str) -> LookupOutcome {
        LookupResponse::from_slice(body.as_bytes()).unwrap().into_outcome()
    }

    fn scenario_a() -> LookupOutcome {
        success(
            r#"{"status":1,"product":{"code":"5941132022421","product_name":"mix...","nutriments":{"energy-kcal_100g":113,"fat_100g":2.9}}}"#,
        )
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&scenario_a()), 0);
        assert_eq!(exit_status(&LookupOutcome::NotFound), 1);
        assert_eq!(
            exit_status(&LookupOutcome::DecodeError { reason: "x".into() }),
            2
        );
        assert_eq!(report_exit_status(&ScanReport::Cancelled), 2);
    }

    #[test]
    fn test_product_text() {
        let text = outcome_text(&scenario_a());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "mix...");
        assert_eq!(lines[1], "Code: 5941132022421");
        assert_eq!(lines[2], "Values per 100g:");
        assert_eq!(lines.len(), 3 + 8);
        assert!(lines[3].contains("Energy") && lines[3].ends_with("113.0 kcal"));
        assert!(lines[4].contains("Fat") && lines[4].ends_with("2.9 g"));
        assert!(lines[7].contains("Sugars") && lines[7].ends_with('-'));
    }

    #[test]
    fn test_product_without_nutrients_has_no_table() {
        let text = outcome_text(&success(r#"{"status":1,"product":{}}"#));
        assert_eq!(text, "Unknown product\n");
        assert!(!text.contains(NUTRIENTS_HEADER));
    }

    #[test]
    fn test_empty_nutrients_show_dashes() {
        let text = outcome_text(&success(r#"{"status":1,"product":{"nutriments":{}}}"#));
        assert!(text.contains(NUTRIENTS_HEADER));
        assert_eq!(text.lines().filter(|l| l.ends_with('-')).count(), 8);
    }

    #[test]
    fn test_product_text_shows_image() {
        let text = outcome_text(&success(
            r#"{"status":1,"product":{"code":"96385074","product_name":"Oat mix","image_url":"https://images.openfoodfacts.org/front.jpg"}}"#,
        ));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Oat mix",
                "Code: 96385074",
                "Image: https://images.openfoodfacts.org/front.jpg",
            ]
        );
    }

    #[test]
    fn test_failure_text_uses_user_message() {
        let text = outcome_text(&LookupOutcome::TransportError {
            reason: "timed out".into(),
        });
        assert_eq!(text, "Error downloading data: timed out\n");
    }

    #[test]
    fn test_outcome_json() {
        let value = outcome_json(&scenario_a());
        assert_eq!(value["outcome"], "success");
        assert_eq!(value["product"]["code"], "5941132022421");
        assert_eq!(value["product"]["nutriments"]["energy-kcal_100g"], 113.0);
        assert!(value["product"]["nutriments"].get("sugars_100g").is_none());

        let value = outcome_json(&LookupOutcome::NotFound);
        assert_eq!(value["outcome"], "not_found");
        assert_eq!(value["message"], "Product not found.");

        let value = outcome_json(&LookupOutcome::InvalidInput {
            reason: "bad".into(),
        });
        assert_eq!(value["outcome"], "invalid_input");
        assert_eq!(value["reason"], "bad");
    }

    #[test]
    fn test_report_json() {
        let report = ScanReport::Looked {
            code: Barcode::new("0000000000000").unwrap(),
            outcome: LookupOutcome::NotFound,
        };
        let value = report_json(&report);
        assert_eq!(value["outcome"], "not_found");
        assert_eq!(value["code"], "0000000000000");

        let value = report_json(&ScanReport::DeviceFailure(DeviceFailureReason::NoDevice));
        assert_eq!(value["outcome"], "device_failure");
        assert_eq!(value["reason"]["step"], "no_device");
    }
}
