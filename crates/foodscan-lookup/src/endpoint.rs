//! # Endpoint Template
//!
//! The request URL pattern with a single `{code}` placeholder.
//!
//! ```text
//! "https://world.openfoodfacts.org/api/v2/product/{code}.json"
//!                                                 ───┬──
//!                      validate_barcode(code) ───────┘  then Url::parse
//! ```
//!
//! A template is checked once when it is created (exactly one placeholder,
//! http or https). Each code is checked again when it is rendered.

use std::fmt;
use std::str::FromStr;

use foodscan_core::validation::validate_barcode;
use foodscan_core::{ValidationError, CODE_PLACEHOLDER, DEFAULT_ENDPOINT_TEMPLATE};
use url::Url;

/// Code used to check that a template renders to a valid URL.
const PROBE_CODE: &str = "0000000000000";

/// Request URL pattern for product lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate(String);

impl EndpointTemplate {
    /// Parses and checks a template.
    ///
    /// ## Example
    /// ```rust
    /// use foodscan_lookup::EndpointTemplate;
    ///
    /// let template = EndpointTemplate::new("http://127.0.0.1:8080/p/{code}.json").unwrap();
    /// assert_eq!(
    ///     template.render("96385074").unwrap().as_str(),
    ///     "http://127.0.0.1:8080/p/96385074.json"
    /// );
    ///
    /// assert!(EndpointTemplate::new("https://example.com/no-placeholder").is_err());
    /// ```
    pub fn new(template: impl Into<String>) -> Result<Self, ValidationError> {
        let template = template.into();

        let placeholders = template.matches(CODE_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(ValidationError::InvalidFormat {
                field: "endpoint".to_string(),
                reason: format!(
                    "must contain {} exactly once, found {}",
                    CODE_PLACEHOLDER, placeholders
                ),
            });
        }

        let probe = Url::parse(&template.replace(CODE_PLACEHOLDER, PROBE_CODE)).map_err(|e| {
            ValidationError::InvalidFormat {
                field: "endpoint".to_string(),
                reason: e.to_string(),
            }
        })?;

        if !matches!(probe.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidFormat {
                field: "endpoint".to_string(),
                reason: format!("unsupported scheme '{}'", probe.scheme()),
            });
        }

        Ok(Self(template))
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the request URL for one code.
    ///
    /// Fails if the code is empty or contains characters that would change
    /// the URL's structure.
    pub fn render(&self, code: &str) -> Result<Url, ValidationError> {
        validate_barcode(code)?;

        Url::parse(&self.0.replace(CODE_PLACEHOLDER, code)).map_err(|e| {
            ValidationError::InvalidFormat {
                field: "barcode".to_string(),
                reason: e.to_string(),
            }
        })
    }
}

impl Default for EndpointTemplate {
    fn default() -> Self {
        Self(DEFAULT_ENDPOINT_TEMPLATE.to_string())
    }
}

impl FromStr for EndpointTemplate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renders_upstream_url() {
        let url = EndpointTemplate::default().render("5941132022421").unwrap();
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/api/v2/product/5941132022421.json"
        );
    }

    #[test]
    fn test_default_passes_own_checks() {
        assert_eq!(
            EndpointTemplate::new(DEFAULT_ENDPOINT_TEMPLATE).unwrap(),
            EndpointTemplate::default()
        );
    }

    #[test]
    fn test_rejects_bad_templates() {
        for template in [
            "https://example.com/product.json",
            "https://example.com/{code}/{code}.json",
            "not a url {code}",
            "ftp://example.com/{code}",
            "file:///tmp/{code}.json",
        ] {
            assert!(EndpointTemplate::new(template).is_err(), "{}", template);
        }
    }

    #[test]
    fn test_render_rejects_url_breaking_codes() {
        let template = EndpointTemplate::default();
        assert!(matches!(
            template.render(""),
            Err(ValidationError::Required { .. })
        ));
        for code in ["12/34", "12\\34", "12?x", "a b", "..", "#", "%2F"] {
            assert!(template.render(code).is_err(), "{:?}", code);
        }
    }

    #[test]
    fn test_render_keeps_sub_delimiters() {
        let url = EndpointTemplate::default().render("12+34").unwrap();
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/api/v2/product/12+34.json"
        );
        let url = EndpointTemplate::default().render("A:B").unwrap();
        assert_eq!(url.path(), "/api/v2/product/A:B.json");
    }

    #[test]
    fn test_from_str() {
        let template: EndpointTemplate = "http://localhost:9000/{code}".parse().unwrap();
        assert_eq!(template.to_string(), "http://localhost:9000/{code}");
    }
}
