//! # Product Lookup
//!
//! Resolves one code to a [`LookupOutcome`]. Every failure is classified
//! locally; nothing but an outcome leaves [`ProductLookup::lookup`].
//!
//! ## Steps
//! ```text
//!  1. render URL      endpoint.render(code)      Err ─► InvalidInput   (no fetch)
//!  2. fetch           fetcher.fetch(&url)        Err ─► TransportError (no parse)
//!  3. decode          LookupResponse::from_slice Err ─► DecodeError
//!  4. interpret       status == 1 ─► Success(product)
//!                     status != 1 ─► NotFound
//! ```
//!
//! No retries and no timeout of its own: both belong to the fetcher. A
//! `ProductLookup` holds no mutable state and can serve concurrent lookups.

use std::sync::Arc;

use foodscan_core::{LookupOutcome, LookupResponse, ValidationError};
use tracing::{debug, info, warn};
use url::Url;

use crate::endpoint::EndpointTemplate;
use crate::fetch::Fetch;

/// The lookup pipeline.
#[derive(Clone)]
pub struct ProductLookup {
    fetcher: Arc<dyn Fetch>,
    endpoint: EndpointTemplate,
}

impl ProductLookup {
    /// Pipeline against the public nutrition database.
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self::with_endpoint(fetcher, EndpointTemplate::default())
    }

    /// Pipeline against a custom endpoint (mirror, local test server).
    pub fn with_endpoint(fetcher: Arc<dyn Fetch>, endpoint: EndpointTemplate) -> Self {
        Self { fetcher, endpoint }
    }

    pub fn endpoint(&self) -> &EndpointTemplate {
        &self.endpoint
    }

    /// URL that `lookup(code)` would fetch.
    pub fn request_url(&self, code: &str) -> Result<Url, ValidationError> {
        self.endpoint.render(code)
    }

    /// Looks up one code.
    pub async fn lookup(&self, code: impl AsRef<str>) -> LookupOutcome {
        let code = code.as_ref();

        let url = match self.request_url(code) {
            Ok(url) => url,
            Err(e) => {
                warn!(code, error = %e, "Code cannot be embedded in a request URL");
                return LookupOutcome::InvalidInput {
                    reason: e.to_string(),
                };
            }
        };

        debug!(code, %url, "Fetching product");
        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(code, error = %e, retryable = e.is_retryable(), "Product fetch failed");
                return LookupOutcome::TransportError {
                    reason: e.to_string(),
                };
            }
        };

        let outcome = match LookupResponse::from_slice(&body) {
            Ok(response) => response.into_outcome(),
            Err(e) => LookupOutcome::DecodeError {
                reason: e.to_string(),
            },
        };

        match &outcome {
            LookupOutcome::Success(product) => {
                info!(code, name = product.display_name(), "Product found")
            }
            LookupOutcome::NotFound => info!(code, "Product not found"),
            other => warn!(code, outcome = other.kind(), reason = other.reason(), "Lookup failed"),
        }

        outcome
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
