//! # foodscan-lookup: Product Lookup Pipeline
//!
//! Resolves a barcode to a food product via the public nutrition database,
//! or to the reason it could not.
//!
//! ## Modules
//!
//! - [`lookup`] - `ProductLookup`, the pipeline itself
//! - [`fetch`] - the injectable `Fetch` capability and its HTTP implementation
//! - [`endpoint`] - request URL template
//! - [`error`] - transport errors
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use foodscan_lookup::{HttpFetcher, HttpFetcherConfig, ProductLookup};
//!
//! # async fn run() -> Result<(), foodscan_lookup::FetchError> {
//! let fetcher = HttpFetcher::new(&HttpFetcherConfig::default())?;
//! let lookup = ProductLookup::new(Arc::new(fetcher));
//!
//! let outcome = lookup.lookup("5941132022421").await;
//! if let Some(product) = outcome.product() {
//!     println!("{}", product.display_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod lookup;

pub use endpoint::EndpointTemplate;
pub use error::FetchError;
pub use fetch::{Fetch, HttpFetcher, HttpFetcherConfig, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use lookup::ProductLookup;
