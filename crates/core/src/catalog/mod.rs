//! Catalog loading and the filter/search pipeline.

/// One-shot retrieval of remote catalog documents.
pub mod fetch;
/// Pure complexity filter and substring search.
pub mod filter;
/// Document parsing and the shared in-memory store.
pub mod loader;

pub use filter::{apply_filters_and_search, filter_by_complexity, COMPLEXITY_ALL};
pub use loader::{CatalogError, CatalogSource, CatalogStore};
