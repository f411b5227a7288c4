//! Scraping of per-drug metadata pages.
//!
//! This module handles fetching, parsing, and extraction of one metadata
//! record per DrugBank id.

mod client;
mod decode;
mod extract;
mod fetcher;
mod types;

// Re-export record types for the rest of the pipeline
pub use self::types::*;

// Re-export the entry points used by lib consumers and the binary
pub use self::client::{create_http_client, drug_page_url, fetch_drug_page};
pub use self::decode::decode_cfemail;
pub use self::extract::extract_drug;
pub use self::fetcher::pull_drugs;
