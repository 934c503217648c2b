//! Scraping of the paginated search-results feed.
//!
//! Each run follows the same sequential pattern:
//!
//! 1. **Fetching**: [`fetch`] downloads one results page through the [`fetch::FetchPage`] seam
//! 2. **Extraction**: [`listing`] turns every listing block on that page into a [`RawListing`]
//! 3. **Walking**: [`pagination`] drives pages `1..=max_pages`, pacing between them
//!
//! # Failure handling
//!
//! | Failure | Scope | Outcome |
//! |---------|-------|---------|
//! | Transport (timeout, connect, non-2xx) | one page | logged, page skipped |
//! | Missing options / too few option slots | one block | logged at debug, block skipped |
//! | Missing title, price or option label | one field | field becomes unknown |
//!
//! [`RawListing`]: crate::models::RawListing

pub mod fetch;
pub mod listing;
pub mod pagination;
