//! # Car Listings
//!
//! Scrapes a paginated used-car search-results feed, normalizes each listing
//! and writes the result as a CSV table (and optionally JSON).
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Walking** ([`scrapers::pagination`]): visit result pages `1..=max_pages` one at a time, pausing between pages
//! 2. **Extraction** ([`scrapers::listing`]): pull raw fields out of every listing block, skipping unusable blocks
//! 3. **Normalization** ([`normalize`]): scrub numeric fields and compute each car's age
//! 4. **Output** ([`outputs`]): write the fixed 9-column CSV (and the JSON export if requested)
//!
//! Failures are contained at the smallest scope possible: a field becomes
//! `N/A`, a block is skipped, a page is skipped. Only a bad configuration stops
//! a run before it starts.
//!
//! Logging goes through `tracing`; installing a subscriber is left to the binary.

pub mod cli;
pub mod config;
pub mod models;
pub mod normalize;
pub mod outputs;
pub mod runner;
pub mod scrapers;
pub mod utils;
