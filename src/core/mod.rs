//! Core catalog functionality
//!
//! This module contains the core types and logic of the opportunity catalog.
//! It provides:
//!
//! - [`opportunity`]: Canonical records and normalization of raw backend rows
//! - [`urgency`]: Deadline urgency classification
//! - [`filter_state`]: Filter state and its query-parameter representation
//! - [`catalog`]: Filtering, ordering, and explore-feed composition
//! - [`snapshots`]: Catalog files and cached snapshots
//! - [`sample`]: Bundled sample catalog
//! - [`error`]: Error types for catalog operations

pub mod catalog;
pub mod error;
pub mod filter_state;
pub mod opportunity;
pub mod sample;
pub mod snapshots;
pub mod urgency;

#[cfg(test)]
pub mod test_helpers;

#[cfg(test)]
mod tests;
