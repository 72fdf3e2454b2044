//! Accolades - student opportunity catalog core
//!
//! Browsing, filtering and urgency logic for a catalog of hackathons,
//! internships, research programs and challenges.
//!
//! # Architecture
//!
//! - [`core`] - Canonical records, urgency classification, filter state, filtering pipeline
//! - [`validators`] - Submission validation
//! - [`config`] - Configuration persistence
//! - [`utils`] - Utility functions (XDG directories, display formatting)
//!
//! # Purity
//!
//! Everything under [`core`] except [`core::snapshots`] is synchronous and
//! free of I/O. The current time is always passed in, never read implicitly.

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod core;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use core::catalog::{apply_filters, sort_closing_soon, sort_newest};
pub use core::error::{Error, Result};
pub use core::filter_state::{Choice, FilterParams, FilterState, FilterUpdate, serialize};
pub use core::opportunity::{Category, Cost, Deadline, Mode, Opportunity};
pub use core::urgency::{Urgency, UrgencyInfo, UrgencyStatus, classify_urgency};
