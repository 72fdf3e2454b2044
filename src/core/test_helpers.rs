//! Shared test utilities for core module tests
//!
//! Provides common test helpers to avoid duplication across test suites.
//! This module is only compiled in test mode.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};

use crate::core::opportunity::{Category, Deadline, Opportunity};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A fixed UTC "now" for deterministic urgency math
pub fn now_at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
}

/// Creates an opportunity with no deadline, free, no mode.
///
/// This is the canonical helper for creating test records.
/// Use this instead of spelling out every field in tests.
pub fn opportunity(id: &str, title: &str, organization: &str, category: Category) -> Opportunity {
    Opportunity {
        id: id.to_string(),
        title: title.to_string(),
        organization: organization.to_string(),
        category,
        deadline: None,
        description: String::new(),
        tags: Vec::new(),
        location: None,
        is_paid: false,
        mode: None,
        created_at: None,
        url: String::new(),
        slug: None,
    }
}

/// Creates an opportunity whose deadline falls `days` calendar days after `now`
pub fn opportunity_due_in(
    id: &str,
    title: &str,
    category: Category,
    now: &DateTime<Utc>,
    days: i64,
) -> Opportunity {
    let mut opp = opportunity(id, title, "Test Org", category);
    opp.deadline = Some(Deadline::Date(now.date_naive() + TimeDelta::days(days)));
    opp
}
