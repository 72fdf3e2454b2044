//! Deadline urgency classification
//!
//! Both the deadline and the injected `now` are reduced to calendar days in
//! `now`'s time zone before differencing, so anything due later today has zero
//! days remaining rather than a fraction.
//!
//! | Days remaining | Status         |
//! |----------------|----------------|
//! | `< 0`          | critical (expired) |
//! | `0..3`         | critical       |
//! | `3..7`         | closing soon   |
//! | `>= 7`         | open           |

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::core::opportunity::Deadline;

/// Days remaining below which a deadline is critical
pub const CRITICAL_DAYS: i64 = 3;

/// Days remaining below which a deadline is closing soon
pub const CLOSING_SOON_DAYS: i64 = 7;

/// Coarse urgency tier
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum UrgencyStatus {
    #[strum(serialize = "critical")]
    Critical,
    #[strum(serialize = "closing-soon")]
    ClosingSoon,
    #[strum(serialize = "open")]
    Open,
}

/// Fixed visual properties of a tier
struct TierStyle {
    label: &'static str,
    color: &'static str,
    bg_color: &'static str,
    pulse: bool,
}

impl UrgencyStatus {
    /// Tier for a signed day count
    pub const fn from_days(days_remaining: i64) -> Self {
        if days_remaining < CRITICAL_DAYS {
            // Covers expired (negative) deadlines as well
            UrgencyStatus::Critical
        } else if days_remaining < CLOSING_SOON_DAYS {
            UrgencyStatus::ClosingSoon
        } else {
            UrgencyStatus::Open
        }
    }

    const fn style(self) -> TierStyle {
        match self {
            UrgencyStatus::Critical => TierStyle {
                label: "Critical",
                color: "#FF3B30",
                bg_color: "rgba(255, 59, 48, 0.2)",
                pulse: true,
            },
            UrgencyStatus::ClosingSoon => TierStyle {
                label: "Closing Soon",
                color: "#FF9500",
                bg_color: "rgba(255, 149, 0, 0.2)",
                pulse: false,
            },
            UrgencyStatus::Open => TierStyle {
                label: "Open",
                color: "#30D158",
                bg_color: "rgba(48, 209, 88, 0.2)",
                pulse: false,
            },
        }
    }
}

/// Urgency of a known deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UrgencyInfo {
    pub status: UrgencyStatus,
    /// Signed; negative means the deadline has passed
    pub days_remaining: i64,
    pub label: &'static str,
    pub color: &'static str,
    pub bg_color: &'static str,
    pub pulse: bool,
}

impl UrgencyInfo {
    pub fn from_days(days_remaining: i64) -> Self {
        let status = UrgencyStatus::from_days(days_remaining);
        let style = status.style();
        Self {
            status,
            days_remaining,
            label: style.label,
            color: style.color,
            bg_color: style.bg_color,
            pulse: style.pulse,
        }
    }

    pub const fn is_expired(&self) -> bool {
        self.days_remaining < 0
    }

    /// Compact badge text: "Expired", "Due today", "1d left", "12d left"
    pub fn days_left_label(&self) -> String {
        match self.days_remaining {
            d if d < 0 => "Expired".to_string(),
            0 => "Due today".to_string(),
            d => format!("{d}d left"),
        }
    }
}

/// Outcome of classifying a possibly missing or unparseable deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Urgency {
    Known(UrgencyInfo),
    /// No usable deadline. Never to be rendered as expired.
    Unknown,
}

impl Urgency {
    pub fn info(&self) -> Option<&UrgencyInfo> {
        match self {
            Urgency::Known(info) => Some(info),
            Urgency::Unknown => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.info().is_some_and(UrgencyInfo::is_expired)
    }
}

/// Whole days from `now`'s calendar day to the deadline's calendar day
pub fn days_remaining<Tz: TimeZone>(deadline: &Deadline, now: &DateTime<Tz>) -> i64 {
    let today = now.date_naive();
    let due = deadline.date_in(&now.timezone());
    (due - today).num_days()
}

/// Classifies a parsed deadline relative to `now`.
pub fn classify_urgency<Tz: TimeZone>(deadline: &Deadline, now: &DateTime<Tz>) -> UrgencyInfo {
    UrgencyInfo::from_days(days_remaining(deadline, now))
}

/// Classifies an optional deadline; `None` yields [`Urgency::Unknown`].
pub fn classify_optional<Tz: TimeZone>(deadline: Option<&Deadline>, now: &DateTime<Tz>) -> Urgency {
    deadline.map_or(Urgency::Unknown, |d| {
        Urgency::Known(classify_urgency(d, now))
    })
}

/// Classifies a raw deadline string as stored by the backend.
///
/// Unparseable input yields [`Urgency::Unknown`], distinct from a past deadline.
pub fn classify_deadline_str<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> Urgency {
    classify_optional(Deadline::parse(raw).as_ref(), now)
}
