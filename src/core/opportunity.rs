//! Opportunity records and the row normalization boundary
//!
//! The hosted backend hands back loosely typed rows: column names differ between
//! tables and pages (`end_date` vs `deadline`, `organization_name` vs a joined
//! `organizations` object), and category labels are spelled several ways
//! ("Coding Challenge", "Competition", "challenges"). Everything past this module
//! works with the canonical [`Opportunity`] only.
//!
//! # Category mapping
//!
//! | Raw label(s)                                                    | Canonical   |
//! |-----------------------------------------------------------------|-------------|
//! | hackathon, hackathons                                           | `hackathon` |
//! | internship, internships                                         | `internship`|
//! | research, research program, summer program                      | `research`  |
//! | challenge, coding challenge, hiring challenge, competition      | `challenge` |
//!
//! Matching is case-insensitive, ignores surrounding whitespace, treats `-` and
//! `_` as spaces and accepts a trailing plural `s`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{Error, Result};

/// Maximum number of records accepted from a single catalog source
///
/// The live site lists a few hundred opportunities; this bounds memory for
/// malformed or hostile catalog files.
pub const MAX_OPPORTUNITIES: usize = 10_000;

/// Canonical opportunity category
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[strum(serialize = "hackathon")]
    Hackathon,
    #[strum(serialize = "internship")]
    Internship,
    #[strum(serialize = "research")]
    Research,
    #[strum(serialize = "challenge")]
    Challenge,
}

/// Every raw label observed in the backend and URL slugs, keyed by [`label_key`]
const CATEGORY_ALIASES: &[(&str, Category)] = &[
    ("hackathon", Category::Hackathon),
    ("internship", Category::Internship),
    ("research", Category::Research),
    ("research program", Category::Research),
    ("summer program", Category::Research),
    ("challenge", Category::Challenge),
    ("coding challenge", Category::Challenge),
    ("hiring challenge", Category::Challenge),
    ("competition", Category::Challenge),
];

const MODE_ALIASES: &[(&str, Mode)] = &[
    ("virtual", Mode::Virtual),
    ("online", Mode::Virtual),
    ("remote", Mode::Virtual),
    ("hybrid", Mode::Hybrid),
    ("on site", Mode::OnSite),
    ("onsite", Mode::OnSite),
    ("in person", Mode::OnSite),
];

/// Lowercases, trims, and folds `-`/`_`/runs of whitespace into single spaces.
fn label_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup<T: Copy>(table: &[(&str, T)], raw: &str) -> Option<T> {
    let key = label_key(raw);
    let find = |k: &str| table.iter().find(|(alias, _)| *alias == k).map(|(_, v)| *v);

    find(&key).or_else(|| key.strip_suffix('s').and_then(find))
}

impl Category {
    /// Resolves any known spelling of a category. Returns `None` for unknown labels.
    pub fn from_label(raw: &str) -> Option<Self> {
        lookup(CATEGORY_ALIASES, raw)
    }

    /// Returns the canonical slug used in parameter maps and snapshots
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Hackathon => "hackathon",
            Category::Internship => "internship",
            Category::Research => "research",
            Category::Challenge => "challenge",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Category::Hackathon => "Hackathon",
            Category::Internship => "Internship",
            Category::Research => "Research",
            Category::Challenge => "Challenge",
        }
    }
}

/// Participation mode
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum Mode {
    #[strum(serialize = "Virtual")]
    Virtual,
    #[strum(serialize = "Hybrid")]
    Hybrid,
    #[serde(rename = "On-site")]
    #[strum(serialize = "On-site")]
    OnSite,
}

impl Mode {
    pub fn from_label(raw: &str) -> Option<Self> {
        lookup(MODE_ALIASES, raw)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Virtual => "Virtual",
            Mode::Hybrid => "Hybrid",
            Mode::OnSite => "On-site",
        }
    }
}

/// Cost filter value
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Cost {
    Free,
    Paid,
}

impl Cost {
    pub const fn as_str(self) -> &'static str {
        match self {
            Cost::Free => "Free",
            Cost::Paid => "Paid",
        }
    }
}

/// An application deadline as stored by the backend
///
/// Date-only values stay calendar dates so they never shift across time zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Deadline {
    Date(NaiveDate),
    Instant(DateTime<Utc>),
}

impl Deadline {
    /// Parses RFC 3339, `YYYY-MM-DD HH:MM:SS+ZZ`, naive ISO timestamps (as UTC),
    /// and plain `YYYY-MM-DD` dates. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Deadline::Instant(dt.with_timezone(&Utc)));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
            return Some(Deadline::Instant(dt.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(Deadline::Instant(naive.and_utc()));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(Deadline::Date)
    }

    /// Calendar day of this deadline as seen from `tz`
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        match self {
            Deadline::Date(date) => *date,
            Deadline::Instant(instant) => instant.with_timezone(tz).date_naive(),
        }
    }

    /// Absolute instant of this deadline; dates count as their UTC midnight
    pub fn sort_key(&self) -> DateTime<Utc> {
        match self {
            Deadline::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
            Deadline::Instant(instant) => *instant,
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deadline::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Deadline::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
        }
    }
}

impl From<Deadline> for String {
    fn from(deadline: Deadline) -> Self {
        deadline.to_string()
    }
}

impl TryFrom<String> for Deadline {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Deadline::parse(&value).ok_or_else(|| format!("unparseable deadline: {value:?}"))
    }
}

/// A single listed program in its canonical in-memory shape
///
/// Serializes with the same field names [`OpportunityRow`] reads, so snapshots
/// written by this crate load back through the normal row path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub category: Category,
    /// `None` when the row had no deadline or it could not be parsed
    pub deadline: Option<Deadline>,
    pub description: String,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub is_paid: bool,
    pub mode: Option<Mode>,
    pub created_at: Option<DateTime<Utc>>,
    /// Application link; empty when the backend had none
    pub url: String,
    pub slug: Option<String>,
}

impl Opportunity {
    /// Slug for detail URLs, derived from the title when the row carried none
    pub fn effective_slug(&self) -> String {
        self.slug
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| crate::utils::slug_from_title(&self.title))
    }
}

/// Joined organization object (`organizations(name, ...)` selects)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrganizationRef {
    pub name: Option<String>,
}

/// A raw catalog row as produced by the backend, seed files, or snapshots
///
/// Every column is optional; [`Opportunity::try_from`] applies the fallbacks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct OpportunityRow {
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub organization_name: Option<String>,
    pub organizations: Option<OrganizationRef>,
    pub category: Option<String>,
    pub deadline: Option<String>,
    pub end_date: Option<String>,
    pub application_deadline: Option<String>,
    pub description: Option<String>,
    pub brief_overview: Option<String>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub is_paid: Option<bool>,
    pub isPaid: Option<bool>,
    pub cost_type: Option<String>,
    pub mode: Option<String>,
    pub created_at: Option<String>,
    pub createdAt: Option<String>,
    pub url: Option<String>,
    pub apply_link: Option<String>,
    pub application_link: Option<String>,
    pub slug: Option<String>,
}

fn first_non_empty(candidates: [Option<String>; 3]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

impl TryFrom<OpportunityRow> for Opportunity {
    type Error = Error;

    fn try_from(row: OpportunityRow) -> Result<Self> {
        let raw_category = row.category.unwrap_or_default();
        let category = Category::from_label(&raw_category)
            .ok_or_else(|| Error::UnknownCategory(raw_category.clone()))?;

        let id = match row.id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let raw_deadline = first_non_empty([row.deadline, row.end_date, row.application_deadline]);
        let deadline = raw_deadline.as_deref().and_then(Deadline::parse);
        if deadline.is_none()
            && let Some(raw) = &raw_deadline
        {
            tracing::debug!("Opportunity '{}' has unparseable deadline {:?}", id, raw);
        }

        let organization = first_non_empty([
            row.organizations.and_then(|o| o.name),
            row.organization_name,
            row.organization,
        ])
        .unwrap_or_default();

        let mode = row.mode.as_deref().and_then(|raw| {
            let mode = Mode::from_label(raw);
            if mode.is_none() {
                tracing::debug!("Opportunity '{}' has unknown mode {:?}", id, raw);
            }
            mode
        });

        let is_paid = row.is_paid.or(row.isPaid).unwrap_or_else(|| {
            row.cost_type
                .as_deref()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case("paid"))
        });

        let created_at = first_non_empty([row.created_at, row.createdAt, None])
            .and_then(|raw| Deadline::parse(&raw))
            .map(|d| d.sort_key());

        Ok(Opportunity {
            id,
            title: row.title.unwrap_or_default(),
            organization,
            category,
            deadline,
            description: first_non_empty([row.description, row.brief_overview, None])
                .unwrap_or_default(),
            tags: row.tags.unwrap_or_default(),
            location: row.location.filter(|l| !l.trim().is_empty()),
            is_paid,
            mode,
            created_at,
            url: first_non_empty([row.url, row.apply_link, row.application_link])
                .unwrap_or_default(),
            slug: row.slug.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Converts raw JSON rows into canonical opportunities.
///
/// Rows that are not objects of the expected shape, or whose category has no
/// canonical counterpart, are skipped with a warning; one bad row never fails
/// the whole batch.
pub fn normalize_rows(rows: Vec<serde_json::Value>) -> Vec<Opportunity> {
    let total = rows.len();
    let opportunities: Vec<Opportunity> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let row: OpportunityRow = match serde_json::from_value(value) {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping malformed catalog row #{}: {}", index, e);
                    return None;
                }
            };
            match Opportunity::try_from(row) {
                Ok(opportunity) => Some(opportunity),
                Err(e) => {
                    tracing::warn!("Skipping catalog row #{}: {}", index, e);
                    None
                }
            }
        })
        .collect();

    if opportunities.len() < total {
        tracing::info!(
            "Normalized {} of {} catalog rows",
            opportunities.len(),
            total
        );
    }
    opportunities
}
