//! Validation for opportunity submissions
//!
//! Submitted opportunities enter the backend unverified and wait for
//! moderation. This module enforces the submit form's rules before anything
//! is handed over, and builds the row to insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{Error, Result};
use crate::core::opportunity::{Category, Deadline, Mode};

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_ORGANIZATION_CHARS: usize = 2;
pub const MAX_OVERVIEW_CHARS: usize = 200;

/// Form input as typed by a submitter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Submission {
    pub title: String,
    pub organization: String,
    pub application_link: String,
    pub category: String,
    pub mode: String,
    pub brief_overview: String,
    /// Optional; validated when present
    pub deadline: Option<String>,
}

/// A validated submission, shaped as the backend row to insert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOpportunity {
    pub id: Uuid,
    pub title: String,
    pub organization_name: String,
    pub apply_link: String,
    pub category: Category,
    pub mode: Mode,
    pub brief_overview: String,
    pub end_date: Option<Deadline>,
    pub slug: String,
    /// Always false: submissions wait for moderation
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Validates a title: trimmed, at least 5 characters.
///
/// # Errors
///
/// Returns `Err` if the trimmed title is shorter than [`MIN_TITLE_CHARS`].
pub fn validate_title(input: &str) -> Result<String> {
    let title = input.trim();
    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(Error::validation("title", "Title is too short"));
    }
    Ok(title.to_string())
}

/// # Errors
///
/// Returns `Err` if the trimmed name is shorter than [`MIN_ORGANIZATION_CHARS`].
pub fn validate_organization(input: &str) -> Result<String> {
    let organization = input.trim();
    if organization.chars().count() < MIN_ORGANIZATION_CHARS {
        return Err(Error::validation(
            "organization",
            "Organization name required",
        ));
    }
    Ok(organization.to_string())
}

/// Validates an application link: absolute `http` or `https` URL with a host.
///
/// # Errors
///
/// Returns `Err` for unparseable URLs, other schemes, or missing hosts.
pub fn validate_link(input: &str) -> Result<String> {
    let invalid = || Error::validation("application_link", "Invalid URL");

    let url = url::Url::parse(input.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url.to_string())
}

/// # Errors
///
/// Returns `Err` when empty or when the label has no canonical category.
pub fn validate_category(input: &str) -> Result<Category> {
    if input.trim().is_empty() {
        return Err(Error::validation("category", "Select a category"));
    }
    Category::from_label(input).ok_or_else(|| {
        Error::validation(
            "category",
            format!("Unknown category {:?}", input.trim()),
        )
    })
}

/// # Errors
///
/// Returns `Err` unless the mode is Virtual, Hybrid, or On-site (any known spelling).
pub fn validate_mode(input: &str) -> Result<Mode> {
    Mode::from_label(input)
        .ok_or_else(|| Error::validation("mode", "Mode must be Virtual, Hybrid, or On-site"))
}

/// # Errors
///
/// Returns `Err` if the trimmed overview exceeds [`MAX_OVERVIEW_CHARS`].
pub fn validate_overview(input: &str) -> Result<String> {
    let overview = input.trim();
    if overview.chars().count() > MAX_OVERVIEW_CHARS {
        return Err(Error::validation(
            "brief_overview",
            "Keep it under 200 characters",
        ));
    }
    Ok(overview.to_string())
}

/// # Errors
///
/// Returns `Err` if a non-empty deadline cannot be parsed.
pub fn validate_deadline(input: Option<&str>) -> Result<Option<Deadline>> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => Deadline::parse(raw)
            .map(Some)
            .ok_or_else(|| Error::validation("deadline", "Deadline must be a date (YYYY-MM-DD)")),
    }
}

impl Submission {
    /// Checks every field and collects all failures, in form order.
    pub fn errors(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        if let Err(e) = validate_title(&self.title) {
            errors.push(e);
        }
        if let Err(e) = validate_organization(&self.organization) {
            errors.push(e);
        }
        if let Err(e) = validate_link(&self.application_link) {
            errors.push(e);
        }
        if let Err(e) = validate_category(&self.category) {
            errors.push(e);
        }
        if let Err(e) = validate_mode(&self.mode) {
            errors.push(e);
        }
        if let Err(e) = validate_overview(&self.brief_overview) {
            errors.push(e);
        }
        if let Err(e) = validate_deadline(self.deadline.as_deref()) {
            errors.push(e);
        }
        errors
    }

    /// Validates and converts into the row to insert.
    ///
    /// # Errors
    ///
    /// Returns the first failing field's error.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<NewOpportunity> {
        let title = validate_title(&self.title)?;
        let slug = crate::utils::slug_from_title(&title);
        Ok(NewOpportunity {
            id: Uuid::new_v4(),
            organization_name: validate_organization(&self.organization)?,
            apply_link: validate_link(&self.application_link)?,
            category: validate_category(&self.category)?,
            mode: validate_mode(&self.mode)?,
            brief_overview: validate_overview(&self.brief_overview)?,
            end_date: validate_deadline(self.deadline.as_deref())?,
            title,
            slug,
            is_verified: false,
            created_at: now,
        })
    }
}
