//! Catalog query and filter pipeline
//!
//! Filtering is a stable AND of independent predicates over an already
//! materialized list; it never reorders. Ordering is a separate step
//! ([`sort_closing_soon`], [`sort_newest`]) that callers compose explicitly.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::core::filter_state::{Choice, FilterState};
use crate::core::opportunity::{Category, Cost, Opportunity};
use crate::core::urgency::{Urgency, classify_optional};

/// Number of entries in the explore page's "closing soon" strip
pub const DEFAULT_CLOSING_SOON_LIMIT: usize = 5;

/// Number of entries in the explore page's "trending" lane
pub const TRENDING_LIMIT: usize = 5;

/// Case-insensitive substring match against title, organization and description.
/// An empty query matches everything.
pub fn matches_search(opportunity: &Opportunity, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        &opportunity.title,
        &opportunity.organization,
        &opportunity.description,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_cost(opportunity: &Opportunity, cost: Choice<Cost>) -> bool {
    match cost {
        Choice::All => true,
        Choice::Only(Cost::Paid) => opportunity.is_paid,
        Choice::Only(Cost::Free) => !opportunity.is_paid,
    }
}

/// Whether the opportunity's deadline is known and already past.
/// Unknown deadlines are never expired.
pub fn is_expired<Tz: TimeZone>(opportunity: &Opportunity, now: &DateTime<Tz>) -> bool {
    urgency_of(opportunity, now).is_expired()
}

pub fn urgency_of<Tz: TimeZone>(opportunity: &Opportunity, now: &DateTime<Tz>) -> Urgency {
    classify_optional(opportunity.deadline.as_ref(), now)
}

/// True when `opportunity` passes every predicate in `filters`
pub fn matches_filters<Tz: TimeZone>(
    opportunity: &Opportunity,
    filters: &FilterState,
    now: &DateTime<Tz>,
) -> bool {
    filters.category.matches(Some(opportunity.category))
        && filters.mode.matches(opportunity.mode)
        && matches_cost(opportunity, filters.cost)
        && (filters.show_expired || !is_expired(opportunity, now))
        && matches_search(opportunity, &filters.search)
}

/// Returns the items passing `filters`, in their original relative order.
pub fn apply_filters<'a, Tz: TimeZone>(
    items: &'a [Opportunity],
    filters: &FilterState,
    now: &DateTime<Tz>,
) -> Vec<&'a Opportunity> {
    items
        .iter()
        .filter(|opp| matches_filters(opp, filters, now))
        .collect()
}

/// Stable ascending sort by deadline day as seen from `tz`, the same day
/// urgency counts from. Same-day instants order by time; unknown deadlines go last.
pub fn sort_closing_soon<'a, Tz: TimeZone>(
    mut items: Vec<&'a Opportunity>,
    tz: &Tz,
) -> Vec<&'a Opportunity> {
    items.sort_by_key(|opp| {
        (
            opp.deadline.is_none(),
            opp.deadline.map(|d| (d.date_in(tz), d.sort_key())),
        )
    });
    items
}

/// Stable newest-first sort by `created_at`; rows without one go last.
pub fn sort_newest(mut items: Vec<&Opportunity>) -> Vec<&Opportunity> {
    items.sort_by_key(|opp| (opp.created_at.is_none(), opp.created_at.map(Reverse)));
    items
}

/// The next `limit` deadlines that have not passed yet
pub fn closing_soon<'a, Tz: TimeZone>(
    items: &'a [Opportunity],
    now: &DateTime<Tz>,
    limit: usize,
) -> Vec<&'a Opportunity> {
    let upcoming: Vec<&Opportunity> = items
        .iter()
        .filter(|opp| opp.deadline.is_some() && !is_expired(opp, now))
        .collect();
    let mut sorted = sort_closing_soon(upcoming, &now.timezone());
    sorted.truncate(limit);
    sorted
}

/// Buckets items by category, preserving input order inside each bucket
pub fn group_by_category<'a>(
    items: impl IntoIterator<Item = &'a Opportunity>,
) -> BTreeMap<Category, Vec<&'a Opportunity>> {
    let mut groups: BTreeMap<Category, Vec<&'a Opportunity>> = BTreeMap::new();
    for opp in items {
        groups.entry(opp.category).or_default().push(opp);
    }
    groups
}

pub fn find_by_id<'a>(items: &'a [Opportunity], id: &str) -> Option<&'a Opportunity> {
    items.iter().find(|opp| opp.id == id)
}

/// Looks up a detail page slug, falling back to slugs derived from titles
pub fn find_by_slug<'a>(items: &'a [Opportunity], slug: &str) -> Option<&'a Opportunity> {
    items
        .iter()
        .find(|opp| opp.slug.as_deref() == Some(slug))
        .or_else(|| items.iter().find(|opp| opp.effective_slug() == slug))
}

/// The explore home page
#[derive(Debug, Serialize)]
pub struct ExploreFeed<'a> {
    /// Newest open opportunity, shown as the hero
    pub featured: Option<&'a Opportunity>,
    /// Newest open opportunities, up to [`TRENDING_LIMIT`]
    pub trending: Vec<&'a Opportunity>,
    pub closing_soon: Vec<&'a Opportunity>,
    /// One lane per category, newest first
    pub swimlanes: BTreeMap<Category, Vec<&'a Opportunity>>,
}

/// Builds the explore feed from open (non-expired) opportunities only
pub fn explore_feed<'a, Tz: TimeZone>(
    items: &'a [Opportunity],
    now: &DateTime<Tz>,
    closing_soon_limit: usize,
) -> ExploreFeed<'a> {
    let open: Vec<&Opportunity> = items.iter().filter(|opp| !is_expired(opp, now)).collect();
    let newest = sort_newest(open);

    ExploreFeed {
        featured: newest.first().copied(),
        trending: newest.iter().take(TRENDING_LIMIT).copied().collect(),
        closing_soon: closing_soon(items, now, closing_soon_limit),
        swimlanes: group_by_category(newest),
    }
}
