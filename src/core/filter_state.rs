//! Filter state and its query-parameter representation
//!
//! [`FilterState`] is derived fresh from a flat string-keyed parameter map for
//! every view. Updates go the other way through [`serialize`], which only ever
//! produces a new map; pushing the result into navigation history is the
//! caller's job.
//!
//! A field holding its default value is never written: `category=all`,
//! `search=` and `expired=false` are all represented by the key being absent.
//! Two maps that parse to the same state therefore serialize to the same
//! minimal map.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::opportunity::{Category, Cost, Mode};

pub const KEY_CATEGORY: &str = "category";
pub const KEY_SEARCH: &str = "search";
pub const KEY_MODE: &str = "mode";
pub const KEY_COST: &str = "cost";
pub const KEY_EXPIRED: &str = "expired";

/// All keys owned by the filter state; any other key passes through untouched
pub const FILTER_KEYS: [&str; 5] = [KEY_CATEGORY, KEY_SEARCH, KEY_MODE, KEY_COST, KEY_EXPIRED];

/// Either every value, or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: Copy + PartialEq> Choice<T> {
    pub const fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn only(&self) -> Option<T> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(*value),
        }
    }

    /// `All` matches anything, including a missing value
    pub fn matches(&self, value: Option<T>) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => value == Some(*wanted),
        }
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Choice::All, Choice::Only)
    }
}

/// A flat string-keyed parameter map, as carried in a URL query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams(BTreeMap<String, String>);

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. When a key repeats, the first occurrence wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut map = BTreeMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            map.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self(map)
    }

    /// Encodes as a query string without the leading `?`; empty for an empty map
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set_or_remove(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.0.insert(key.to_string(), value.to_string());
            }
            None => {
                self.0.remove(key);
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// The active search/category/mode/cost/expired toggles of one catalog view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub category: Choice<Category>,
    pub search: String,
    pub mode: Choice<Mode>,
    pub cost: Choice<Cost>,
    pub show_expired: bool,
}

impl FilterState {
    /// Reads each field from its key, falling back to the field default when
    /// the key is absent or its value is not recognized.
    pub fn parse(params: &FilterParams) -> Self {
        Self {
            category: params
                .get(KEY_CATEGORY)
                .and_then(Category::from_label)
                .into(),
            search: params.get(KEY_SEARCH).unwrap_or_default().to_string(),
            mode: params.get(KEY_MODE).and_then(Mode::from_label).into(),
            cost: params
                .get(KEY_COST)
                .and_then(|raw| raw.trim().parse::<Cost>().ok())
                .into(),
            show_expired: params.get(KEY_EXPIRED) == Some("true"),
        }
    }

    /// Every field as an explicit update
    pub fn as_update(&self) -> FilterUpdate {
        FilterUpdate {
            category: Some(self.category),
            search: Some(self.search.clone()),
            mode: Some(self.mode),
            cost: Some(self.cost),
            show_expired: Some(self.show_expired),
        }
    }

    /// Minimal parameter map for this state
    pub fn to_params(&self) -> FilterParams {
        serialize(&FilterParams::new(), &self.as_update())
    }

    /// True when any field differs from its default
    pub fn has_active_filters(&self) -> bool {
        *self != Self::default()
    }
}

/// A partial [`FilterState`]: only `Some` fields are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub category: Option<Choice<Category>>,
    pub search: Option<String>,
    pub mode: Option<Choice<Mode>>,
    pub cost: Option<Choice<Cost>>,
    pub show_expired: Option<bool>,
}

impl FilterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Choice<Category>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn mode(mut self, mode: Choice<Mode>) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn cost(mut self, cost: Choice<Cost>) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn show_expired(mut self, show_expired: bool) -> Self {
        self.show_expired = Some(show_expired);
        self
    }
}

/// Applies `updates` to a copy of `current`.
///
/// Fields set to their default are removed; fields absent from `updates` and
/// keys the filter state does not own are left exactly as they were.
pub fn serialize(current: &FilterParams, updates: &FilterUpdate) -> FilterParams {
    let mut next = current.clone();

    if let Some(category) = updates.category {
        next.set_or_remove(KEY_CATEGORY, category.only().map(Category::as_str));
    }
    if let Some(search) = &updates.search {
        next.set_or_remove(KEY_SEARCH, Some(search.as_str()).filter(|s| !s.is_empty()));
    }
    if let Some(mode) = updates.mode {
        next.set_or_remove(KEY_MODE, mode.only().map(Mode::as_str));
    }
    if let Some(cost) = updates.cost {
        next.set_or_remove(KEY_COST, cost.only().map(Cost::as_str));
    }
    if let Some(show_expired) = updates.show_expired {
        next.set_or_remove(KEY_EXPIRED, show_expired.then_some("true"));
    }

    next
}

/// Flips the expired toggle relative to the state `current` parses to
pub fn toggle_expired(current: &FilterParams) -> FilterParams {
    let state = FilterState::parse(current);
    serialize(
        current,
        &FilterUpdate::new().show_expired(!state.show_expired),
    )
}

/// Drops every filter key, keeping unrelated parameters
pub fn reset(current: &FilterParams) -> FilterParams {
    serialize(current, &FilterState::default().as_update())
}

/// Canonical form of `params`: filter keys rewritten minimally, other keys kept
pub fn minimal_form(params: &FilterParams) -> FilterParams {
    let state = FilterState::parse(params);
    let mut base = params.clone();
    for key in FILTER_KEYS {
        base.set_or_remove(key, None);
    }
    serialize(&base, &state.as_update())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> FilterParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_parse_empty_gives_defaults() {
        let state = FilterState::parse(&FilterParams::new());
        assert_eq!(state, FilterState::default());
        assert_eq!(state.category, Choice::All);
        assert_eq!(state.search, "");
        assert!(!state.show_expired);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_parse_all_fields() {
        let state = FilterState::parse(&params(&[
            ("category", "internship"),
            ("search", "google"),
            ("mode", "On-site"),
            ("cost", "Paid"),
            ("expired", "true"),
        ]));
        assert_eq!(state.category, Choice::Only(Category::Internship));
        assert_eq!(state.search, "google");
        assert_eq!(state.mode, Choice::Only(Mode::OnSite));
        assert_eq!(state.cost, Choice::Only(Cost::Paid));
        assert!(state.show_expired);
        assert!(state.has_active_filters());
    }

    #[test]
    fn test_parse_unknown_values_fall_back() {
        let state = FilterState::parse(&params(&[
            ("category", "bootcamp"),
            ("mode", "teleport"),
            ("cost", "cheap"),
            ("expired", "yes"),
        ]));
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_parse_accepts_aliases() {
        let state = FilterState::parse(&params(&[
            ("category", "Coding Challenge"),
            ("mode", "online"),
            ("cost", "free"),
        ]));
        assert_eq!(state.category, Choice::Only(Category::Challenge));
        assert_eq!(state.mode, Choice::Only(Mode::Virtual));
        assert_eq!(state.cost, Choice::Only(Cost::Free));
    }

    #[test]
    fn test_serialize_applies_only_given_fields() {
        let current = params(&[("category", "hackathon"), ("page", "2")]);
        let next = serialize(&current, &FilterUpdate::new().search("ai"));
        assert_eq!(next.get("category"), Some("hackathon"));
        assert_eq!(next.get("search"), Some("ai"));
        assert_eq!(next.get("page"), Some("2"));
        // Input untouched
        assert_eq!(current.get("search"), None);
    }

    #[test]
    fn test_serialize_defaults_remove_keys() {
        let current = params(&[
            ("category", "hackathon"),
            ("search", "ai"),
            ("mode", "Hybrid"),
            ("cost", "Free"),
            ("expired", "true"),
        ]);
        let next = serialize(&current, &FilterState::default().as_update());
        assert!(next.is_empty());
    }

    #[test]
    fn test_serialize_writes_canonical_values() {
        let next = serialize(
            &FilterParams::new(),
            &FilterUpdate::new()
                .category(Choice::Only(Category::Research))
                .mode(Choice::Only(Mode::OnSite))
                .cost(Choice::Only(Cost::Paid))
                .show_expired(true),
        );
        assert_eq!(next.get("category"), Some("research"));
        assert_eq!(next.get("mode"), Some("On-site"));
        assert_eq!(next.get("cost"), Some("Paid"));
        assert_eq!(next.get("expired"), Some("true"));
    }

    #[test]
    fn test_equivalent_maps_serialize_identically() {
        let a = params(&[("category", "Hackathons"), ("expired", "false"), ("search", "")]);
        let b = params(&[("category", "hackathon")]);
        assert_eq!(FilterState::parse(&a), FilterState::parse(&b));
        assert_eq!(
            FilterState::parse(&a).to_params(),
            FilterState::parse(&b).to_params()
        );
        assert_eq!(minimal_form(&a), minimal_form(&b));
    }

    #[test]
    fn test_minimal_form_keeps_foreign_keys() {
        let m = params(&[("category", "nonsense"), ("ref", "newsletter")]);
        let minimal = minimal_form(&m);
        assert_eq!(minimal, params(&[("ref", "newsletter")]));
    }

    #[test]
    fn test_toggle_expired() {
        let on = toggle_expired(&FilterParams::new());
        assert_eq!(on.get("expired"), Some("true"));
        let off = toggle_expired(&on);
        assert!(off.is_empty());
    }

    #[test]
    fn test_reset_keeps_foreign_keys() {
        let current = params(&[("category", "research"), ("utm_source", "x")]);
        assert_eq!(reset(&current), params(&[("utm_source", "x")]));
    }

    #[test]
    fn test_query_round_trip() {
        let parsed = FilterParams::from_query("?category=internship&search=summer+camp&search=ignored");
        assert_eq!(parsed.get("search"), Some("summer camp"));
        assert_eq!(parsed.len(), 2);

        let query = parsed.to_query();
        assert_eq!(query, "category=internship&search=summer+camp");
        assert_eq!(FilterParams::from_query(&query), parsed);
    }

    #[test]
    fn test_query_empty() {
        assert!(FilterParams::from_query("").is_empty());
        assert_eq!(FilterParams::new().to_query(), "");
    }

    #[test]
    fn test_choice_matches() {
        assert!(Choice::<Mode>::All.matches(None));
        assert!(Choice::Only(Mode::Hybrid).matches(Some(Mode::Hybrid)));
        assert!(!Choice::Only(Mode::Hybrid).matches(None));
        assert!(!Choice::Only(Mode::Hybrid).matches(Some(Mode::Virtual)));
    }
}
