#[cfg(test)]
mod scenarios {
    use crate::core::catalog::apply_filters;
    use crate::core::filter_state::{Choice, FilterState};
    use crate::core::opportunity::{Category, Opportunity};
    use crate::core::test_helpers::{now_at, opportunity_due_in};
    use chrono::{DateTime, Utc};

    fn catalog(now: &DateTime<Utc>, hackmit_days: i64) -> Vec<Opportunity> {
        let mut hackmit = opportunity_due_in("1", "HackMIT", Category::Hackathon, now, hackmit_days);
        hackmit.organization = "MIT".into();

        let mut step = opportunity_due_in("2", "Google STEP", Category::Internship, now, 30);
        step.organization = "Google".into();
        step.is_paid = true;

        vec![hackmit, step]
    }

    fn titles(items: &[&Opportunity]) -> Vec<String> {
        items.iter().map(|o| o.title.clone()).collect()
    }

    #[test]
    fn test_category_filter_selects_internship() {
        let now = now_at(2026, 3, 1, 10, 0);
        let items = catalog(&now, 2);
        let filters = FilterState {
            category: Choice::Only(Category::Internship),
            ..FilterState::default()
        };
        assert_eq!(titles(&apply_filters(&items, &filters, &now)), vec!["Google STEP"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_title() {
        let now = now_at(2026, 3, 1, 10, 0);
        let items = catalog(&now, 2);
        let filters = FilterState {
            search: "hack".into(),
            ..FilterState::default()
        };
        assert_eq!(titles(&apply_filters(&items, &filters, &now)), vec!["HackMIT"]);
    }

    #[test]
    fn test_expired_item_hidden_when_show_expired_off() {
        let now = now_at(2026, 3, 1, 10, 0);
        let items = catalog(&now, -1);
        let filters = FilterState {
            search: "hack".into(),
            ..FilterState::default()
        };
        assert!(apply_filters(&items, &filters, &now).is_empty());

        let all = apply_filters(&items, &FilterState::default(), &now);
        assert_eq!(titles(&all), vec!["Google STEP"]);
    }

    #[test]
    fn test_defaults_with_show_expired_return_everything_in_order() {
        let now = now_at(2026, 3, 1, 10, 0);
        let items = catalog(&now, -10);
        let filters = FilterState {
            show_expired: true,
            ..FilterState::default()
        };
        assert_eq!(
            titles(&apply_filters(&items, &filters, &now)),
            vec!["HackMIT", "Google STEP"]
        );
    }
}

#[cfg(test)]
mod property_tests {
    use crate::core::catalog::apply_filters;
    use crate::core::filter_state::{
        Choice, FILTER_KEYS, FilterParams, FilterState, minimal_form, serialize,
    };
    use crate::core::opportunity::{Category, Cost, Deadline, Mode, Opportunity};
    use crate::core::test_helpers::{now_at, opportunity};
    use crate::core::urgency::{UrgencyStatus, classify_urgency};
    use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
    use proptest::prelude::*;

    fn arb_category() -> impl Strategy<Value = Category> {
        prop_oneof![
            Just(Category::Hackathon),
            Just(Category::Internship),
            Just(Category::Research),
            Just(Category::Challenge),
        ]
    }

    fn arb_mode() -> impl Strategy<Value = Mode> {
        prop_oneof![Just(Mode::Virtual), Just(Mode::Hybrid), Just(Mode::OnSite)]
    }

    /// Values for filter keys: valid spellings mixed with garbage
    fn arb_param_value() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("all".to_string()),
            Just("hackathon".to_string()),
            Just("Coding Challenge".to_string()),
            Just("On-site".to_string()),
            Just("online".to_string()),
            Just("Paid".to_string()),
            Just("free".to_string()),
            Just("true".to_string()),
            Just("false".to_string()),
            Just(String::new()),
            "\\PC{0,12}",
        ]
    }

    prop_compose! {
        fn arb_params()(
            filter_pairs in proptest::collection::vec(
                (proptest::sample::select(FILTER_KEYS.to_vec()), arb_param_value()),
                0..8,
            ),
            extra_pairs in proptest::collection::vec(("[a-z_]{1,8}", "\\PC{0,8}"), 0..4),
        ) -> FilterParams {
            extra_pairs
                .into_iter()
                .chain(filter_pairs.into_iter().map(|(k, v)| (k.to_string(), v)))
                .collect()
        }
    }

    prop_compose! {
        fn arb_day()(offset in -400i64..400) -> NaiveDate {
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap() + TimeDelta::days(offset)
        }
    }

    prop_compose! {
        fn arb_opportunity()(
            id in "[0-9]{1,4}",
            title in "\\PC{0,16}",
            organization in "\\PC{0,12}",
            category in arb_category(),
            mode in proptest::option::of(arb_mode()),
            is_paid in any::<bool>(),
            deadline in proptest::option::of(arb_day()),
        ) -> Opportunity {
            let mut opp = opportunity(&id, &title, &organization, category);
            opp.mode = mode;
            opp.is_paid = is_paid;
            opp.deadline = deadline.map(Deadline::Date);
            opp
        }
    }

    prop_compose! {
        fn arb_filters()(
            category in proptest::option::of(arb_category()),
            search in prop_oneof![Just(String::new()), "[a-zA-Z]{1,3}"],
            mode in proptest::option::of(arb_mode()),
            cost in proptest::option::of(prop_oneof![Just(Cost::Free), Just(Cost::Paid)]),
            show_expired in any::<bool>(),
        ) -> FilterState {
            FilterState {
                category: category.into(),
                search,
                mode: mode.into(),
                cost: cost.into(),
                show_expired,
            }
        }
    }

    proptest! {
        #[test]
        fn test_parse_serialize_round_trip(params in arb_params()) {
            let state = FilterState::parse(&params);
            let serialized = serialize(&params, &state.as_update());
            prop_assert_eq!(FilterState::parse(&serialized), state);
        }

        #[test]
        fn test_serialize_of_parse_is_minimal_form(params in arb_params()) {
            let state = FilterState::parse(&params);
            prop_assert_eq!(serialize(&params, &state.as_update()), minimal_form(&params));
        }

        #[test]
        fn test_equal_states_have_equal_minimal_params(a in arb_params(), b in arb_params()) {
            if FilterState::parse(&a) == FilterState::parse(&b) {
                prop_assert_eq!(
                    FilterState::parse(&a).to_params(),
                    FilterState::parse(&b).to_params()
                );
            }
        }

        #[test]
        fn test_query_string_round_trip(params in arb_params()) {
            let decoded = FilterParams::from_query(&params.to_query());
            prop_assert_eq!(FilterState::parse(&decoded), FilterState::parse(&params));
        }

        #[test]
        fn test_serialize_never_mutates_input(params in arb_params(), filters in arb_filters()) {
            let before = params.clone();
            let _ = serialize(&params, &filters.as_update());
            prop_assert_eq!(params, before);
        }

        #[test]
        fn test_same_day_is_critical(hour in 0u32..24, minute in 0u32..60) {
            let now = Utc.with_ymd_and_hms(2026, 6, 15, hour, minute, 0).single().unwrap();
            let info = classify_urgency(&Deadline::Date(now.date_naive()), &now);
            prop_assert_eq!(info.days_remaining, 0);
            prop_assert_eq!(info.status, UrgencyStatus::Critical);
        }

        #[test]
        fn test_past_deadlines_are_critical(days_ago in 1i64..2000) {
            let now = now_at(2026, 6, 15, 12, 0);
            let deadline = Deadline::Date(now.date_naive() - TimeDelta::days(days_ago));
            let info = classify_urgency(&deadline, &now);
            prop_assert!(info.days_remaining < 0);
            prop_assert_eq!(info.status, UrgencyStatus::Critical);
        }

        #[test]
        fn test_tiers_are_monotonic(days in -30i64..60) {
            let now = now_at(2026, 6, 15, 12, 0);
            let info = classify_urgency(&Deadline::Date(now.date_naive() + TimeDelta::days(days)), &now);
            let expected = if days < 3 {
                UrgencyStatus::Critical
            } else if days < 7 {
                UrgencyStatus::ClosingSoon
            } else {
                UrgencyStatus::Open
            };
            prop_assert_eq!(info.days_remaining, days);
            prop_assert_eq!(info.status, expected);
        }

        #[test]
        fn test_apply_filters_is_idempotent(
            items in proptest::collection::vec(arb_opportunity(), 0..20),
            filters in arb_filters(),
        ) {
            let now = now_at(2026, 6, 15, 12, 0);
            let once: Vec<Opportunity> = apply_filters(&items, &filters, &now).into_iter().cloned().collect();
            let twice: Vec<Opportunity> = apply_filters(&once, &filters, &now).into_iter().cloned().collect();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_apply_filters_preserves_order(
            items in proptest::collection::vec(arb_opportunity(), 0..20),
            filters in arb_filters(),
        ) {
            let now = now_at(2026, 6, 15, 12, 0);
            let positions: Vec<usize> = apply_filters(&items, &filters, &now)
                .into_iter()
                .map(|kept| items.iter().position(|o| std::ptr::eq(o, kept)).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn test_default_filters_with_expired_keep_everything(
            items in proptest::collection::vec(arb_opportunity(), 0..20),
        ) {
            let now = now_at(2026, 6, 15, 12, 0);
            let filters = FilterState { show_expired: true, ..FilterState::default() };
            let kept = apply_filters(&items, &filters, &now);
            prop_assert_eq!(kept.len(), items.len());
        }

        #[test]
        fn test_category_filter_only_keeps_that_category(
            items in proptest::collection::vec(arb_opportunity(), 0..20),
            category in arb_category(),
        ) {
            let now = now_at(2026, 6, 15, 12, 0);
            let filters = FilterState {
                category: Choice::Only(category),
                show_expired: true,
                ..FilterState::default()
            };
            let kept = apply_filters(&items, &filters, &now);
            prop_assert!(kept.iter().all(|o| o.category == category));
            prop_assert_eq!(kept.len(), items.iter().filter(|o| o.category == category).count());
        }
    }
}
