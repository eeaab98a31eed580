#[cfg(test)]
mod record_view_tests {
    use vendor_desk::data::record::{FieldValue, Record};
    use vendor_desk::data::record_view::RecordView;
    use vendor_desk::record;
    use vendor_desk::search::matcher::SearchMatcher;
    use vendor_desk::search::sorter::{RecordSorter, SortDirection};
    use vendor_desk::state::events::ViewEvent;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    fn vendors() -> Vec<Record> {
        vec![
            record! { "id" => 1, "name" => "Northwind", "category" => "Food", "city" => "Seattle", "rating" => 4 },
            record! { "id" => 2, "name" => "Contoso", "category" => "Tech", "city" => "Redmond", "rating" => 5 },
            record! { "id" => 3, "name" => "Fabrikam", "category" => "Tech", "city" => "Seattle", "rating" => 3 },
            record! { "id" => 4, "name" => "Tailspin", "category" => "Toys", "city" => "Austin", "rating" => 4 },
            record! { "id" => 5, "name" => "Wingtip", "category" => "Toys", "city" => "Seattle" },
            record! { "id" => 6, "name" => "Adventure Works", "category" => "Food", "city" => "Denver", "rating" => 2 },
        ]
    }

    fn ids(records: &[Record]) -> Vec<String> {
        records.iter().map(|r| r.value("id").to_string()).collect()
    }

    /// Reference result: records passing every filter, in input order
    fn brute_force(records: &[Record], filters: &[(&str, &str)], matcher: SearchMatcher) -> Vec<Record> {
        records
            .iter()
            .filter(|r| filters.iter().all(|(f, t)| matcher.matches(r.value(f), t)))
            .cloned()
            .collect()
    }

    #[test]
    fn test_unsorted_view_is_conjunction_in_input_order() {
        let filter_sets: Vec<Vec<(&str, &str)>> = vec![
            vec![],
            vec![("city", "seattle")],
            vec![("city", "seattle"), ("category", "tech")],
            vec![("category", "o")],
            vec![("category", "o"), ("name", "w")],
            vec![("name", "zzz")],
            vec![("rating", "4"), ("city", "a")],
        ];

        for matcher in SearchMatcher::ALL {
            for filters in &filter_sets {
                let mut view = RecordView::new(matcher, RecordSorter::Alphabetic);
                view.set_data(vendors());
                for (field, term) in filters {
                    view.set_filter(field, term);
                }

                let expected = brute_force(&vendors(), filters, matcher);
                assert_eq!(
                    ids(view.derived_view()),
                    ids(&expected),
                    "matcher {} filters {:?}",
                    matcher,
                    filters
                );
            }
        }
    }

    #[test]
    fn test_view_is_subset_and_permutation_of_data() {
        let mut view = RecordView::default();
        view.set_data(vendors());
        view.set_filter("city", "e");
        view.set_sorter(RecordSorter::Numeric);
        view.set_sort("rating");

        let all_ids = ids(&vendors());
        let derived = ids(view.derived_view());
        for id in &derived {
            assert!(all_ids.contains(id));
        }
        let mut unique = derived.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), derived.len());
    }

    #[test]
    fn test_numeric_sort_is_stable_both_ways() {
        let mut view = RecordView::new(SearchMatcher::Partial, RecordSorter::Numeric);
        view.set_data(vendors());

        view.set_sort("rating");
        // Missing rating coerces to 0
        assert_eq!(ids(view.derived_view()), vec!["5", "6", "3", "1", "4", "2"]);

        view.set_sort("rating");
        assert_eq!(view.sort_spec().unwrap().direction, SortDirection::Descending);
        assert_eq!(ids(view.derived_view()), vec!["2", "1", "4", "3", "6", "5"]);
    }

    #[test]
    fn test_filter_then_sort_scenario() {
        let mut view = RecordView::default();
        view.set_data(vendors());
        view.set_filter("city", "Seattle");
        view.set_sort("name");

        let names: Vec<String> = view
            .derived_view()
            .iter()
            .map(|r| r.value("name").to_string())
            .collect();
        assert_eq!(names, vec!["Fabrikam", "Northwind", "Wingtip"]);
        assert_eq!(view.filtered_count(), 3);
        assert_eq!(view.total_count(), 6);
    }

    #[test]
    fn test_invalid_pattern_empties_view_without_error() {
        let mut view = RecordView::new(SearchMatcher::Pattern, RecordSorter::Alphabetic);
        view.set_data(vendors());

        view.set_filter("name", "(wind");
        assert!(view.derived_view().is_empty());

        view.set_filter("name", "wind$");
        assert_eq!(ids(view.derived_view()), vec!["1"]);
    }

    #[test]
    fn test_chronological_sort_on_dates() {
        let mut view = RecordView::new(SearchMatcher::Partial, RecordSorter::Chronological);
        view.set_data(vec![
            record! { "id" => 1, "since" => "2022-05-01" },
            record! { "id" => 2, "since" => "2020-01-31T12:00:00Z" },
            record! { "id" => 3 },
            record! { "id" => 4, "since" => "2021-11-11 09:30:00" },
        ]);

        view.set_sort("since");
        assert_eq!(ids(view.derived_view()), vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn test_chronological_view_mixes_dates_text_and_missing() {
        let opened = Utc.with_ymd_and_hms(2018, 3, 9, 0, 0, 0).unwrap();
        let audited = Utc.with_ymd_and_hms(2023, 8, 20, 14, 0, 0).unwrap();

        let mut view = RecordView::new(SearchMatcher::Partial, RecordSorter::Chronological);
        view.set_data(vec![
            record! { "id" => 1, "since" => audited, "city" => "Seattle" },
            record! { "id" => 2, "since" => "2020-05-05", "city" => "Seattle" },
            record! { "id" => 3, "city" => "Seattle" },
            record! { "id" => 4, "since" => opened, "city" => "Austin" },
            record! { "id" => 5, "since" => opened, "city" => "Seattle" },
        ]);

        view.set_sort("since");
        assert_eq!(ids(view.derived_view()), vec!["3", "4", "5", "2", "1"]);

        view.set_filter("city", "seattle");
        view.set_sort("since");
        assert_eq!(ids(view.derived_view()), vec!["1", "2", "5", "3"]);

        // Dates match on their RFC 3339 text
        view.set_filter("since", "2018-03-09");
        assert_eq!(ids(view.derived_view()), vec!["5"]);
    }

    #[test]
    fn test_observer_payloads() {
        let mut view = RecordView::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        view.subscribe(move |event: &ViewEvent| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        });

        view.set_data(vendors());
        view.set_filter("category", "toys");
        view.set_filter("category", "");

        let events = seen.lock().unwrap();
        assert_eq!(events[0], ViewEvent::DataChanged { total: 6, filtered: 6 });
        let mut expected = BTreeMap::new();
        expected.insert("category".to_string(), "toys".to_string());
        assert_eq!(events[1], ViewEvent::FiltersChanged { filters: expected });
        assert_eq!(events[2], ViewEvent::FiltersChanged { filters: BTreeMap::new() });
    }

    #[test]
    fn test_faulty_observer_does_not_break_view() {
        let mut view = RecordView::default();
        view.subscribe(|_: &ViewEvent| Err(anyhow::anyhow!("renderer offline")));
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        view.subscribe(move |_: &ViewEvent| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        view.set_data(vendors());
        view.set_sort("name");

        assert_eq!(*count.lock().unwrap(), 2);
        assert_eq!(view.derived_view()[0].value("name"), &FieldValue::from("Adventure Works"));
    }
}
