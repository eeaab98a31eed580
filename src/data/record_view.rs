use crate::data::record::Record;
use crate::search::matcher::SearchMatcher;
use crate::search::sorter::{RecordSorter, SortSpec};
use crate::state::events::ViewEvent;
use crate::state::notifier::{Notifier, Subscription};
use std::collections::BTreeMap;
use tracing::debug;

/// Reactive, derived projection of the record collection.
///
/// Holds its own copy of the raw records plus the active filters, sort,
/// matcher and sorter. Every change recomputes the derived sequence
/// synchronously: filter first (all filters must match), then sort.
pub struct RecordView {
    raw: Vec<Record>,
    derived: Vec<Record>,
    filters: BTreeMap<String, String>,
    sort: Option<SortSpec>,
    matcher: SearchMatcher,
    sorter: RecordSorter,
    notifier: Notifier<ViewEvent>,
}

impl RecordView {
    pub fn new(matcher: SearchMatcher, sorter: RecordSorter) -> Self {
        Self {
            raw: Vec::new(),
            derived: Vec::new(),
            filters: BTreeMap::new(),
            sort: None,
            matcher,
            sorter,
            notifier: Notifier::new("RecordView"),
        }
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&ViewEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.notifier.subscribe(observer)
    }

    pub fn set_data(&mut self, records: Vec<Record>) {
        self.raw = records;
        self.recompute();
        self.notifier.notify(&ViewEvent::DataChanged {
            total: self.total_count(),
            filtered: self.filtered_count(),
        });
    }

    /// Set the search term for `field`; an empty term removes the filter
    pub fn set_filter(&mut self, field: &str, term: &str) {
        if term.is_empty() {
            self.filters.remove(field);
        } else {
            self.filters.insert(field.to_string(), term.to_string());
        }
        self.recompute();
        self.notify_filters();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute();
        self.notify_filters();
    }

    /// Sort on `field`: toggles direction when already sorted on it,
    /// otherwise starts ascending
    pub fn set_sort(&mut self, field: &str) {
        self.sort = Some(SortSpec::select(self.sort.as_ref(), field));
        self.recompute();
        self.notify_sort();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.recompute();
        self.notify_sort();
    }

    pub fn set_matcher(&mut self, matcher: SearchMatcher) {
        self.matcher = matcher;
        self.recompute();
        self.notify_filters();
    }

    pub fn set_sorter(&mut self, sorter: RecordSorter) {
        self.sorter = sorter;
        self.recompute();
        self.notify_sort();
    }

    pub fn derived_view(&self) -> &[Record] {
        &self.derived
    }

    pub fn total_count(&self) -> usize {
        self.raw.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.derived.len()
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn matcher(&self) -> SearchMatcher {
        self.matcher
    }

    pub fn sorter(&self) -> RecordSorter {
        self.sorter
    }

    fn recompute(&mut self) {
        let prepared: Vec<_> = self
            .filters
            .iter()
            .map(|(field, term)| (field.as_str(), self.matcher.prepare(term)))
            .collect();

        let filtered: Vec<Record> = self
            .raw
            .iter()
            .filter(|record| {
                prepared
                    .iter()
                    .all(|(field, term)| term.matches(record.value(field)))
            })
            .cloned()
            .collect();

        self.derived = match &self.sort {
            Some(spec) => self.sorter.sort(&filtered, &spec.field, spec.direction),
            None => filtered,
        };

        debug!(
            target: "view",
            "Recomputed view: {}/{} records ({} filters, sort {:?})",
            self.derived.len(),
            self.raw.len(),
            self.filters.len(),
            self.sort
        );
    }

    fn notify_filters(&self) {
        self.notifier.notify(&ViewEvent::FiltersChanged {
            filters: self.filters.clone(),
        });
    }

    fn notify_sort(&self) {
        self.notifier.notify(&ViewEvent::SortChanged {
            sort: self.sort.clone(),
        });
    }
}

impl Default for RecordView {
    fn default() -> Self {
        Self::new(SearchMatcher::default(), RecordSorter::default())
    }
}
