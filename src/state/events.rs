//! State events published by the record store and the record view

use crate::data::record::{FieldValue, Record};
use crate::search::sorter::SortSpec;
use std::collections::BTreeMap;

/// Events published by [`RecordStore`](crate::data::record_store::RecordStore)
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Whole collection replaced
    DataLoaded { count: usize },

    /// Record appended (or re-inserted by an undo)
    Added(Record),

    /// Record changed; carries the record as it is after the change
    Updated { id: FieldValue, record: Record },

    /// Record removed
    Deleted(Record),
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::DataLoaded { .. } => "dataLoaded",
            StoreEvent::Added(_) => "added",
            StoreEvent::Updated { .. } => "updated",
            StoreEvent::Deleted(_) => "deleted",
        }
    }
}

/// Events published by [`RecordView`](crate::data::record_view::RecordView)
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    DataChanged { total: usize, filtered: usize },
    FiltersChanged { filters: BTreeMap<String, String> },
    SortChanged { sort: Option<SortSpec> },
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::DataChanged { .. } => "dataChanged",
            ViewEvent::FiltersChanged { .. } => "filtersChanged",
            ViewEvent::SortChanged { .. } => "sortChanged",
        }
    }
}
