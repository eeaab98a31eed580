use crate::data::record::{FieldValue, Record};
use crate::state::events::StoreEvent;
use crate::state::notifier::{Notifier, Subscription};
use tracing::{debug, warn};

/// The canonical, mutable record collection.
///
/// Records are identified by the value of `id_field`, unique across the
/// collection. Lookups scan linearly; every mutation notifies subscribers
/// after it has been applied and before the call returns.
pub struct RecordStore {
    id_field: String,
    records: Vec<Record>,
    notifier: Notifier<StoreEvent>,
}

impl RecordStore {
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            records: Vec::new(),
            notifier: Notifier::new("RecordStore"),
        }
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&StoreEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.notifier.subscribe(observer)
    }

    /// Identity value of `record`, if it has a non-null one
    pub fn id_of<'a>(&self, record: &'a Record) -> Option<&'a FieldValue> {
        record.get(&self.id_field).filter(|id| !id.is_null())
    }

    fn position(&self, id: &FieldValue) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.get(&self.id_field) == Some(id))
    }

    /// Replace the whole collection.
    ///
    /// Records without an identity, or repeating one already seen, are skipped.
    pub fn set_all(&mut self, records: Vec<Record>) {
        let mut accepted: Vec<Record> = Vec::with_capacity(records.len());
        for record in records {
            let Some(id) = self.id_of(&record) else {
                warn!(target: "store", "Skipping record without '{}' field", self.id_field);
                continue;
            };
            if accepted.iter().any(|r| r.get(&self.id_field) == Some(id)) {
                warn!(target: "store", "Skipping duplicate record {}={}", self.id_field, id);
                continue;
            }
            accepted.push(record);
        }

        debug!(target: "store", "Loaded {} records", accepted.len());
        self.records = accepted;
        self.notifier.notify(&StoreEvent::DataLoaded {
            count: self.records.len(),
        });
    }

    /// Append a record; returns `false` if its identity is missing or taken
    pub fn add(&mut self, record: Record) -> bool {
        let index = self.records.len();
        self.insert_at(index, record)
    }

    /// Insert a record at `index` (clamped to the end)
    pub fn insert_at(&mut self, index: usize, record: Record) -> bool {
        let Some(id) = self.id_of(&record) else {
            warn!(target: "store", "Refusing record without '{}' field", self.id_field);
            return false;
        };
        if self.position(id).is_some() {
            warn!(target: "store", "Refusing duplicate record {}={}", self.id_field, id);
            return false;
        }

        let index = index.min(self.records.len());
        self.records.insert(index, record.clone());
        debug!(target: "store", "Added record at {}", index);
        self.notifier.notify(&StoreEvent::Added(record));
        true
    }

    /// Merge `changes` into the record with identity `id`.
    ///
    /// Returns the updated record, or `None` (and no notification) when absent.
    /// The identity field itself cannot be changed this way.
    pub fn update(&mut self, id: &FieldValue, changes: &Record) -> Option<Record> {
        let index = self.position(id)?;

        let mut changes = changes.clone();
        if let Some(new_id) = changes.remove(&self.id_field) {
            if &new_id != id {
                warn!(target: "store", "Ignoring attempt to change {} of {} to {}", self.id_field, id, new_id);
            }
        }

        let record = &mut self.records[index];
        record.merge(&changes);
        let updated = record.clone();

        self.notifier.notify(&StoreEvent::Updated {
            id: id.clone(),
            record: updated.clone(),
        });
        Some(updated)
    }

    /// Swap in `record` wholesale for the record sharing its identity
    pub fn replace(&mut self, record: Record) -> Option<Record> {
        let id = self.id_of(&record)?.clone();
        let index = self.position(&id)?;
        let previous = std::mem::replace(&mut self.records[index], record.clone());

        self.notifier.notify(&StoreEvent::Updated { id, record });
        Some(previous)
    }

    /// Remove and return the record with identity `id`
    pub fn delete(&mut self, id: &FieldValue) -> Option<Record> {
        self.delete_indexed(id).map(|(_, record)| record)
    }

    /// Like [`delete`](Self::delete) but also reports the former position
    pub fn delete_indexed(&mut self, id: &FieldValue) -> Option<(usize, Record)> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);

        debug!(target: "store", "Deleted record at {}", index);
        self.notifier.notify(&StoreEvent::Deleted(removed.clone()));
        Some((index, removed))
    }

    pub fn get(&self, id: &FieldValue) -> Option<&Record> {
        self.position(id).map(|index| &self.records[index])
    }

    /// Defensive copy of every record, in store order
    pub fn get_all(&self) -> Vec<Record> {
        self.records.clone()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new("id")
    }
}
