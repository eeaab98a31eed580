//! The application context: one store, one view and one history wired together.
//!
//! Every store mutation made through the context is followed by a view
//! refresh before the call returns, so the derived view is never stale.

use crate::config::config::Config;
use crate::data::record::{FieldValue, Record};
use crate::data::record_store::RecordStore;
use crate::data::record_view::RecordView;
use crate::search::matcher::SearchMatcher;
use crate::search::sorter::RecordSorter;
use crate::state::history::{RecordCommand, RecordHistory};
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info};

static APP_CONTEXT: OnceLock<Mutex<AppContext>> = OnceLock::new();

pub struct AppContext {
    store: RecordStore,
    view: RecordView,
    history: RecordHistory,
}

impl AppContext {
    pub fn new(config: &Config) -> Self {
        let history = match config.history.max_depth {
            0 => RecordHistory::new(),
            depth => RecordHistory::with_max_depth(depth),
        };

        Self {
            store: RecordStore::new(config.store.id_field.clone()),
            view: RecordView::new(config.search.matcher, config.search.sorter),
            history,
        }
    }

    /// The process-wide context, created on first call.
    ///
    /// Later calls return the existing instance and ignore `config`.
    pub fn get_or_create(config: &Config) -> &'static Mutex<AppContext> {
        let mut created = false;
        let context = APP_CONTEXT.get_or_init(|| {
            created = true;
            Mutex::new(AppContext::new(config))
        });
        if created {
            info!(target: "context", "Application context created (id field '{}')", config.store.id_field);
        } else {
            debug!(target: "context", "Application context already exists; ignoring new config");
        }
        context
    }

    /// The process-wide context if [`get_or_create`](Self::get_or_create) ran
    pub fn get() -> Option<&'static Mutex<AppContext>> {
        APP_CONTEXT.get()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn view(&self) -> &RecordView {
        &self.view
    }

    pub fn history(&self) -> &RecordHistory {
        &self.history
    }

    /// Replace the record set with freshly loaded data; clears history
    pub fn load(&mut self, records: Vec<Record>) {
        self.store.set_all(records);
        self.history.clear();
        self.sync_view();
    }

    pub fn execute(&mut self, command: RecordCommand) -> bool {
        let applied = self.history.execute_command(command, &mut self.store);
        if applied {
            self.sync_view();
        }
        applied
    }

    pub fn add(&mut self, record: Record) -> bool {
        self.execute(RecordCommand::add(record))
    }

    pub fn update(&mut self, id: impl Into<FieldValue>, changes: Record) -> bool {
        self.execute(RecordCommand::update(id, changes))
    }

    pub fn delete(&mut self, id: impl Into<FieldValue>) -> bool {
        self.execute(RecordCommand::delete(id))
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.store);
        if undone {
            self.sync_view();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.store);
        if redone {
            self.sync_view();
        }
        redone
    }

    pub fn set_filter(&mut self, field: &str, term: &str) {
        self.view.set_filter(field, term);
    }

    pub fn clear_filters(&mut self) {
        self.view.clear_filters();
    }

    pub fn set_sort(&mut self, field: &str) {
        self.view.set_sort(field);
    }

    pub fn clear_sort(&mut self) {
        self.view.clear_sort();
    }

    pub fn set_matcher(&mut self, matcher: SearchMatcher) {
        self.view.set_matcher(matcher);
    }

    pub fn set_sorter(&mut self, sorter: RecordSorter) {
        self.view.set_sorter(sorter);
    }

    /// Resolve a typed-in identity: numeric text matches a numeric id
    pub fn resolve_id(&self, raw: &str) -> Option<FieldValue> {
        let as_text = FieldValue::from(raw);
        if self.store.get(&as_text).is_some() {
            return Some(as_text);
        }
        let inferred = FieldValue::infer_from_str(raw);
        self.store.get(&inferred).map(|_| inferred)
    }

    fn sync_view(&mut self) {
        self.view.set_data(self.store.get_all());
    }
}
