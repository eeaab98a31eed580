//! Reversible record mutations and the undo/redo history built on them

use crate::data::record::{FieldValue, Record};
use crate::data::record_store::RecordStore;
use tracing::{debug, info};

/// A reversible store mutation.
///
/// Each variant owns exactly the state it needs to reverse itself; the
/// snapshots are captured when the command executes.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordCommand {
    Add {
        record: Record,
        id: Option<FieldValue>,
    },
    Update {
        id: FieldValue,
        changes: Record,
        previous: Option<Record>,
    },
    Delete {
        id: FieldValue,
        removed: Option<(usize, Record)>,
    },
}

impl RecordCommand {
    pub fn add(record: Record) -> Self {
        RecordCommand::Add { record, id: None }
    }

    pub fn update(id: impl Into<FieldValue>, changes: Record) -> Self {
        RecordCommand::Update {
            id: id.into(),
            changes,
            previous: None,
        }
    }

    pub fn delete(id: impl Into<FieldValue>) -> Self {
        RecordCommand::Delete {
            id: id.into(),
            removed: None,
        }
    }

    /// Apply the mutation; returns `false` if the store was left unchanged
    pub fn execute(&mut self, store: &mut RecordStore) -> bool {
        match self {
            RecordCommand::Add { record, id } => {
                *id = store.id_of(record).cloned();
                store.add(record.clone())
            }
            RecordCommand::Update {
                id,
                changes,
                previous,
            } => {
                let Some(before) = store.get(id).cloned() else {
                    return false;
                };
                *previous = Some(before);
                store.update(id, changes).is_some()
            }
            RecordCommand::Delete { id, removed } => match store.delete_indexed(id) {
                Some(entry) => {
                    *removed = Some(entry);
                    true
                }
                None => false,
            },
        }
    }

    /// Reverse a previously executed mutation
    pub fn undo(&mut self, store: &mut RecordStore) -> bool {
        match self {
            RecordCommand::Add { id, .. } => match id {
                Some(id) => store.delete(id).is_some(),
                None => false,
            },
            RecordCommand::Update { previous, .. } => match previous.take() {
                Some(before) => store.replace(before).is_some(),
                None => false,
            },
            RecordCommand::Delete { removed, .. } => match removed.take() {
                Some((index, record)) => store.insert_at(index, record),
                None => false,
            },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RecordCommand::Add { id: Some(id), .. } => format!("add {}", id),
            RecordCommand::Add { id: None, .. } => "add record".to_string(),
            RecordCommand::Update { id, changes, .. } => {
                let fields: Vec<&str> = changes.field_names().map(|f| f.as_str()).collect();
                format!("update {} ({})", id, fields.join(", "))
            }
            RecordCommand::Delete { id, .. } => format!("delete {}", id),
        }
    }
}

/// Undo/redo stacks of executed commands
#[derive(Debug, Default)]
pub struct RecordHistory {
    undo_stack: Vec<RecordCommand>,
    redo_stack: Vec<RecordCommand>,
    max_depth: Option<usize>,
}

impl RecordHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_depth` undoable commands, dropping the oldest
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Self::default()
        }
    }

    /// Execute `command` against `store` and record it.
    ///
    /// The redo stack is emptied on every call. A command that leaves the
    /// store unchanged is not pushed onto the undo stack.
    pub fn execute_command(&mut self, mut command: RecordCommand, store: &mut RecordStore) -> bool {
        self.redo_stack.clear();

        if !command.execute(store) {
            debug!(target: "history", "Command '{}' did not apply", command.describe());
            return false;
        }

        info!(target: "history", "Executed '{}'", command.describe());
        self.push_undo(command);
        true
    }

    /// Undo the most recent command; `false` if there is nothing to undo
    pub fn undo(&mut self, store: &mut RecordStore) -> bool {
        let Some(mut command) = self.undo_stack.pop() else {
            return false;
        };
        command.undo(store);
        info!(target: "history", "Undid '{}'", command.describe());
        self.redo_stack.push(command);
        true
    }

    /// Re-apply the most recently undone command; `false` if there is none
    pub fn redo(&mut self, store: &mut RecordStore) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        command.execute(store);
        info!(target: "history", "Redid '{}'", command.describe());
        self.push_undo(command);
        true
    }

    fn push_undo(&mut self, command: RecordCommand) {
        self.undo_stack.push(command);
        if let Some(max) = self.max_depth {
            while self.undo_stack.len() > max {
                self.undo_stack.remove(0);
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the command `undo` would reverse
    pub fn peek_undo(&self) -> Option<String> {
        self.undo_stack.last().map(RecordCommand::describe)
    }

    pub fn peek_redo(&self) -> Option<String> {
        self.redo_stack.last().map(RecordCommand::describe)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
