//! Line commands understood by the interactive shell.
//!
//! Parsing and execution live here so the binary only deals with the line
//! editor and rendering.

use crate::config::config::Config;
use crate::data::recipients::Recipients;
use crate::data::record::Record;
use crate::data::record_exporter::export_to_file;
use crate::data::record_loader::{load_records, records_from_json};
use crate::data::record_stats::RecordStats;
use crate::search::matcher::SearchMatcher;
use crate::search::sorter::RecordSorter;
use crate::state::app_context::AppContext;
use crate::utils::logging::get_log_buffer;
use anyhow::{anyhow, bail, Context, Result};

pub const COMMAND_NAMES: &[&str] = &[
    "show", "filter", "clear", "sort", "unsort", "matcher", "sorter", "add", "update", "delete",
    "undo", "redo", "stats", "recipients", "load", "export", "log", "help", "quit",
];

const DEFAULT_LOG_LINES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Show,
    Filter { field: String, term: String },
    ClearFilters,
    Sort { field: String },
    Unsort,
    Matcher(SearchMatcher),
    Sorter(RecordSorter),
    Add(Record),
    Update { id: String, changes: Record },
    Delete { id: String },
    Undo,
    Redo,
    Stats { group: Option<String> },
    Recipients,
    Load { path: String },
    Export { path: String },
    Log { count: usize },
    Help,
    Quit,
}

/// What the shell should render after a command ran
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleOutcome {
    View,
    Message(String),
    Stats(RecordStats),
    Recipients(Recipients),
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "show" | "ls" => ConsoleCommand::Show,
            "filter" => {
                let (field, term) = split_word(rest).ok_or_else(|| anyhow!("Usage: filter <field> [term]"))?;
                ConsoleCommand::Filter {
                    field: field.to_string(),
                    term: term.to_string(),
                }
            }
            "clear" => ConsoleCommand::ClearFilters,
            "sort" => {
                if rest.is_empty() {
                    bail!("Usage: sort <field>");
                }
                ConsoleCommand::Sort {
                    field: rest.to_string(),
                }
            }
            "unsort" => ConsoleCommand::Unsort,
            "matcher" => ConsoleCommand::Matcher(rest.parse()?),
            "sorter" => ConsoleCommand::Sorter(rest.parse()?),
            "add" => ConsoleCommand::Add(parse_record(rest)?),
            "update" => {
                let (id, json) = split_word(rest).ok_or_else(|| anyhow!("Usage: update <id> <json>"))?;
                ConsoleCommand::Update {
                    id: id.to_string(),
                    changes: parse_record(json)?,
                }
            }
            "delete" | "rm" => {
                if rest.is_empty() {
                    bail!("Usage: delete <id>");
                }
                ConsoleCommand::Delete {
                    id: rest.to_string(),
                }
            }
            "undo" => ConsoleCommand::Undo,
            "redo" => ConsoleCommand::Redo,
            "stats" => ConsoleCommand::Stats {
                group: (!rest.is_empty()).then(|| rest.to_string()),
            },
            "recipients" => ConsoleCommand::Recipients,
            "load" => ConsoleCommand::Load {
                path: non_empty(rest, "Usage: load <file.json|file.csv>")?,
            },
            "export" => ConsoleCommand::Export {
                path: non_empty(rest, "Usage: export <file.json|file.csv>")?,
            },
            "log" => ConsoleCommand::Log {
                count: if rest.is_empty() {
                    DEFAULT_LOG_LINES
                } else {
                    rest.parse()
                        .with_context(|| format!("Invalid line count: {}", rest))?
                },
            },
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => bail!("Unknown command '{}' (try 'help')", other),
        };
        Ok(command)
    }

    pub fn execute(self, context: &mut AppContext, config: &Config) -> Result<ConsoleOutcome> {
        let outcome = match self {
            ConsoleCommand::Show => ConsoleOutcome::View,
            ConsoleCommand::Filter { field, term } => {
                context.set_filter(&field, &term);
                ConsoleOutcome::View
            }
            ConsoleCommand::ClearFilters => {
                context.clear_filters();
                ConsoleOutcome::View
            }
            ConsoleCommand::Sort { field } => {
                context.set_sort(&field);
                ConsoleOutcome::View
            }
            ConsoleCommand::Unsort => {
                context.clear_sort();
                ConsoleOutcome::View
            }
            ConsoleCommand::Matcher(matcher) => {
                context.set_matcher(matcher);
                ConsoleOutcome::View
            }
            ConsoleCommand::Sorter(sorter) => {
                context.set_sorter(sorter);
                ConsoleOutcome::View
            }
            ConsoleCommand::Add(record) => {
                if !context.add(record) {
                    bail!(
                        "Record rejected: '{}' missing or already used",
                        context.store().id_field()
                    );
                }
                ConsoleOutcome::View
            }
            ConsoleCommand::Update { id, changes } => {
                let id = context
                    .resolve_id(&id)
                    .ok_or_else(|| anyhow!("No record with id {}", id))?;
                context.update(id, changes);
                ConsoleOutcome::View
            }
            ConsoleCommand::Delete { id } => {
                let id = context
                    .resolve_id(&id)
                    .ok_or_else(|| anyhow!("No record with id {}", id))?;
                context.delete(id);
                ConsoleOutcome::View
            }
            ConsoleCommand::Undo => {
                if context.undo() {
                    ConsoleOutcome::View
                } else {
                    ConsoleOutcome::Message("Nothing to undo".to_string())
                }
            }
            ConsoleCommand::Redo => {
                if context.redo() {
                    ConsoleOutcome::View
                } else {
                    ConsoleOutcome::Message("Nothing to redo".to_string())
                }
            }
            ConsoleCommand::Stats { group } => ConsoleOutcome::Stats(RecordStats::compute(
                context.view().derived_view(),
                group.as_deref(),
            )),
            ConsoleCommand::Recipients => ConsoleOutcome::Recipients(Recipients::from_records(
                context.view().derived_view(),
                context.store().id_field(),
                &config.contacts.phone_field,
                &config.contacts.email_field,
            )),
            ConsoleCommand::Load { path } => {
                let records = load_records(&path)?;
                context.load(records);
                ConsoleOutcome::View
            }
            ConsoleCommand::Export { path } => {
                ConsoleOutcome::Message(export_to_file(context.view().derived_view(), &path)?)
            }
            ConsoleCommand::Log { count } => {
                let lines: Vec<String> = get_log_buffer()
                    .map(|buffer| buffer.get_recent(count))
                    .unwrap_or_default()
                    .iter()
                    .map(|entry| entry.format_for_display())
                    .collect();
                if lines.is_empty() {
                    ConsoleOutcome::Message("No log entries".to_string())
                } else {
                    ConsoleOutcome::Message(lines.join("\n"))
                }
            }
            ConsoleCommand::Help => ConsoleOutcome::Help,
            ConsoleCommand::Quit => ConsoleOutcome::Quit,
        };
        Ok(outcome)
    }
}

fn split_word(input: &str) -> Option<(&str, &str)> {
    if input.is_empty() {
        return None;
    }
    Some(match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    })
}

fn non_empty(input: &str, usage: &str) -> Result<String> {
    if input.is_empty() {
        bail!("{}", usage);
    }
    Ok(input.to_string())
}

fn parse_record(json: &str) -> Result<Record> {
    let value: serde_json::Value =
        serde_json::from_str(json).with_context(|| format!("Invalid JSON object: {}", json))?;
    let mut records = records_from_json(&serde_json::Value::Array(vec![value]))?;
    records.pop().ok_or_else(|| anyhow!("Expected one JSON object"))
}
