use reedline::{Completer, Span, Suggestion};
use std::sync::{Arc, Mutex};
use vendor_desk::console::COMMAND_NAMES;
use vendor_desk::search::matcher::SearchMatcher;
use vendor_desk::search::sorter::RecordSorter;

/// Completes command names, then field names or strategy names
pub struct ShellCompleter {
    fields: Arc<Mutex<Vec<String>>>,
}

impl ShellCompleter {
    pub fn new(fields: Arc<Mutex<Vec<String>>>) -> Self {
        Self { fields }
    }

    fn candidates(&self, command: Option<&str>) -> Vec<String> {
        match command {
            None => COMMAND_NAMES.iter().map(|s| s.to_string()).collect(),
            Some("filter") | Some("sort") | Some("stats") => self
                .fields
                .lock()
                .map(|fields| fields.clone())
                .unwrap_or_default(),
            Some("matcher") => SearchMatcher::ALL.iter().map(|m| m.to_string()).collect(),
            Some("sorter") => RecordSorter::ALL.iter().map(|s| s.to_string()).collect(),
            Some(_) => Vec::new(),
        }
    }
}

impl Completer for ShellCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let input = &line[..pos];
        let words: Vec<&str> = input.split_whitespace().collect();
        let ends_with_space = input.ends_with(char::is_whitespace);

        let (command, partial) = match (words.as_slice(), ends_with_space) {
            ([], _) => (None, ""),
            ([word], false) => (None, *word),
            ([command], true) => (Some(*command), ""),
            ([command, word], false) => (Some(*command), *word),
            _ => return Vec::new(),
        };

        let start_pos = pos.saturating_sub(partial.len());
        let partial_lower = partial.to_lowercase();

        self.candidates(command)
            .into_iter()
            .filter(|candidate| candidate.to_lowercase().starts_with(&partial_lower))
            .map(|value| Suggestion {
                value,
                description: None,
                extra: None,
                span: Span {
                    start: start_pos,
                    end: pos,
                },
                style: None,
                append_whitespace: command.is_none(),
            })
            .collect()
    }
}
