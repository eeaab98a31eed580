use crossterm::style::Stylize;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers,
    MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline,
    ReedlineEvent, ReedlineMenu, Signal,
};
use std::borrow::Cow;
use std::sync::{Arc, Mutex, PoisonError};
use vendor_desk::config::config::Config;
use vendor_desk::console::{ConsoleCommand, ConsoleOutcome};
use vendor_desk::data::record_exporter::collect_headers;
use vendor_desk::data::record_loader::load_records;
use vendor_desk::state::app_context::AppContext;
use vendor_desk::state::events::StoreEvent;
use vendor_desk::utils::app_paths::AppPaths;

mod completer;
mod table_display;

use completer::ShellCompleter;
use table_display::{display_recipients, display_stats, display_view};

struct ShellPrompt;

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed("vendors> ")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Normal => "N ".into(),
                reedline::PromptViMode::Insert => "I ".into(),
            },
            PromptEditMode::Custom(str) => format!("{str} ").into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}

fn print_help() {
    println!("{}", "Vendor Desk - record search, sort and editing".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  vendor-desk [OPTIONS] [FILE.json|FILE.csv]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {} - Generate config file with defaults",
        "--generate-config".green()
    );
    println!("  {}             - Echo logs to stderr", "--log".green());
    println!();
    println!("{}", "Commands:".yellow());
    println!("  {}                 - Show the current view", "show".green());
    println!("  {}  - Filter a field (empty term removes it)", "filter <field> [term]".green());
    println!("  {}                - Remove all filters", "clear".green());
    println!("  {}         - Sort; repeat to reverse", "sort <field>".green());
    println!("  {}               - Remove the sort", "unsort".green());
    println!(
        "  {}       - exact | partial | case_insensitive | pattern",
        "matcher <kind>".green()
    );
    println!(
        "  {}        - alphabetic | numeric | chronological",
        "sorter <kind>".green()
    );
    println!("  {}           - Add a record", "add <json>".green());
    println!("  {}   - Merge fields into a record", "update <id> <json>".green());
    println!("  {}          - Delete a record", "delete <id>".green());
    println!("  {}          - Undo / redo an edit", "undo | redo".green());
    println!("  {}     - Field fill rates, grouped counts", "stats [field]".green());
    println!("  {}           - Reachable phones and emails", "recipients".green());
    println!("  {}    - Replace data from a file", "load <file>".green());
    println!("  {}  - Write the view to CSV or JSON", "export <file>".green());
    println!("  {}            - Recent log entries", "log [n]".green());
    println!("  {}                 - Exit", "quit".green());
    println!();
}

fn generate_config() -> anyhow::Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, Config::create_default_with_comments())?;
    println!("Configuration file created at: {:?}", path);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.contains(&"--generate-config".to_string()) {
        if let Err(e) = generate_config() {
            eprintln!("Error writing config file: {:#}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    vendor_desk::utils::logging::init_tracing(args.contains(&"--log".to_string()));

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{}", format!("Using default config: {:#}", e).yellow());
        Config::default()
    });

    let data_file = args
        .iter()
        .skip(1)
        .filter(|arg| !arg.starts_with("--"))
        .find(|arg| arg.ends_with(".csv") || arg.ends_with(".json"))
        .cloned();

    let context = AppContext::get_or_create(&config);
    let fields = Arc::new(Mutex::new(Vec::<String>::new()));

    {
        let mut ctx = context.lock().unwrap_or_else(PoisonError::into_inner);

        ctx.store().subscribe(|event: &StoreEvent| {
            let line = match event {
                StoreEvent::DataLoaded { count } => format!("loaded {} records", count),
                StoreEvent::Added(_) => "record added".to_string(),
                StoreEvent::Updated { id, .. } => format!("record {} updated", id),
                StoreEvent::Deleted(_) => "record removed".to_string(),
            };
            println!("{}", line.dark_grey());
            Ok(())
        });

        if let Some(path) = &data_file {
            match load_records(path) {
                Ok(records) => ctx.load(records),
                Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
            }
        }

        *fields.lock().unwrap_or_else(PoisonError::into_inner) =
            collect_headers(ctx.store().records());
        display_view(ctx.view(), &config);
    }

    let history_file = AppPaths::history_file()?;
    let history = Box::new(FileBackedHistory::with_file(200, history_file)?);

    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name("completion")
            .with_columns(4)
            .with_column_width(None)
            .with_column_padding(2),
    );

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Menu("completion".to_string()),
    );

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(ShellCompleter::new(fields.clone())))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_history(history)
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let prompt = ShellPrompt;

    loop {
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                if buffer.trim().is_empty() {
                    continue;
                }

                let command = match ConsoleCommand::parse(&buffer) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", format!("{:#}", e).red());
                        continue;
                    }
                };

                let mut ctx = context.lock().unwrap_or_else(PoisonError::into_inner);
                match command.execute(&mut ctx, &config) {
                    Ok(ConsoleOutcome::View) => display_view(ctx.view(), &config),
                    Ok(ConsoleOutcome::Message(message)) => println!("{}", message.cyan()),
                    Ok(ConsoleOutcome::Stats(stats)) => display_stats(&stats),
                    Ok(ConsoleOutcome::Recipients(recipients)) => display_recipients(&recipients),
                    Ok(ConsoleOutcome::Help) => print_help(),
                    Ok(ConsoleOutcome::Quit) => break,
                    Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
                }

                *fields.lock().unwrap_or_else(PoisonError::into_inner) =
                    collect_headers(ctx.store().records());
            }
            Signal::CtrlD | Signal::CtrlC => break,
        }
    }

    println!("\nGoodbye!");
    Ok(())
}
