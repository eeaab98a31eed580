use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;
use vendor_desk::config::config::Config;
use vendor_desk::data::recipients::Recipients;
use vendor_desk::data::record_exporter::collect_headers;
use vendor_desk::data::record_stats::RecordStats;
use vendor_desk::data::record_view::RecordView;
use vendor_desk::search::sorter::SortDirection;

pub fn display_view(view: &RecordView, config: &Config) {
    let records = view.derived_view();
    if records.is_empty() {
        println!("{}", "No records match.".yellow());
        print_status(view);
        return;
    }

    let columns = if config.display.columns.is_empty() {
        collect_headers(records)
    } else {
        config.display.columns.clone()
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        columns
            .iter()
            .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for record in records.iter().take(config.display.max_rows) {
        table.add_row(
            columns
                .iter()
                .map(|c| record.value(c).to_string())
                .collect::<Vec<_>>(),
        );
    }

    println!("{table}");
    if records.len() > config.display.max_rows {
        println!(
            "{}",
            format!("... {} more not shown", records.len() - config.display.max_rows).dark_grey()
        );
    }
    print_status(view);
}

fn print_status(view: &RecordView) {
    let sort = match view.sort_spec() {
        Some(spec) => {
            let arrow = match spec.direction {
                SortDirection::Ascending => "asc",
                SortDirection::Descending => "desc",
            };
            format!("{} {} ({})", spec.field, arrow, view.sorter())
        }
        None => "none".to_string(),
    };
    let filters = if view.filters().is_empty() {
        "none".to_string()
    } else {
        view.filters()
            .iter()
            .map(|(field, term)| format!("{}~{}", field, term))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!(
        "{}",
        format!(
            "{} of {} records | filters: {} [{}] | sort: {}",
            view.filtered_count(),
            view.total_count(),
            filters,
            view.matcher(),
            sort
        )
        .green()
    );
}

pub fn display_stats(stats: &RecordStats) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("field").add_attribute(Attribute::Bold),
        Cell::new("filled").add_attribute(Attribute::Bold),
        Cell::new("missing").add_attribute(Attribute::Bold),
    ]);
    for field in stats.filled.keys() {
        table.add_row(vec![
            field.clone(),
            stats.filled_count(field).to_string(),
            stats.missing_count(field).to_string(),
        ]);
    }
    println!("{table}");

    if !stats.groups.is_empty() {
        let mut groups = Table::new();
        groups.set_header(vec![
            Cell::new("value").add_attribute(Attribute::Bold),
            Cell::new("count").add_attribute(Attribute::Bold),
        ]);
        for (value, count) in &stats.groups {
            groups.add_row(vec![value.clone(), count.to_string()]);
        }
        println!("{groups}");
    }
    println!("{}", format!("{} records", stats.total).green());
}

pub fn display_recipients(recipients: &Recipients) {
    if recipients.is_empty() {
        println!("{}", "No reachable recipients in the current view.".yellow());
    }
    println!("{}", "Phone recipients:".yellow());
    for recipient in &recipients.phones {
        println!("  {}  {}", recipient.id, recipient.address);
    }
    println!("{}", "Email recipients:".yellow());
    for recipient in &recipients.emails {
        println!("  {}  {}", recipient.id, recipient.address);
    }
    if !recipients.unreachable.is_empty() {
        let ids: Vec<String> = recipients.unreachable.iter().map(|id| id.to_string()).collect();
        println!("{}", format!("Unreachable: {}", ids.join(", ")).red());
    }
}
