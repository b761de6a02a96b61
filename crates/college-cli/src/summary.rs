use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use college_model::{MatchResult, MatchType};
use college_registry::LoadOutcome;
use college_report::{MatchSummary, UnmatchedEntry};

pub fn print_match_summary(summary: &MatchSummary) {
    println!(
        "Matched {} of {} names ({:.2}%)",
        summary.matched, summary.total, summary.match_rate
    );
    if let Some(tier) = summary.tier {
        println!("Quality: {tier}");
    }
    println!(
        "Average time per name: {:.1} us",
        summary.average_processing_micros
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Pass"),
        header_cell("Tier"),
        header_cell("Count"),
        header_cell("Share"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for pass in &summary.passes {
        let color = if pass.pass == MatchType::Unmatched.pass() {
            Color::Red
        } else {
            Color::Green
        };
        table.add_row(vec![
            Cell::new(pass.pass),
            Cell::new(&pass.label),
            count_cell(pass.count, color),
            Cell::new(format!("{:.2}%", pass.percentage)),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total).add_attribute(Attribute::Bold),
        dim_cell("100.00%"),
    ]);
    println!("{table}");
}

pub fn print_unmatched(entries: &[UnmatchedEntry]) {
    if entries.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("College name"),
        header_cell("State"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(&entry.state),
            count_cell(entry.count, Color::Yellow),
        ]);
    }
    println!();
    println!("Most frequent unmatched names:");
    println!("{table}");
}

pub fn print_resolution(name: &str, state: &str, result: &MatchResult) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let mut row = |label: &str, value: Cell| {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), value]);
    };
    row("Query", Cell::new(name));
    row("State", Cell::new(state));
    match result.college() {
        Some(college) => {
            row("College id", Cell::new(college.id()).fg(Color::Green));
            row("College name", Cell::new(college.canonical_name()));
            row("Matched name", Cell::new(result.matched_name()));
            row("Registry state", Cell::new(college.state()));
            row("Type", Cell::new(college.college_type()));
        }
        None => row(
            "College",
            Cell::new("no match")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        ),
    }
    row("Match type", Cell::new(result.match_type()));
    row("Method", Cell::new(result.method()));
    row("Confidence", Cell::new(format!("{:.4}", result.confidence())));
    row("Pass", Cell::new(result.pass()));
    println!("{table}");
}

pub fn print_registry(outcome: &LoadOutcome, show_skipped: bool) {
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_state: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &outcome.records {
        *by_type.entry(record.college_type().as_str()).or_default() += 1;
        *by_state.entry(record.normalized_state()).or_default() += 1;
    }

    println!("Records: {}", outcome.records.len());
    println!("Previous names: {}", outcome.previous_name_count());
    println!("Skipped rows: {}", outcome.skipped.len());

    let mut types = Table::new();
    types.set_header(vec![header_cell("Type"), header_cell("Colleges")]);
    apply_table_style(&mut types);
    align_column(&mut types, 1, CellAlignment::Right);
    for (college_type, count) in &by_type {
        types.add_row(vec![Cell::new(college_type), Cell::new(count)]);
    }
    println!("{types}");

    let mut states = Table::new();
    states.set_header(vec![header_cell("State"), header_cell("Colleges")]);
    apply_table_style(&mut states);
    align_column(&mut states, 1, CellAlignment::Right);
    for (state, count) in &by_state {
        states.add_row(vec![Cell::new(state), Cell::new(count)]);
    }
    println!("{states}");

    if show_skipped && !outcome.skipped.is_empty() {
        let mut skipped = Table::new();
        skipped.set_header(vec![header_cell("Row"), header_cell("Reason")]);
        apply_table_style(&mut skipped);
        align_column(&mut skipped, 0, CellAlignment::Right);
        for entry in &outcome.skipped {
            skipped.add_row(vec![
                Cell::new(entry.row),
                Cell::new(&entry.reason).fg(Color::Yellow),
            ]);
        }
        println!("{skipped}");
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: u64, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
