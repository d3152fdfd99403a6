use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pharm_core::{MergeStats, RegistrySummary};
use pharm_report::{Manifest, Token};

use crate::types::{ShortageRun, SupplyRun};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn print_fetch_hint(token: Token, name: &str) {
    println!("Fetch: pharm artifacts fetch {token} '{name}'");
}

pub fn print_supply(run: &SupplyRun) {
    println!("Report: {} ({})", run.kind, run.report_date);
    if run.files.is_empty() {
        println!("No rows with supply kind 1 (출고) or 2 (반품); no workbook written.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Direction"),
        header_cell("Rows"),
        header_cell("Template"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for file in &run.files {
        let template = if file.from_template {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&file.file_name),
            Cell::new(file.direction.label()),
            Cell::new(file.rows),
            template,
        ]);
    }
    println!("{table}");

    if let Some(token) = run.token {
        println!("Token: {token}");
        if let Some(file) = run.files.first() {
            print_fetch_hint(token, &file.file_name);
        }
    }
    print_copied(run.copied_to.as_deref());
}

pub fn print_shortage(run: &ShortageRun) {
    let stats = &run.stats;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Center"), header_cell("Requests")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (center, rows) in &run.centers {
        table.add_row(vec![Cell::new(center), Cell::new(rows)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stats.requests).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut totals = Table::new();
    totals.set_header(vec![
        header_cell("Stock rows"),
        header_cell("Requested drugs"),
        header_cell("Matched"),
        header_cell("Not in stock"),
        header_cell("Max drugs/row"),
    ]);
    apply_table_style(&mut totals);
    totals.add_row(vec![
        Cell::new(stats.stock_records),
        Cell::new(stats.requested_drugs),
        count_cell(stats.matched, Color::Green),
        count_cell(stats.misses(), Color::Yellow),
        Cell::new(run.max_slots),
    ]);
    println!("{totals}");

    println!("Workbook: {}", run.file_name);
    println!("Token: {}", run.token);
    print_fetch_hint(run.token, &run.file_name);
    if let Some(path) = &run.preview {
        println!("Preview: {}", path.display());
    }
    print_copied(run.copied_to.as_deref());
}

fn print_copied(dir: Option<&Path>) {
    if let Some(dir) = dir {
        println!("Copied to: {}", dir.display());
    }
}

pub fn print_registry(summary: &RegistrySummary, merge: Option<&MergeStats>) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Registered pharmacies"), Cell::new(summary.total)]);
    match &summary.latest {
        Some(entry) => table.add_row(vec![
            Cell::new("Latest"),
            Cell::new(format!("{} ({})", entry.business_number, entry.pharmacy_name)),
        ]),
        None => table.add_row(vec![Cell::new("Latest"), dim_cell("-")]),
    };
    if let Some(stats) = merge {
        table.add_row(vec![Cell::new("Submitted"), Cell::new(stats.submitted)]);
        table.add_row(vec![
            Cell::new("Replaced"),
            count_cell(stats.replaced, Color::Yellow),
        ]);
    }
    println!("{table}");
}

pub fn print_artifacts(manifests: &[Manifest]) {
    if manifests.is_empty() {
        println!("No stored submissions.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Token"),
        header_cell("Kind"),
        header_cell("Created"),
        header_cell("Files"),
    ]);
    apply_table_style(&mut table);
    for manifest in manifests {
        let files: Vec<&str> = manifest.files.iter().map(|f| f.name.as_str()).collect();
        table.add_row(vec![
            Cell::new(manifest.token),
            Cell::new(&manifest.kind),
            Cell::new(manifest.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
            Cell::new(files.join("\n")),
        ]);
    }
    println!("{table}");
}
