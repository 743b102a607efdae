//! Text renderings of the view model for the shell.

use crate::{
    core::{CategoryTotal, LedgerViewModel, Totals, TotalsScope},
    domain::LedgerEntry,
    utils::format,
};

use super::table_renderer::{display_width, Table, TableColumn};

const TITLE_WIDTH: usize = 24;
const MEMO_WIDTH: usize = 20;

/// One row per visible entry; `[x]` marks selected rows.
pub fn entry_table(view: &LedgerViewModel, suffix: &str) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left(""),
        TableColumn::right("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::left("Title").capped(TITLE_WIDTH),
        TableColumn::right("Income"),
        TableColumn::right("Expense"),
        TableColumn::left("Payment"),
        TableColumn::left("Memo").capped(MEMO_WIDTH),
    ]);
    for entry in view.projection().iter() {
        table.push(entry_row(entry, view.is_selected(entry.id), suffix));
    }
    table
}

fn entry_row(entry: &LedgerEntry, selected: bool, suffix: &str) -> Vec<String> {
    let amount = |value: u64| {
        if value == 0 {
            String::new()
        } else {
            format::amount(value, suffix)
        }
    };
    vec![
        if selected { "[x]" } else { "[ ]" }.to_string(),
        entry.id.to_string(),
        entry.date.format("%Y-%m-%d").to_string(),
        entry.category.clone(),
        entry.title.clone(),
        amount(entry.income),
        amount(entry.expense),
        entry.payment_method.clone(),
        entry.memo.clone().unwrap_or_default(),
    ]
}

/// Every field of one entry as `key : value` lines, memo included.
pub fn entry_detail(entry: &LedgerEntry, selected: bool, suffix: &str) -> Vec<String> {
    let blank_as_dash = |value: &str| {
        if value.trim().is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };
    let fields = [
        ("ID", entry.id.to_string()),
        ("Date", format::long_date(entry.date)),
        ("Category", entry.category.clone()),
        ("Title", entry.title.clone()),
        ("Income", format::amount(entry.income, suffix)),
        ("Expense", format::amount(entry.expense, suffix)),
        ("Payment", blank_as_dash(&entry.payment_method)),
        ("Memo", blank_as_dash(entry.memo.as_deref().unwrap_or_default())),
        ("Selected", if selected { "yes" } else { "no" }.to_string()),
    ];
    let key_width = fields
        .iter()
        .map(|(key, _)| display_width(key))
        .max()
        .unwrap_or(0);
    fields
        .into_iter()
        .map(|(key, value)| format!("{key:<key_width$} : {value}"))
        .collect()
}

/// Heading for the current projection, e.g. `2024년 5월 (2 entries)`.
pub fn projection_heading(view: &LedgerViewModel) -> String {
    let projection = view.projection();
    let caption = projection
        .caption()
        .unwrap_or_else(|| "All entries".to_string());
    format!("{caption} ({} entries)", projection.len())
}

pub fn totals_line(label: &str, totals: Totals, suffix: &str) -> String {
    format!(
        "{label:<14} income {}  expense {}  net {}",
        format::amount(totals.income, suffix),
        format::amount(totals.expense, suffix),
        signed_amount(totals.net(), suffix)
    )
}

fn signed_amount(value: i128, suffix: &str) -> String {
    let number = format::signed_with_commas(value);
    if suffix.is_empty() {
        number
    } else {
        format!("{number} {suffix}")
    }
}

/// Every totals scope the view model offers, labelled for display.
pub fn totals_report(view: &LedgerViewModel, suffix: &str) -> Vec<String> {
    let period = match view.selected_date() {
        Some(date) => format::long_date(date),
        None => view.active_month().label(),
    };
    let mut lines = vec![
        totals_line("All entries", view.totals(TotalsScope::All), suffix),
        totals_line(&period, view.totals(TotalsScope::ActivePeriod), suffix),
        totals_line("Shown", view.totals(TotalsScope::Projection), suffix),
    ];
    if let Some(category) = view.mode().category() {
        lines.push(totals_line(category, view.totals(TotalsScope::Category), suffix));
    }
    let selected = view.totals(TotalsScope::Selected);
    lines.push(format!(
        "{:<14} {} entries, expense {}",
        "Selected",
        view.selection().len(),
        format::amount(selected.expense, suffix)
    ));
    lines
}

pub fn breakdown_table(rows: &[CategoryTotal], suffix: &str) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Count"),
        TableColumn::right("Income"),
        TableColumn::right("Expense"),
    ]);
    for row in rows {
        table.push(vec![
            row.category.clone(),
            row.count.to_string(),
            format::amount(row.totals.income, suffix),
            format::amount(row.totals.expense, suffix),
        ]);
    }
    table
}

/// Category tabs with the active one bracketed: `0:[All] 1:food 2:transport`.
pub fn tab_strip(view: &LedgerViewModel) -> String {
    let active = view.active_category_index();
    view.categories()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == active {
                format!("{idx}:[{name}]")
            } else {
                format!("{idx}:{name}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
