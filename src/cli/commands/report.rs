use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::ledger_view;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "totals",
            "Income and expense sums for every scope",
            "totals",
            cmd_totals,
        ),
        CommandEntry::new(
            "breakdown",
            "Per-category sums of the current view",
            "breakdown",
            cmd_breakdown,
        ),
    ]
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Totals");
    for line in ledger_view::totals_report(&context.view, context.currency_suffix()) {
        output::line(line);
    }
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rows = context.view.category_breakdown();
    output::section(format!(
        "By category: {}",
        ledger_view::projection_heading(&context.view)
    ));
    if rows.is_empty() {
        io::print_info("No entries to summarise.");
        return Ok(());
    }
    output::line(ledger_view::breakdown_table(&rows, context.currency_suffix()).render());
    Ok(())
}
