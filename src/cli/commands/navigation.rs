use chrono::NaiveDate;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::ledger_view;
use crate::core::{LoadStatus, TotalsScope};
use crate::domain::{EntryId, YearMonth};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("load", "Fetch every entry from the source", "load", cmd_load),
        CommandEntry::new("list", "Show the entries in the current view", "list", cmd_list),
        CommandEntry::new("show", "Show every field of one entry", "show <id>", cmd_show),
        CommandEntry::new(
            "month",
            "Show one month (defaults to the active month)",
            "month [YYYY-MM]",
            cmd_month,
        ),
        CommandEntry::new("prev", "Show the previous month", "prev", cmd_prev),
        CommandEntry::new("next", "Show the next month", "next", cmd_next),
        CommandEntry::new(
            "this-month",
            "Jump back to the current month",
            "this-month",
            cmd_this_month,
        ),
        CommandEntry::new("date", "Show a single day", "date YYYY-MM-DD", cmd_date),
        CommandEntry::new(
            "clear-date",
            "Drop the date filter and show the active month",
            "clear-date",
            cmd_clear_date,
        ),
        CommandEntry::new(
            "year",
            "Show a whole year (defaults to the active month's year)",
            "year [YYYY]",
            cmd_year,
        ),
        CommandEntry::new("all", "Show every entry", "all", cmd_all),
        CommandEntry::new("tabs", "List category tabs", "tabs", cmd_tabs),
        CommandEntry::new(
            "tab",
            "Show one category tab by index or name",
            "tab <index|name>",
            cmd_tab,
        ),
    ]
}

fn cmd_load(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.view.load_entries(context.source.as_ref())? {
        LoadStatus::Applied { entries } => {
            io::print_success(format!(
                "Loaded {entries} entries from {}.",
                context.source.describe()
            ));
            print_view(context);
        }
        LoadStatus::Stale => io::print_warning("A newer load superseded this one."),
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_view(context);
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::usage("show <id>"));
    };
    let id: EntryId = raw
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not an entry id")))?;
    let Some(entry) = context.view.entry(id) else {
        return Err(CommandError::InvalidArguments(format!("No entry #{id}.")));
    };
    let selected = context.view.is_selected(id);
    output::section(format!("Entry #{id}"));
    for line in ledger_view::entry_detail(entry, selected, context.currency_suffix()) {
        output::line(line);
    }
    Ok(())
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => context.view.set_month(context.view.active_month()),
        [value] => {
            let month: YearMonth = value
                .parse()
                .map_err(|err| CommandError::InvalidArguments(format!("{err}")))?;
            context.view.set_month(month);
        }
        _ => return Err(CommandError::usage("month [YYYY-MM]")),
    }
    print_view(context);
    Ok(())
}

fn cmd_prev(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.previous_month();
    print_view(context);
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.next_month();
    print_view(context);
    Ok(())
}

fn cmd_this_month(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.show_current_month();
    print_view(context);
    Ok(())
}

fn cmd_date(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [value] = args else {
        return Err(CommandError::usage("date YYYY-MM-DD"));
    };
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{value}` is not a date (YYYY-MM-DD)"))
    })?;
    context.view.select_date(date);
    print_view(context);
    Ok(())
}

fn cmd_clear_date(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.clear_date_filter();
    print_view(context);
    Ok(())
}

fn cmd_year(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => context.view.show_active_year(),
        [value] => {
            let year: i32 = value.parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{value}` is not a year"))
            })?;
            context.view.show_whole_year(year);
        }
        _ => return Err(CommandError::usage("year [YYYY]")),
    }
    print_view(context);
    Ok(())
}

fn cmd_all(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.show_all();
    print_view(context);
    Ok(())
}

fn cmd_tabs(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::line(ledger_view::tab_strip(&context.view));
    Ok(())
}

fn cmd_tab(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage("tab <index|name>"));
    }
    let target = args.join(" ");
    match target.parse::<usize>() {
        Ok(index) => context.view.select_category_tab(index),
        Err(_) => {
            if context.view.select_category(&target).is_none() {
                return Err(CommandError::InvalidArguments(format!(
                    "No category tab named `{target}`. Use `tabs` to list them."
                )));
            }
        }
    }
    output::line(ledger_view::tab_strip(&context.view));
    print_view(context);
    Ok(())
}

/// Heading, entry table and the totals of the projection.
pub(crate) fn print_view(context: &ShellContext) {
    let suffix = context.currency_suffix();
    output::section(ledger_view::projection_heading(&context.view));
    if context.view.projection().is_empty() {
        io::print_info("No entries to show.");
    } else {
        output::line(ledger_view::entry_table(&context.view, suffix).render());
    }
    output::line(ledger_view::totals_line(
        "Shown",
        context.view.totals(TotalsScope::Projection),
        suffix,
    ));
}
