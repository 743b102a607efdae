use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::TotalsScope;
use crate::domain::{Displayable, EntryId};
use crate::errors::DeleteError;
use crate::utils::format;

use super::navigation::print_view;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "toggle",
            "Check or uncheck entries by id",
            "toggle <id> [id...]",
            cmd_toggle,
        ),
        CommandEntry::new(
            "select-all",
            "Check every visible entry; repeat to undo",
            "select-all",
            cmd_select_all,
        ),
        CommandEntry::new(
            "selected",
            "Show checked entries and their expense",
            "selected",
            cmd_selected,
        ),
        CommandEntry::new(
            "delete",
            "Delete every checked entry in one request",
            "delete",
            cmd_delete,
        ),
    ]
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage("toggle <id> [id...]"));
    }
    let ids = args
        .iter()
        .map(|raw| {
            raw.parse::<EntryId>().map_err(|_| {
                CommandError::InvalidArguments(format!("`{raw}` is not an entry id"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for id in ids {
        if context.view.entry(id).is_none() {
            io::print_warning(format!("No entry #{id}; ignored."));
            continue;
        }
        let state = if context.view.toggle_selection(id) {
            "selected"
        } else {
            "unselected"
        };
        io::print_info(format!("#{id} {state}."));
    }
    print_selection_summary(context);
    Ok(())
}

fn cmd_select_all(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.toggle_select_all();
    print_selection_summary(context);
    Ok(())
}

fn cmd_selected(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ids = context.view.selected_ids();
    if ids.is_empty() {
        io::print_info("Nothing selected.");
        return Ok(());
    }
    output::section(format!("Selected ({})", ids.len()));
    for id in ids {
        if let Some(entry) = context.view.entry(id) {
            output::line(format!("  {}", entry.display_label()));
        }
    }
    print_selection_summary(context);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let count = context.view.selection().len();
    if count == 0 {
        return Err(DeleteError::NothingSelected.into());
    }
    if context.confirm_deletes() {
        let prompt = format!("Delete {count} selected entries?");
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Delete cancelled.");
            return Ok(());
        }
    }

    let outcome = context.view.delete_selected(context.source.as_ref())?;
    output::notice(&outcome.notice);
    if outcome.is_partial() {
        let kept: Vec<String> = outcome.retained.iter().map(|id| format!("#{id}")).collect();
        io::print_warning(format!(
            "Not deleted: {}. They remain selected.",
            kept.join(", ")
        ));
    }
    print_view(context);
    Ok(())
}

fn print_selection_summary(context: &ShellContext) {
    let totals = context.view.totals(TotalsScope::Selected);
    output::line(format!(
        "{} selected, expense {}",
        context.view.selection().len(),
        format::amount(totals.expense, context.currency_suffix())
    ));
}
