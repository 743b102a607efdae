mod common;

use std::collections::BTreeSet;

use common::{day, sample_entries, view_model};
use wallet_core::{
    cli::ui::ledger_view,
    core::{FilterMode, LoadStatus, Totals, TotalsScope},
    domain::{EntryId, LedgerEntry, Notice, Severity, YearMonth},
    errors::{DeleteError, FetchError},
    source::{LedgerSource, MemoryBackend},
};

fn ids(list: &[i64]) -> Vec<EntryId> {
    list.iter().copied().map(EntryId).collect()
}

fn loaded() -> (wallet_core::core::LedgerViewModel, MemoryBackend) {
    let source = MemoryBackend::new(sample_entries());
    let mut vm = view_model();
    vm.load_entries(&source).expect("load sample entries");
    (vm, source)
}

#[test]
fn worked_example_walkthrough() {
    let (mut vm, source) = loaded();

    vm.set_month(YearMonth::new(2024, 5));
    assert_eq!(vm.projection().ids(), ids(&[1, 2]));
    assert_eq!(
        vm.totals(TotalsScope::ActivePeriod),
        Totals { income: 0, expense: 1500 }
    );

    let food = vm.categories().iter().position(|c| c == "food").unwrap();
    vm.select_category_tab(food);
    assert_eq!(vm.projection().ids(), ids(&[1, 3]));
    assert_eq!(vm.totals(TotalsScope::Category).expense, 1000);

    vm.select_date(day(2024, 5, 3));
    assert_eq!(vm.projection().ids(), ids(&[1, 2]));
    assert!(vm.toggle_selection(EntryId(1)));
    let outcome = vm.delete_selected(&source).unwrap();
    assert_eq!(outcome.removed, BTreeSet::from([EntryId(1)]));
    assert!(!outcome.is_partial());

    let remaining: Vec<EntryId> = vm.entries().iter().map(|entry| entry.id).collect();
    assert_eq!(remaining, ids(&[2, 3]));
    assert!(vm.selection().is_empty());
    assert_eq!(vm.projection().ids(), ids(&[2]));
}

#[test]
fn all_scope_ignores_the_active_filter() {
    let (mut vm, _) = loaded();
    let expected = Totals { income: 2000, expense: 1500 };
    assert_eq!(vm.totals(TotalsScope::All), expected);
    vm.select_date(day(2024, 5, 3));
    assert_eq!(vm.totals(TotalsScope::All), expected);
    vm.select_category("transport");
    assert_eq!(vm.totals(TotalsScope::All), expected);
    vm.show_whole_year(1999);
    assert_eq!(vm.totals(TotalsScope::All), expected);
}

#[test]
fn first_tab_always_shows_everything() {
    let (mut vm, _) = loaded();
    vm.select_date(day(2024, 5, 3));
    vm.select_category_tab(0);
    assert_eq!(vm.projection().len(), vm.entries().len());
    assert_eq!(vm.selected_date(), None);
    assert_eq!(vm.mode(), &FilterMode::AllTime);
}

#[test]
fn date_selection_replaces_the_category_filter() {
    let (mut vm, _) = loaded();
    let food = vm.select_category("food").expect("food tab");
    assert_eq!(vm.active_category_index(), food);

    vm.select_date(day(2024, 5, 3));
    assert_eq!(vm.mode(), &FilterMode::ExactDate(day(2024, 5, 3)));
    assert_eq!(vm.active_category_index(), 0);
    assert!(ledger_view::tab_strip(&vm).starts_with("0:[All] "));
    assert_eq!(vm.projection().ids(), ids(&[1, 2]));

    vm.select_category_tab(food);
    assert_eq!(vm.selected_date(), None);
    assert_eq!(vm.mode(), &FilterMode::Category("food".into()));
    assert_eq!(ledger_view::tab_strip(&vm), "0:All 1:[food] 2:transport");
}

#[test]
fn select_all_twice_restores_previous_selection() {
    let (mut vm, _) = loaded();
    vm.toggle_selection(EntryId(3));
    let before = vm.selected_ids();

    vm.toggle_select_all();
    assert_eq!(vm.selected_ids(), ids(&[1, 2, 3]));
    vm.toggle_select_all();
    assert_eq!(vm.selected_ids(), before);
}

#[test]
fn select_all_with_everything_visible_selected_clears_the_whole_set() {
    let (mut vm, _) = loaded();
    vm.toggle_selection(EntryId(1));
    vm.toggle_selection(EntryId(2));
    vm.toggle_selection(EntryId(3));
    vm.toggle_select_all();
    assert!(vm.selection().is_empty());
}

#[test]
fn empty_day_is_distinct_from_unfiltered_view() {
    let (mut vm, _) = loaded();
    vm.select_date(day(2024, 5, 4));
    let projection = vm.projection();
    assert!(projection.is_empty());
    assert!(projection.is_filtered());
    assert_eq!(projection.mode(), &FilterMode::ExactDate(day(2024, 5, 4)));
    drop(projection);

    vm.clear_date_filter();
    assert_eq!(vm.projection().ids(), ids(&[1, 2]));
}

#[test]
fn month_navigation_rolls_over_years() {
    let (mut vm, _) = loaded();
    vm.set_month(YearMonth::new(2024, 1));
    vm.previous_month();
    assert_eq!(vm.active_month(), YearMonth::new(2023, 12));
    vm.next_month();
    vm.next_month();
    assert_eq!(vm.active_month(), YearMonth::new(2024, 2));
    vm.show_current_month();
    assert_eq!(vm.mode(), &FilterMode::Month(YearMonth::new(2024, 5)));
}

#[test]
fn date_selection_moves_the_month_cursor() {
    let (mut vm, _) = loaded();
    vm.select_date(day(2024, 6, 1));
    assert_eq!(vm.active_month(), YearMonth::new(2024, 6));
    assert_eq!(vm.totals(TotalsScope::ActivePeriod).income, 2000);
    vm.clear_date_filter();
    assert_eq!(vm.mode(), &FilterMode::Month(YearMonth::new(2024, 6)));
}

#[test]
fn whole_year_uses_active_month_year() {
    let (mut vm, _) = loaded();
    vm.show_active_year();
    assert_eq!(vm.mode(), &FilterMode::Year(2024));
    assert_eq!(vm.projection().len(), 3);
}

#[test]
fn selected_totals_count_expense_only() {
    let (mut vm, _) = loaded();
    vm.show_all();
    vm.toggle_select_all();
    assert_eq!(
        vm.totals(TotalsScope::Selected),
        Totals { income: 0, expense: 1500 }
    );
}

#[test]
fn selection_survives_filter_changes() {
    let (mut vm, _) = loaded();
    vm.toggle_selection(EntryId(1));
    vm.select_category("transport");
    vm.show_whole_year(2020);
    assert!(vm.is_selected(EntryId(1)));
}

#[test]
fn empty_selection_never_reaches_the_source() {
    let (mut vm, source) = loaded();
    let err = vm.delete_selected(&source).unwrap_err();
    assert!(matches!(err, DeleteError::NothingSelected));
    assert_eq!(source.delete_calls(), 0);
}

#[test]
fn rejected_delete_leaves_state_untouched() {
    let (mut vm, source) = loaded();
    source.reject_next_delete(Notice::error("삭제 권한이 없습니다."));
    vm.toggle_selection(EntryId(2));

    let err = vm.delete_selected(&source).unwrap_err();
    assert_eq!(err.notice().text, "삭제 권한이 없습니다.");
    assert_eq!(err.notice().severity, Severity::Error);
    assert_eq!(vm.entries().len(), 3);
    assert!(vm.is_selected(EntryId(2)));
}

#[test]
fn partial_delete_keeps_unremoved_ids_selected() {
    let (mut vm, source) = loaded();
    source.keep_on_delete([EntryId(2)]);
    vm.show_all();
    vm.toggle_select_all();

    let outcome = vm.delete_selected(&source).unwrap();
    assert!(outcome.is_partial());
    assert_eq!(outcome.removed, BTreeSet::from([EntryId(1), EntryId(3)]));
    assert_eq!(outcome.retained, BTreeSet::from([EntryId(2)]));
    assert_eq!(vm.selected_ids(), ids(&[2]));
    assert_eq!(vm.entries().len(), 1);
    assert_eq!(vm.totals(TotalsScope::All), Totals { income: 0, expense: 500 });
}

#[test]
fn failed_fetch_keeps_previous_entries() {
    let (mut vm, source) = loaded();
    vm.show_all();
    source.fail_next_fetch("connection reset");

    let err = vm.load_entries(&source).unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(err.notice(), Notice::fallback());
    assert_eq!(vm.entries().len(), 3);
    assert_eq!(vm.mode(), &FilterMode::AllTime);
}

#[test]
fn reload_drops_selection_of_vanished_entries() {
    let (mut vm, source) = loaded();
    vm.toggle_selection(EntryId(1));
    vm.toggle_selection(EntryId(3));
    source.replace(vec![LedgerEntry::new(3, day(2024, 6, 1), "food", "Market")]);

    assert_eq!(
        vm.load_entries(&source).unwrap(),
        LoadStatus::Applied { entries: 1 }
    );
    assert_eq!(vm.selected_ids(), ids(&[3]));
}

#[test]
fn load_started_before_a_delete_is_discarded() {
    let (mut vm, source) = loaded();
    let ticket = vm.begin_load();
    let snapshot = source.fetch_all();

    vm.toggle_selection(EntryId(1));
    vm.delete_selected(&source).unwrap();

    assert_eq!(vm.finish_load(ticket, snapshot).unwrap(), LoadStatus::Stale);
    assert!(vm.entry(EntryId(1)).is_none());
}

#[test]
fn stale_failure_is_not_reported() {
    let (mut vm, _) = loaded();
    let old = vm.begin_load();
    let _newer = vm.begin_load();
    let status = vm
        .finish_load(old, Err(FetchError::Transport("timeout".into())))
        .unwrap();
    assert_eq!(status, LoadStatus::Stale);
}

#[test]
fn breakdown_follows_tab_order() {
    let (mut vm, _) = loaded();
    vm.show_all();
    let rows = vm.category_breakdown();
    let names: Vec<&str> = rows.iter().map(|row| row.category.as_str()).collect();
    assert_eq!(names, vec!["food", "transport"]);
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].totals, Totals { income: 2000, expense: 1000 });
}

#[test]
fn unknown_category_name_is_rejected() {
    let (mut vm, _) = loaded();
    assert_eq!(vm.select_category("travel"), None);
    assert_eq!(vm.mode(), &FilterMode::Month(YearMonth::new(2024, 5)));
}
