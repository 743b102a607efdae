mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::{day, sample_entries, seeded_json_backend, temp_dir};
use wallet_core::{domain::LedgerEntry, source::LedgerSource};

fn wallet_cli(data_file: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("wallet_cli").unwrap();
    cmd.env("WALLET_CLI_SCRIPT", "1")
        .env("WALLET_CORE_HOME", temp_dir())
        .env("WALLET_CORE_DATA_FILE", data_file)
        .env_remove("WALLET_CORE_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_lists_a_month() {
    let backend = seeded_json_backend(&sample_entries());
    wallet_cli(backend.path())
        .write_stdin("load\nmonth 2024-05\nexit\n")
        .assert()
        .success()
        .stdout(contains("Loaded 3 entries"))
        .stdout(contains("2024년 5월 (2 entries)"))
        .stdout(contains("Bakery"))
        .stdout(contains("Market refund").not());
}

#[test]
fn script_mode_deletes_without_prompting() {
    let backend = seeded_json_backend(&sample_entries());
    wallet_cli(backend.path())
        .write_stdin("load\nall\ntoggle 1 3\ndelete\n")
        .assert()
        .success()
        .stdout(contains("2 selected"))
        .stdout(contains("2 entries deleted."));

    let left: Vec<LedgerEntry> = backend.fetch_all().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].date, day(2024, 5, 3));
}

#[test]
fn delete_with_nothing_selected_warns() {
    let backend = seeded_json_backend(&sample_entries());
    wallet_cli(backend.path())
        .write_stdin("load\ndelete\n")
        .assert()
        .success()
        .stdout(contains("No entries selected."));
    assert_eq!(backend.fetch_all().unwrap().len(), 3);
}

#[test]
fn category_tabs_and_totals() {
    let backend = seeded_json_backend(&sample_entries());
    wallet_cli(backend.path())
        .write_stdin("load\ntabs\ntab food\ntotals\n")
        .assert()
        .success()
        .stdout(contains("0:[All] 1:food 2:transport"))
        .stdout(contains("0:All 1:[food] 2:transport"))
        .stdout(contains("food (2 entries)"));
}

#[test]
fn show_prints_one_entry_with_its_memo() {
    let backend = seeded_json_backend(&sample_entries());
    wallet_cli(backend.path())
        .write_stdin("load\ntoggle 3\nshow 3\nshow 42\n")
        .assert()
        .success()
        .stdout(contains("Entry #3"))
        .stdout(contains("Date     : 2024년 6월 1일"))
        .stdout(contains("Income   : 2,000 원"))
        .stdout(contains("Memo     : returned melon"))
        .stdout(contains("Selected : yes"))
        .stdout(contains("No entry #42."));
}

#[test]
fn unknown_command_gets_a_suggestion() {
    let backend = seeded_json_backend(&sample_entries());
    wallet_cli(backend.path())
        .write_stdin("selectall\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `selectall`"))
        .stdout(contains("Suggestion: `select-all`?"));
}

#[test]
fn missing_data_file_loads_an_empty_ledger() {
    let path = temp_dir().join("absent.json");
    wallet_cli(&path)
        .write_stdin("load\nlist\n")
        .assert()
        .success()
        .stdout(contains("Loaded 0 entries"))
        .stdout(contains("No entries to show."));
}
