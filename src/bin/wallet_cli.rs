use std::process;

use wallet_core::{cli::run_cli, init};

fn main() {
    init();
    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
