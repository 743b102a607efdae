use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

const SOURCE_KEYS: [&str; 4] = [
    "api_base_url",
    "api_token",
    "data_file",
    "request_timeout_secs",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(
            "config",
            "Show or change preferences",
            "config [show | [set] <key> <value>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        match context.command(&name) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(args[0]),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = match args.first() {
        None => return show_config(context),
        Some(first) if first.eq_ignore_ascii_case("show") => return show_config(context),
        Some(first) if first.eq_ignore_ascii_case("set") => &args[1..],
        Some(_) => args,
    };
    let [key, value @ ..] = args else {
        return Err(CommandError::usage("config [set] <key> <value>"));
    };
    let key = key.to_lowercase();
    context.config.set(&key, &value.join(" "))?;
    context.persist_config()?;
    if SOURCE_KEYS.contains(&key.as_str()) {
        context.reopen_source()?;
        io::print_info(format!("Source is now {}.", context.source.describe()));
    }
    io::print_success(format!("Updated `{key}`."));
    Ok(())
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {key:<22} {value}"));
    }
    io::print_info(format!(
        "  {:<22} {}",
        "file",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Wallet Core {}", meta.version));
    io::print_info(format!(
        "  Build hash : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at   : {}", meta.timestamp));
    io::print_info(format!("  Profile    : {}", meta.profile));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
