//! Shell context construction, dispatch, and error reporting.

use std::io;

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::{Config, ConfigManager},
    core::LedgerViewModel,
    errors::{ConfigError, DeleteError, FetchError},
    source::LedgerSource,
};

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Builds a context from `$WALLET_CORE_HOME` and the environment overrides.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::from_env()?;
        let mut config = config_manager.load()?;
        config.apply_env_overrides();
        let source = config.open_source()?;
        Ok(Self::with_parts(
            mode,
            config,
            config_manager,
            source,
            LedgerViewModel::default(),
        ))
    }

    pub fn with_parts(
        mode: CliMode,
        config: Config,
        config_manager: ConfigManager,
        source: Box<dyn LedgerSource>,
        view: LedgerViewModel,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        apply_output_preferences(mode, &config);
        debug!(source = %source.describe(), ?mode, "shell context ready");

        ShellContext {
            mode,
            registry,
            view,
            source,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub(crate) fn prompt(&self) -> String {
        let selected = self.view.selection().len();
        if selected == 0 {
            format!("wallet [{}]> ", self.view.mode())
        } else {
            format!("wallet [{}, {} selected]> ", self.view.mode(), selected)
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        apply_output_preferences(self.mode, &self.config);
        Ok(())
    }

    /// Re-opens the source after a configuration change.
    pub(crate) fn reopen_source(&mut self) -> CommandResult {
        self.source = self.config.open_source()?;
        debug!(source = %self.source.describe(), "source reopened");
        Ok(())
    }

    pub(crate) fn confirm_deletes(&self) -> bool {
        self.mode == CliMode::Interactive && self.config.confirm_deletes
    }

    pub(crate) fn currency_suffix(&self) -> &str {
        &self.config.currency_suffix
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = closest_command(&self.command_names(), input) {
            cli_io::print_info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Fetch(err) => {
                output::notice(&err.notice());
                if !matches!(err, FetchError::Rejected(_)) {
                    cli_io::print_hint(err.to_string());
                }
            }
            CommandError::Delete(DeleteError::NothingSelected) => {
                cli_io::print_warning(DeleteError::NothingSelected.to_string());
                cli_io::print_hint("Use `toggle <id>` or `select-all` first.");
            }
            CommandError::Delete(err @ DeleteError::NotPermitted(_)) => {
                cli_io::print_error(err.to_string());
            }
            CommandError::Delete(err) => {
                output::notice(&err.notice());
                if !matches!(err, DeleteError::Rejected(_)) {
                    cli_io::print_hint(err.to_string());
                }
            }
            other => cli_io::print_error(other.to_string()),
        }
        Ok(())
    }
}

fn apply_output_preferences(mode: CliMode, config: &Config) {
    output::set_preferences(OutputPreferences {
        color: config.ui_color_enabled && mode == CliMode::Interactive,
    });
}

/// Nearest command name within an edit distance of three.
pub(crate) fn closest_command<'a>(names: &[&'a str], input: &str) -> Option<&'a str> {
    let input = input.to_lowercase();
    names
        .iter()
        .map(|name| (levenshtein(name, &input), *name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Delete(#[from] DeleteError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("Usage: {usage}"))
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Runs `lines` through the same loop the shell uses for stdin.
#[cfg(test)]
pub(crate) fn process_script(
    mut context: ShellContext,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut feed = super::shell::LineFeed::new(io::Cursor::new(lines.join("\n")));
    super::shell::drive(&mut context, &mut feed)?;
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{FilterMode, FixedClock},
        domain::{EntryId, LedgerEntry, YearMonth},
        source::MemoryBackend,
    };
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context(dir: &TempDir) -> ShellContext {
        let source = MemoryBackend::new(vec![
            LedgerEntry::new(1, day(2024, 5, 3), "food", "Bakery").with_expense(1000),
            LedgerEntry::new(2, day(2024, 5, 3), "transport", "Bus").with_expense(500),
            LedgerEntry::new(3, day(2024, 6, 1), "food", "Market").with_income(2000),
        ]);
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        ShellContext::with_parts(
            CliMode::Script,
            Config::default(),
            manager,
            Box::new(source),
            LedgerViewModel::new(Box::new(FixedClock::new(day(2024, 5, 20)))),
        )
    }

    #[test]
    fn parse_line_handles_quotes() {
        let tokens = crate::cli::shell::parse_command_line("tab \"eating out\"").unwrap();
        assert_eq!(tokens, vec!["tab", "eating out"]);
    }

    #[test]
    fn closest_command_respects_distance_limit() {
        let names = ["select-all", "selected", "delete", "month"];
        assert_eq!(closest_command(&names, "delet"), Some("delete"));
        assert_eq!(closest_command(&names, "MONTH"), Some("month"));
        assert_eq!(closest_command(&names, "transactions"), None);
    }

    #[test]
    fn script_navigates_and_deletes() {
        let dir = TempDir::new().unwrap();
        let context = process_script(
            context(&dir),
            &["load", "month 2024-05", "select-all", "delete", "list"],
        )
        .unwrap();
        assert_eq!(context.view.entries().len(), 1);
        assert_eq!(context.view.entries()[0].id, EntryId(3));
        assert!(context.view.selection().is_empty());
    }

    #[test]
    fn failed_commands_keep_the_shell_running() {
        let dir = TempDir::new().unwrap();
        let context = process_script(
            context(&dir),
            &["load", "delete", "month nope", "toggle x", "unknown", "next"],
        )
        .unwrap();
        assert!(context.running);
        assert_eq!(context.view.entries().len(), 3);
        assert_eq!(
            context.view.mode(),
            &FilterMode::Month(YearMonth::new(2024, 6))
        );
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let context =
            process_script(context(&dir), &["# start", "load", "", "   ", "tab transport"])
                .unwrap();
        assert_eq!(context.last_command.as_deref(), Some("tab transport"));
        assert_eq!(
            context.view.mode(),
            &FilterMode::Category("transport".into())
        );
    }

    #[test]
    fn exit_stops_processing() {
        let dir = TempDir::new().unwrap();
        let context = process_script(context(&dir), &["load", "exit", "all"]).unwrap();
        assert_eq!(
            context.view.mode(),
            &FilterMode::Month(YearMonth::new(2024, 5))
        );
    }

    #[test]
    fn config_command_persists_changes() {
        let dir = TempDir::new().unwrap();
        let context = process_script(context(&dir), &["config currency_suffix KRW"]).unwrap();
        assert_eq!(context.config.currency_suffix, "KRW");
        let saved = context.config_manager.load().unwrap();
        assert_eq!(saved.currency_suffix, "KRW");
    }

    #[test]
    fn prompt_reports_mode_and_selection() {
        let dir = TempDir::new().unwrap();
        let context = process_script(context(&dir), &["load", "toggle 1"]).unwrap();
        assert_eq!(context.prompt(), "wallet [month 2024-05, 1 selected]> ");
    }
}
