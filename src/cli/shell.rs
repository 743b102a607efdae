use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::info;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::utils::build_info;

/// Set to run commands from stdin without prompts or confirmations.
pub const SCRIPT_ENV: &str = "WALLET_CLI_SCRIPT";

/// Commands whose first argument is a category name.
const CATEGORY_COMMANDS: [&str; 1] = ["tab"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    info!(build = %build_info::current().summary(), ?mode, "wallet shell starting");

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => {
            let mut reader = EditorReader::new(context.command_names())?;
            cli_io::print_info(format!(
                "Source: {}. Type `load` to fetch entries, `help` for commands.",
                context.source.describe()
            ));
            drive(&mut context, &mut reader)
        }
        CliMode::Script => drive(&mut context, &mut LineFeed::new(io::stdin().lock())),
    }
}

/// What one read from the user produced.
pub(crate) enum Input {
    Line(String),
    Interrupted,
    Closed,
}

/// Somewhere command lines come from.
pub(crate) trait LineReader {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError>;

    /// Called before each read so completion can follow the loaded ledger.
    fn refresh(&mut self, _context: &ShellContext) {}
}

/// Reads commands line by line from any buffered input, without prompting.
pub(crate) struct LineFeed<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> LineFeed<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
        }
    }
}

impl<R: BufRead> LineReader for LineFeed<R> {
    fn read(&mut self, _prompt: &str) -> Result<Input, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Input::Line(line?)),
            None => Ok(Input::Closed),
        }
    }
}

struct EditorReader {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl EditorReader {
    fn new(commands: Vec<&'static str>) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(commands)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineReader for EditorReader {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    self.editor.add_history_entry(trimmed).ok();
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Closed),
            Err(err) => Err(err.into()),
        }
    }

    fn refresh(&mut self, context: &ShellContext) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.categories = context.view.categories().into_iter().skip(1).collect();
        }
    }
}

/// Runs commands from `reader` until it closes or a command exits.
pub(crate) fn drive(
    context: &mut ShellContext,
    reader: &mut dyn LineReader,
) -> Result<(), CliError> {
    while context.running {
        reader.refresh(context);
        match reader.read(&context.prompt())? {
            Input::Line(line) => match handle_line(context, &line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err)?,
            },
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => {
                if context.mode == CliMode::Interactive {
                    cli_io::print_info("Exiting shell.");
                }
                break;
            }
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    // Comment lines let scripts annotate themselves.
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Completes command words, and category names after `tab`.
struct CommandHelper {
    commands: Vec<String>,
    categories: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self {
            commands,
            categories: Vec::new(),
        }
    }

    fn candidates(&self, words: &[&str], needle: &str) -> Vec<Pair> {
        let pool: &[String] = match words {
            [] => &self.commands,
            [command] if CATEGORY_COMMANDS.contains(&command.to_ascii_lowercase().as_str()) => {
                &self.categories
            }
            _ => return Vec::new(),
        };
        let needle = needle.to_lowercase();
        pool.iter()
            .filter(|name| name.to_lowercase().starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: quote_if_needed(name),
            })
            .collect()
    }
}

fn quote_if_needed(word: &str) -> String {
    if word.contains(char::is_whitespace) {
        shell_words::quote(word).into_owned()
    } else {
        word.to_string()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        Ok((start, self.candidates(&words, &prefix[start..])))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(pairs: Vec<Pair>) -> Vec<String> {
        pairs.into_iter().map(|pair| pair.replacement).collect()
    }

    #[test]
    fn helper_completes_command_prefixes() {
        let helper = CommandHelper::new(vec!["select-all", "selected", "delete", "Select-All"]);
        assert_eq!(
            replacements(helper.candidates(&[], "sel")),
            vec!["select-all", "selected"]
        );
    }

    #[test]
    fn tab_argument_completes_loaded_categories() {
        let mut helper = CommandHelper::new(vec!["tab", "toggle"]);
        helper.categories = vec!["food".into(), "eating out".into(), "Fuel".into()];
        assert_eq!(
            replacements(helper.candidates(&["tab"], "f")),
            vec!["food", "Fuel"]
        );
        assert_eq!(
            replacements(helper.candidates(&["TAB"], "eat")),
            vec!["'eating out'"]
        );
        assert!(helper.candidates(&["toggle"], "f").is_empty());
        assert!(helper.candidates(&["tab", "food"], "").is_empty());
    }

    #[test]
    fn line_feed_reports_end_of_input() {
        let mut feed = LineFeed::new(io::Cursor::new("load\n\nlist"));
        let mut lines = Vec::new();
        while let Input::Line(line) = feed.read("> ").unwrap() {
            lines.push(line);
        }
        assert_eq!(lines, vec!["load", "", "list"]);
    }

    #[test]
    fn unterminated_quote_is_a_parse_error() {
        assert!(parse_command_line("tab \"food").is_err());
        assert_eq!(parse_command_line("   ").unwrap(), Vec::<String>::new());
    }
}
