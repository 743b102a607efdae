use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::LedgerViewModel,
    source::LedgerSource,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub view: LedgerViewModel,
    pub source: Box<dyn LedgerSource>,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, source: {}, entries: {} }}",
            self.running,
            self.last_command,
            self.source.describe(),
            self.view.entries().len()
        )
    }
}
