pub mod navigation;
pub mod report;
pub mod selection;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(navigation::definitions())
        .chain(selection::definitions())
        .chain(report::definitions())
    {
        registry.register(entry);
    }
    registry.alias("ls", "list");
    registry.alias("quit", "exit");
    registry.alias("today", "this-month");
    registry.alias("rm", "delete");
}
