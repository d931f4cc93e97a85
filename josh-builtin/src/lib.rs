use anyhow::Result;
use josh_types::{Context, ExitStatus};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

// Builtin command modules
mod bg;
pub mod cd;
mod fg;
mod jobs;
mod pwd;
mod wait_all;
mod wait_for;

/// Interface builtin commands use to reach shell state without a direct
/// dependency on the shell crate.
pub trait ShellProxy {
    /// Initiates shell exit.
    fn exit_shell(&mut self);

    /// Dispatches a command to the shell's job control logic.
    fn dispatch(&mut self, ctx: &Context, cmd: &str, argv: Vec<String>) -> Result<()>;

    /// Changes the current working directory.
    fn changepwd(&mut self, path: &str) -> Result<()>;
}

/// Type alias for builtin command function signature.
/// All builtin commands must conform to this signature.
pub type BuiltinCommand =
    fn(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus;

/// Global registry of all builtin commands.
pub static BUILTIN_COMMAND: Lazy<Mutex<HashMap<&str, BuiltinCommand>>> = Lazy::new(|| {
    let mut builtin = HashMap::new();

    // Core shell commands
    builtin.insert("exit", exit as BuiltinCommand);
    builtin.insert("cd", cd::command as BuiltinCommand);
    builtin.insert("pwd", pwd::command as BuiltinCommand);

    // Job control commands
    builtin.insert("jobs", jobs::command as BuiltinCommand);
    builtin.insert("fg", fg::command as BuiltinCommand);
    builtin.insert("bg", bg::command as BuiltinCommand);
    builtin.insert("wait-for", wait_for::command as BuiltinCommand);
    builtin.insert("wait-all", wait_all::command as BuiltinCommand);

    Mutex::new(builtin)
});

/// Retrieves a builtin command function by name.
/// Returns None if the command is not found.
pub fn get_command(name: &str) -> Option<BuiltinCommand> {
    if let Ok(builtin) = BUILTIN_COMMAND.lock() {
        builtin.get(name).copied()
    } else {
        None
    }
}

/// Built-in exit command implementation.
pub fn exit(_ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    debug!("exit command called");
    proxy.exit_shell();
    ExitStatus::ExitedWith(0)
}
