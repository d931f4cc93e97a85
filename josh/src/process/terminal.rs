use anyhow::{Context as _, Result};
use libc::{STDIN_FILENO, c_int};
use nix::unistd::{Pid, tcsetpgrp};
use tracing::debug;

/// The controlling terminal, as seen by the shell.
pub const SHELL_TERMINAL: c_int = STDIN_FILENO;

/// Arbitrates which process group owns the controlling terminal. Exactly
/// one group is legitimately in the foreground at any instant, and after a
/// foreground wait it must be the shell's group again; every `tcsetpgrp`
/// call in the engine goes through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalController {
    shell_pgid: Pid,
}

impl TerminalController {
    pub fn new(shell_pgid: Pid) -> Self {
        TerminalController { shell_pgid }
    }

    /// Makes `pgid` the foreground process group of the terminal.
    pub fn hand_to(&self, pgid: Pid) -> Result<()> {
        debug!("tcsetpgrp pgid:{}", pgid);
        tcsetpgrp(SHELL_TERMINAL, pgid).context("failed tcsetpgrp")
    }

    /// Returns the terminal to the shell's own process group.
    pub fn reclaim(&self) -> Result<()> {
        debug!("tcsetpgrp shell_pgid:{}", self.shell_pgid);
        tcsetpgrp(SHELL_TERMINAL, self.shell_pgid).context("failed tcsetpgrp shell_pgid")
    }
}
