use anyhow::{Context as _, Result};
use nix::unistd::{execvp, getpid, setpgid};
use std::ffi::CString;
use tracing::debug;

use super::redirect::Redirect;
use super::signal;
use crate::parser;

/// Upper bound on the exec argument list; tokens beyond it are dropped.
/// Generous for interactive use.
pub const MAX_ARGS: usize = 10;

/// One external command image, built from a command vector (background
/// marker already stripped). `launch` runs inside the freshly forked child
/// and does not return on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub(crate) cmd: String,
    pub(crate) tokens: Vec<String>,
}

impl Process {
    /// The program is the first token; redirections are carved out of the
    /// remaining tokens at launch.
    pub fn new(cmd: String, tokens: Vec<String>) -> Self {
        Process { cmd, tokens }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    /// Replaces the calling process image. Redirections first, then default
    /// signal dispositions and a fresh process group, then exec; any error
    /// along the way must end this process, never the parent's logic.
    pub fn launch(&self) -> Result<()> {
        for redirect in Redirect::parse(&self.tokens)? {
            redirect.apply()?;
        }

        signal::restore_default_signals()?;

        let pid = getpid();
        setpgid(pid, pid).context("failed setpgid")?;

        let cmd = CString::new(self.cmd.clone()).context("failed new CString")?;
        let argv: Result<Vec<CString>> = parser::exec_argv(&self.tokens, MAX_ARGS)
            .into_iter()
            .map(|a| CString::new(a).context("failed new CString"))
            .collect();
        let argv = argv?;

        debug!("launch: execvp cmd:{:?} argv:{:?} pid:{}", cmd, argv, pid);

        match execvp(&cmd, &argv) {
            Ok(_) => Ok(()),
            Err(nix::errno::Errno::ENOENT) => {
                eprintln!("josh: {}: command not found", self.cmd);
                std::process::exit(1);
            }
            Err(err) => {
                eprintln!("josh: failed to exec {}: {}", self.cmd, err);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_keeps_full_vector() {
        let tokens: Vec<String> = ["cat", "<", "in.txt"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let process = Process::new("cat".to_string(), tokens.clone());
        assert_eq!(process.cmd(), "cat");
        assert_eq!(process.tokens, tokens);
        // the redirection never reaches the exec argument list
        assert_eq!(parser::exec_argv(&process.tokens, MAX_ARGS), vec!["cat"]);
    }
}
