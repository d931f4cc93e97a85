use anyhow::Result;
use libc::{STDERR_FILENO, STDOUT_FILENO};
use nix::unistd::Pid;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::mem;
use std::os::unix::io::{FromRawFd, RawFd};
use thiserror::Error;

/// Shell error taxonomy. Components return these; only the dispatcher
/// layer decides whether a failure is printed and ignored or ends the
/// process.
#[derive(Error, Debug)]
pub enum JoshError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("job index out of bounds")]
    JobIndexOutOfBounds,

    #[error("job is not stopped")]
    JobNotStopped,

    #[error("job is not running in the background")]
    JobNotBackground,

    #[error("failed to parse command line: {0}")]
    Parse(String),

    #[error("system call failed: {0}")]
    System(#[from] nix::errno::Errno),
}

pub type JoshResult<T> = std::result::Result<T, JoshError>;

#[derive(Clone)]
pub struct Context {
    pub shell_pid: Pid,
    pub shell_pgid: Pid,
    pub interactive: bool,
    pub outfile: RawFd,
    pub errfile: RawFd,
}

impl Context {
    pub fn new(shell_pid: Pid, shell_pgid: Pid, interactive: bool) -> Self {
        Context {
            shell_pid,
            shell_pgid,
            interactive,
            outfile: STDOUT_FILENO,
            errfile: STDERR_FILENO,
        }
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Context")
            .field("shell_pid", &self.shell_pid)
            .field("shell_pgid", &self.shell_pgid)
            .field("interactive", &self.interactive)
            .field("outfile", &self.outfile)
            .field("errfile", &self.errfile)
            .finish()
    }
}

impl Context {
    pub fn write_stdout(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.outfile) };
        writeln!(&mut file, "{msg}")?;
        mem::forget(file);
        Ok(())
    }

    pub fn write_stderr(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.errfile) };
        writeln!(&mut file, "{msg}")?;
        mem::forget(file);
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    ExitedWith(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            JoshError::Usage("fg <job index>".to_string()).to_string(),
            "usage: fg <job index>"
        );
        assert_eq!(
            JoshError::JobIndexOutOfBounds.to_string(),
            "job index out of bounds"
        );
        assert_eq!(JoshError::JobNotStopped.to_string(), "job is not stopped");
        assert_eq!(
            JoshError::JobNotBackground.to_string(),
            "job is not running in the background"
        );
    }

    #[test]
    fn context_carries_standard_fds() {
        let ctx = Context::new(Pid::from_raw(100), Pid::from_raw(100), false);
        assert_eq!(ctx.outfile, STDOUT_FILENO);
        assert_eq!(ctx.errfile, STDERR_FILENO);
        assert!(!ctx.interactive);
    }
}
