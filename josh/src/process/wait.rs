use anyhow::{Result, anyhow};
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::debug;

/// Outcome of one blocking wait on a job, with stop notification enabled.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WaitOutcome {
    /// Stopped by a job-control signal; the process still exists.
    Stopped(Signal),
    /// Exited on its own.
    Exited(u8),
    /// Killed by a signal.
    Signaled(Signal),
}

impl WaitOutcome {
    pub fn is_stopped(&self) -> bool {
        matches!(self, WaitOutcome::Stopped(_))
    }
}

/// Blocks until `pid` stops or terminates. This is the engine's only
/// suspension point.
pub fn wait_for_stop_or_exit(pid: Pid) -> Result<WaitOutcome> {
    let result = waitpid(pid, Some(WaitPidFlag::WUNTRACED));
    debug!("waitpid pid:{} result:{:?}", pid, result);

    match result {
        Ok(WaitStatus::Exited(_, status)) => Ok(WaitOutcome::Exited(status as u8)),
        Ok(WaitStatus::Signaled(_, signal, _)) => Ok(WaitOutcome::Signaled(signal)),
        Ok(WaitStatus::Stopped(_, signal)) => Ok(WaitOutcome::Stopped(signal)),
        // Already reaped elsewhere; the job is gone.
        Err(nix::errno::Errno::ECHILD) => Ok(WaitOutcome::Exited(1)),
        Err(err) => Err(anyhow!("failed waitpid for {}: {}", pid, err)),
        Ok(status) => Err(anyhow!("unexpected waitpid status: {:?}", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::kill;
    use std::process::Command;

    fn init() {
        let _ = tracing_subscriber::fmt::try_init();
    }

    fn spawn(program: &str, args: &[&str]) -> Pid {
        let child = Command::new(program)
            .args(args)
            .spawn()
            .expect("failed to spawn");
        Pid::from_raw(child.id() as i32)
    }

    #[test]
    fn reports_normal_exit() {
        init();
        let pid = spawn("true", &[]);
        let outcome = wait_for_stop_or_exit(pid).expect("failed wait");
        assert_eq!(outcome, WaitOutcome::Exited(0));
    }

    #[test]
    fn reports_nonzero_exit() {
        init();
        let pid = spawn("false", &[]);
        let outcome = wait_for_stop_or_exit(pid).expect("failed wait");
        assert_eq!(outcome, WaitOutcome::Exited(1));
    }

    #[test]
    fn reports_stop_and_kill() {
        init();
        let pid = spawn("sleep", &["30"]);

        kill(pid, Signal::SIGSTOP).expect("failed SIGSTOP");
        let outcome = wait_for_stop_or_exit(pid).expect("failed wait");
        assert!(outcome.is_stopped());

        kill(pid, Signal::SIGKILL).expect("failed SIGKILL");
        let outcome = wait_for_stop_or_exit(pid).expect("failed wait");
        assert_eq!(outcome, WaitOutcome::Signaled(Signal::SIGKILL));
    }
}
