use anyhow::Result;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, kill, sigaction};
use nix::unistd::Pid;
use tracing::debug;

/// The job-control signals whose disposition differs between the shell and
/// its children: the shell ignores both for its lifetime, children restore
/// the defaults before exec.
const JOB_CONTROL_SIGNALS: [Signal; 2] = [Signal::SIGTTIN, Signal::SIGTTOU];

fn set_disposition(handler: SigHandler) -> Result<()> {
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    for signal in JOB_CONTROL_SIGNALS {
        unsafe {
            sigaction(signal, &action)
                .map_err(|e| anyhow::anyhow!("failed to set {:?} handler: {}", signal, e))?;
        }
    }
    Ok(())
}

/// Applied once at shell startup, so terminal access from the background
/// never stops the shell itself.
pub(crate) fn ignore_job_control_signals() -> Result<()> {
    debug!("ignore {:?}", JOB_CONTROL_SIGNALS);
    set_disposition(SigHandler::SigIgn)
}

/// Applied in a freshly forked child before exec.
pub(crate) fn restore_default_signals() -> Result<()> {
    set_disposition(SigHandler::SigDfl)
}

pub(crate) fn send_signal(pid: Pid, signal: Signal) -> Result<()> {
    debug!("send signal {:?} to pid {}", signal, pid);
    kill(pid, signal).map_err(|e| anyhow::anyhow!("failed to send {:?} to {}: {}", signal, pid, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = tracing_subscriber::fmt::try_init();
    }

    #[test]
    fn send_signal_to_missing_process_fails() {
        init();
        // pid max on Linux is well below this
        let absent = Pid::from_raw(i32::MAX);
        assert!(send_signal(absent, Signal::SIGCONT).is_err());
    }

    #[test]
    fn dispositions_can_be_flipped() {
        init();
        ignore_job_control_signals().unwrap();
        restore_default_signals().unwrap();
        ignore_job_control_signals().unwrap();
    }
}
