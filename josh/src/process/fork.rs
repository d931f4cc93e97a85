use anyhow::{Context as _, Result};
use nix::unistd::{ForkResult, Pid, fork, setpgid};
use tracing::debug;

use super::process::Process;

/// Forks and launches `process` in the child. Both sides put the child
/// into its own process group, so the group exists no matter which side
/// runs first.
pub(crate) fn fork_process(process: &Process) -> Result<Pid> {
    let pid = unsafe { fork().context("failed fork")? };

    match pid {
        ForkResult::Parent { child } => {
            debug!("forked {:?} child pid:{}", process.cmd(), child);
            match setpgid(child, child) {
                // EACCES means the child already execed with its group in
                // place.
                Ok(_) | Err(nix::errno::Errno::EACCES) => {}
                Err(err) => return Err(err).context("failed setpgid"),
            }
            Ok(child)
        }
        ForkResult::Child => {
            if let Err(err) = process.launch() {
                eprintln!("josh: {err:#}");
            }
            // launch exits itself on exec failure; reaching here means it
            // failed before exec.
            std::process::exit(1);
        }
    }
}
