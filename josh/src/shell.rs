use crate::errors::display_user_error;
use crate::parser;
use crate::process::fork::fork_process;
use crate::process::signal;
use crate::process::{
    Job, JobRegistry, JobStatus, Process, TerminalController, wait_for_stop_or_exit,
};
use anyhow::{Context as _, Result, bail};
use josh_builtin::ShellProxy;
use josh_types::{Context, JoshError};
use nix::sys::signal::Signal;
use nix::unistd::{Pid, chdir, getpid, setpgid};
use tracing::debug;

pub const APP_NAME: &str = "josh";

pub struct Shell {
    pub pid: Pid,
    pub pgid: Pid,
    pub exited: bool,
    pub(crate) jobs: JobRegistry,
    terminal: TerminalController,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Shell")
            .field("pid", &self.pid)
            .field("pgid", &self.pgid)
            .field("exited", &self.exited)
            .finish()
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        let pid = getpid();
        let pgid = pid;
        let _ = setpgid(pgid, pgid).context("failed setpgid");

        Shell {
            pid,
            pgid,
            exited: false,
            jobs: JobRegistry::new(),
            terminal: TerminalController::new(pgid),
        }
    }

    /// Applied once per shell lifetime: terminal access from the
    /// background must never stop the shell itself.
    pub fn set_signals(&mut self) {
        signal::ignore_job_control_signals().expect("failed sigaction");
    }

    /// Runs one command line: a builtin directly, anything else through
    /// fork and the foreground or background protocol. Only a parse
    /// failure of the raw line propagates out; every other failure is
    /// printed here and the shell continues.
    pub fn eval_line(&mut self, ctx: &Context, input: &str) -> Result<()> {
        let mut tokens = parser::tokenize(input)?;
        if tokens.is_empty() {
            return Ok(());
        }

        if let Some(cmd_fn) = josh_builtin::get_command(&tokens[0]) {
            debug!("run builtin {:?}", tokens[0]);
            let _ = cmd_fn(ctx, tokens, self);
            return Ok(());
        }

        let foreground = !parser::split_background(&mut tokens);
        if tokens.is_empty() {
            return Ok(());
        }

        if let Err(err) = self.run_external(ctx, tokens, foreground) {
            display_user_error(&err);
        }
        Ok(())
    }

    fn run_external(&mut self, ctx: &Context, tokens: Vec<String>, foreground: bool) -> Result<()> {
        let name = tokens[0].clone();
        let process = Process::new(name.clone(), tokens);
        let child = fork_process(&process)?;

        if foreground {
            self.foreground_wait(ctx, child, name, None)
        } else {
            debug!("background job {:?} pid:{}", name, child);
            self.jobs
                .insert(Job::new(child, name, JobStatus::Background));
            Ok(())
        }
    }

    /// The foreground protocol: hand the terminal to the job, block until
    /// it stops or terminates, then take the terminal back. The reclaim
    /// happens even when the wait fails, otherwise the shell loses the
    /// keyboard. A job observed stopped is recorded (inserted, or kept at
    /// `index` on resume); a terminated one leaves no trace.
    fn foreground_wait(
        &mut self,
        ctx: &Context,
        pid: Pid,
        name: String,
        index: Option<usize>,
    ) -> Result<()> {
        if ctx.interactive {
            self.terminal.hand_to(pid)?;
        }

        let outcome = match index {
            // resume path: the continue signal goes out after the
            // terminal hand-off, before the wait
            Some(_) => {
                signal::send_signal(pid, Signal::SIGCONT).and_then(|_| wait_for_stop_or_exit(pid))
            }
            None => wait_for_stop_or_exit(pid),
        };

        if ctx.interactive {
            self.terminal.reclaim()?;
        }

        if outcome?.is_stopped() {
            debug!("job {:?} stopped pid:{}", name, pid);
            match index {
                Some(index) => {
                    if let Some(job) = self.jobs.get_mut(index) {
                        job.status = JobStatus::Stopped;
                    }
                }
                None => self.jobs.insert(Job::new(pid, name, JobStatus::Stopped)),
            }
        } else if let Some(index) = index {
            debug!("job {:?} finished pid:{}", name, pid);
            self.jobs.remove(index);
        }
        Ok(())
    }

    /// `fg` / `bg`: a stopped job gets the continue signal; in the
    /// foreground case the full terminal protocol runs around the wait,
    /// in the background case the status flips without blocking.
    fn resume_job(&mut self, ctx: &Context, argv: &[String], foreground: bool) -> Result<()> {
        let cmd = if foreground { "fg" } else { "bg" };
        let index = parse_job_index(cmd, argv)?;
        let job = self.jobs.get(index).ok_or(JoshError::JobIndexOutOfBounds)?;
        if job.status != JobStatus::Stopped {
            // a background job is already running
            bail!(JoshError::JobNotStopped);
        }
        let (pid, name) = (job.pid, job.name.clone());
        debug!("resume job {:?} pid:{} foreground:{}", name, pid, foreground);

        if foreground {
            self.foreground_wait(ctx, pid, name, Some(index))
        } else {
            signal::send_signal(pid, Signal::SIGCONT)?;
            if let Some(job) = self.jobs.get_mut(index) {
                job.status = JobStatus::Background;
            }
            Ok(())
        }
    }

    /// `wait-for`: block once on a background job. Waiting on a stopped
    /// job would hang until someone resumes it, so it is rejected.
    fn wait_for_job(&mut self, argv: &[String]) -> Result<()> {
        let index = parse_job_index("wait-for", argv)?;
        let job = self.jobs.get(index).ok_or(JoshError::JobIndexOutOfBounds)?;
        if job.status != JobStatus::Background {
            bail!(JoshError::JobNotBackground);
        }
        let pid = job.pid;

        if wait_for_stop_or_exit(pid)?.is_stopped() {
            if let Some(job) = self.jobs.get_mut(index) {
                job.status = JobStatus::Stopped;
            }
        } else {
            self.jobs.remove(index);
        }
        Ok(())
    }

    /// `wait-all`: block once on every currently-background job. The pid
    /// set is snapshotted first and positions are recomputed per pid, so
    /// removals cannot skip or double-process a job.
    fn wait_all_jobs(&mut self) -> Result<()> {
        if self.jobs.is_empty() {
            return Ok(());
        }
        for pid in self.jobs.background_pids() {
            if wait_for_stop_or_exit(pid)?.is_stopped() {
                if let Some(job) = self.jobs.find_mut(pid) {
                    job.status = JobStatus::Stopped;
                }
            } else if let Some(index) = self.jobs.position(pid) {
                self.jobs.remove(index);
            }
        }
        Ok(())
    }

    fn list_jobs(&self, ctx: &Context) -> Result<()> {
        debug!("list {} jobs", self.jobs.len());
        for (index, job) in self.jobs.iter() {
            ctx.write_stdout(&format!("{}: {} ({})", index, job.name, job.status))?;
        }
        Ok(())
    }
}

fn parse_job_index(cmd: &str, argv: &[String]) -> Result<usize, JoshError> {
    let arg = argv
        .get(1)
        .ok_or_else(|| JoshError::Usage(format!("{cmd} <job index>")))?;
    arg.parse::<usize>()
        .map_err(|_| JoshError::Usage(format!("{cmd} <job index>")))
}

impl ShellProxy for Shell {
    fn exit_shell(&mut self) {
        self.exited = true;
    }

    fn dispatch(&mut self, ctx: &Context, cmd: &str, argv: Vec<String>) -> Result<()> {
        match cmd {
            "jobs" => self.list_jobs(ctx),
            "fg" => self.resume_job(ctx, &argv, true),
            "bg" => self.resume_job(ctx, &argv, false),
            "wait-for" => self.wait_for_job(&argv),
            "wait-all" => self.wait_all_jobs(),
            _ => bail!("unknown command: {cmd}"),
        }
    }

    fn changepwd(&mut self, path: &str) -> Result<()> {
        chdir(path).with_context(|| format!("failed chdir to {path}"))?;
        Ok(())
    }
}
