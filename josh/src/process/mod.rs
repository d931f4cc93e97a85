pub mod fork;
pub mod job;
pub mod process;
pub mod redirect;
pub mod signal;
pub mod state;
pub mod terminal;
pub mod wait;

pub use job::{Job, JobRegistry};
pub use process::Process;
pub use redirect::Redirect;
pub use state::JobStatus;
pub use terminal::TerminalController;
pub use wait::{WaitOutcome, wait_for_stop_or_exit};
