use crate::repl::Repl;
use crate::shell::Shell;
use anyhow::Result;
use clap::Parser;
use josh_types::Context;
use std::process::ExitCode;
use tracing::debug;

mod errors;
mod parser;
mod process;
mod repl;
mod shell;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Evaluate a single command line and exit
    #[arg(short, long)]
    command: Option<String>,
}

fn main() -> ExitCode {
    if let Err(err) = init_tracing() {
        eprintln!("failed to initialize tracing: {err}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    let mut shell = Shell::new();
    let ctx = create_context(&shell);

    if let Some(command) = cli.command.as_deref() {
        execute_command(&mut shell, &ctx, command)
    } else {
        run_interactive(&mut shell, &ctx)
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))
}

fn create_context(shell: &Shell) -> Context {
    Context::new(shell.pid, shell.pgid, stdin_is_terminal())
}

fn stdin_is_terminal() -> bool {
    use std::os::unix::io::AsRawFd;
    nix::unistd::isatty(std::io::stdin().as_raw_fd()).unwrap_or(false)
}

fn execute_command(shell: &mut Shell, ctx: &Context, command: &str) -> ExitCode {
    debug!("start shell, command mode: {:?}", command);
    shell.set_signals();

    match shell.eval_line(ctx, command) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            errors::display_user_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(shell: &mut Shell, ctx: &Context) -> ExitCode {
    debug!("start shell, interactive: {}", ctx.interactive);
    shell.set_signals();

    let mut repl = Repl::new(shell);
    match repl.run(ctx) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            errors::display_user_error(&err);
            ExitCode::FAILURE
        }
    }
}
