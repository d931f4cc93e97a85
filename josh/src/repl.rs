use crate::shell::Shell;
use anyhow::{Context as _, Result};
use josh_types::Context;
use std::io::{self, BufRead, Write};
use tracing::debug;

pub const PROMPT: &str = "@> ";

/// The read loop: prompt, read one line, hand it to the dispatcher.
/// Builtin and job failures are printed inside the dispatcher and do not
/// end the loop; a parse failure of the raw input line does.
pub struct Repl<'a> {
    pub shell: &'a mut Shell,
}

impl<'a> Repl<'a> {
    pub fn new(shell: &'a mut Shell) -> Self {
        Repl { shell }
    }

    pub fn run(&mut self, ctx: &Context) -> Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            if ctx.interactive {
                print!("{PROMPT}");
                io::stdout().flush().context("failed to flush prompt")?;
            }

            let Some(line) = lines.next() else {
                debug!("eof on stdin");
                break;
            };
            let line = line.context("failed to read input line")?;

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            self.shell.eval_line(ctx, input)?;

            if self.shell.exited {
                debug!("shell exited");
                break;
            }
        }
        Ok(())
    }
}
