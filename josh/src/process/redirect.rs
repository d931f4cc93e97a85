use anyhow::{Context as _, Result, bail};
use libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::fcntl::{OFlag, open};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};
use std::os::unix::io::RawFd;

use crate::parser;

/// One redirection taken from a command vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Input(String),
    Output(String),
    Append(String),
}

impl Redirect {
    /// Collects the redirections of a command vector. Every operator must
    /// be followed by a file name token.
    pub fn parse(tokens: &[String]) -> Result<Vec<Redirect>> {
        let mut redirects = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_str();
            if !parser::is_redirect_operator(token) {
                i += 1;
                continue;
            }
            let Some(file) = tokens.get(i + 1) else {
                bail!("missing file name after {}", token);
            };
            let redirect = match token {
                "<" => Redirect::Input(file.clone()),
                ">" => Redirect::Output(file.clone()),
                ">>" => Redirect::Append(file.clone()),
                _ => unreachable!(),
            };
            redirects.push(redirect);
            i += 2;
        }
        Ok(redirects)
    }

    /// Opens the target file and splices it over stdin or stdout. Runs in
    /// the forked child before exec; failure aborts the launch.
    pub fn apply(&self) -> Result<()> {
        let (fd, target) = match self {
            Redirect::Input(file) => {
                let fd = open(file.as_str(), OFlag::O_RDONLY, Mode::empty())
                    .with_context(|| format!("failed to open input file {file}"))?;
                (fd, STDIN_FILENO)
            }
            Redirect::Output(file) => {
                let fd = open(
                    file.as_str(),
                    OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                    Mode::S_IRUSR | Mode::S_IWUSR,
                )
                .with_context(|| format!("failed to open output file {file}"))?;
                (fd, STDOUT_FILENO)
            }
            Redirect::Append(file) => {
                let fd = open(
                    file.as_str(),
                    OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
                    Mode::S_IRUSR | Mode::S_IWUSR,
                )
                .with_context(|| format!("failed to open output file {file}"))?;
                (fd, STDOUT_FILENO)
            }
        };
        copy_fd(fd, target)
    }
}

pub(crate) fn copy_fd(src: RawFd, dst: RawFd) -> Result<()> {
    if src != dst {
        dup2(src, dst).context("failed dup2")?;
        close(src).context("failed close")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        input.split_whitespace().map(|t| t.to_string()).collect()
    }

    #[test]
    fn parse_collects_all_redirections() {
        let redirects = Redirect::parse(&tokens("sort -r < in.txt > out.txt")).unwrap();
        assert_eq!(
            redirects,
            vec![
                Redirect::Input("in.txt".to_string()),
                Redirect::Output("out.txt".to_string()),
            ]
        );
    }

    #[test]
    fn parse_recognizes_append() {
        let redirects = Redirect::parse(&tokens("echo hi >> log.txt")).unwrap();
        assert_eq!(redirects, vec![Redirect::Append("log.txt".to_string())]);
    }

    #[test]
    fn parse_without_operators_is_empty() {
        assert!(Redirect::parse(&tokens("ls -l /tmp")).unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_missing_file_name() {
        assert!(Redirect::parse(&tokens("sort <")).is_err());
        assert!(Redirect::parse(&tokens("echo hi >")).is_err());
    }
}
