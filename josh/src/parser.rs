use josh_types::JoshError;

/// Redirection operators recognized inside a command vector. Each one
/// consumes the following token as its file name.
pub const REDIRECT_OPERATORS: [&str; 3] = ["<", ">", ">>"];

/// Trailing marker that requests background execution.
pub const BACKGROUND_MARKER: &str = "&";

/// Splits an input line into the command vector. Words are separated by
/// whitespace; quoting is not part of this shell. An interior NUL byte can
/// never cross exec, so it is rejected here as a fatal parse failure.
pub fn tokenize(input: &str) -> Result<Vec<String>, JoshError> {
    if input.contains('\0') {
        return Err(JoshError::Parse("input contains a NUL byte".to_string()));
    }
    Ok(input.split_whitespace().map(|t| t.to_string()).collect())
}

/// Strips a trailing background marker off the command vector. Returns
/// true when the command requested background execution.
pub fn split_background(tokens: &mut Vec<String>) -> bool {
    if tokens.last().map(|t| t.as_str()) == Some(BACKGROUND_MARKER) {
        tokens.pop();
        true
    } else {
        false
    }
}

pub fn is_redirect_operator(token: &str) -> bool {
    REDIRECT_OPERATORS.contains(&token)
}

/// The exec argument list: the token prefix up to the first redirection
/// operator, bounded by `max_args`. Excess tokens are dropped.
pub fn exec_argv(tokens: &[String], max_args: usize) -> Vec<String> {
    tokens
        .iter()
        .take_while(|t| !is_redirect_operator(t))
        .take(max_args)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_whitespace() {
        let tokens = tokenize("ls  -l   /tmp").unwrap();
        assert_eq!(tokens, vec!["ls", "-l", "/tmp"]);
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn tokenize_rejects_nul() {
        assert!(matches!(tokenize("ls \0 -l"), Err(JoshError::Parse(_))));
    }

    #[test]
    fn background_marker_is_stripped() {
        let mut tokens = tokenize("sleep 100 &").unwrap();
        assert!(split_background(&mut tokens));
        assert_eq!(tokens, vec!["sleep", "100"]);

        let mut tokens = tokenize("sleep 100").unwrap();
        assert!(!split_background(&mut tokens));
        assert_eq!(tokens, vec!["sleep", "100"]);
    }

    #[test]
    fn exec_argv_stops_at_redirect_operator() {
        let tokens = tokenize("sort -r < in.txt > out.txt").unwrap();
        assert_eq!(exec_argv(&tokens, 10), vec!["sort", "-r"]);
    }

    #[test]
    fn exec_argv_drops_excess_tokens() {
        let tokens = tokenize("echo a b c d e").unwrap();
        assert_eq!(exec_argv(&tokens, 3), vec!["echo", "a", "b"]);
    }
}
