//! Command tokenization
//!
//! Splits a shell-like command string into tokens, separates the trailing
//! flag block after a bare `--`, and classifies flag tokens. Malformed
//! quoting is never fatal here; it passes through as literal text.

/// Split a command string into tokens.
///
/// Whitespace separates tokens. Single and double quotes group a span into
/// one token and are removed; a backslash escapes the next character, so
/// `\"--x\"` produces the token `"--x"` with literal quote characters
/// (which the literal parser later strips to the plain string `--x`).
pub fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            started = true;
            continue;
        }
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    started = true;
                }
                c if c.is_whitespace() => {
                    if started {
                        tokens.push(std::mem::take(&mut current));
                        started = false;
                    }
                }
                _ => {
                    current.push(c);
                    started = true;
                }
            },
        }
    }
    // An unterminated quote or trailing escape degrades to literal text
    if started {
        tokens.push(current);
    }
    tokens
}

/// Split a token sequence at the first bare `--` into (command-tokens,
/// flag-tokens). The `--` itself is dropped.
pub fn split_flag_block(tokens: Vec<String>) -> (Vec<String>, Vec<String>) {
    match tokens.iter().position(|t| t == "--") {
        Some(pos) => {
            let mut command = tokens;
            let flags = command.split_off(pos + 1);
            command.pop();
            (command, flags)
        }
        None => (tokens, Vec::new()),
    }
}

/// Whether a token names a parameter by prefix.
///
/// A leading `-` followed immediately by a digit is a negative number
/// literal, never a flag; a bare `-` is a separator and a bare `--` the
/// flag-block marker.
pub fn is_flag(token: &str) -> bool {
    let Some(rest) = token.strip_prefix('-') else {
        return false;
    };
    if rest.is_empty() || rest == "-" {
        return false;
    }
    !rest.starts_with(|c: char| c.is_ascii_digit())
}

/// Split a flag token into its parameter name (leading dashes removed,
/// hyphens normalized to underscores) and optional inline `=` value.
pub fn flag_parts(token: &str) -> (String, Option<String>) {
    let body = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);
    match body.split_once('=') {
        Some((name, value)) => (name.replace('-', "_"), Some(value.to_string())),
        None => (body.replace('-', "_"), None),
    }
}

/// Remove one pair of matching surrounding quotes, if present
pub fn strip_quotes(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &token[1..token.len() - 1]
    } else {
        token
    }
}
