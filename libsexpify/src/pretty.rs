//! Re-indent S-expression text by parenthesis depth.
//!
//! A single pass over the characters with a depth counter and a pending
//! token buffer:
//!
//! - `(` starts a new line indented by the depth before it opens.
//! - `)` closes on the current line.
//! - a literal newline starts a new line at the current depth.
//!
//! Pending text is flushed, trimmed and preceded by one space, before each
//! of those events.

use std::iter;

/// Indent width used when none is given.
pub const DEFAULT_INDENT: usize = 2;

struct Printer {
    indent: usize,
    depth: usize,
    token: String,
    out: String,
}

impl Printer {
    fn flush_token(&mut self) {
        let token = self.token.trim();
        if !token.is_empty() {
            self.out.push(' ');
            self.out.push_str(token);
        }
        self.token.clear();
    }

    /// Move to a fresh line at the current depth, reusing the current line
    /// if it holds nothing but indentation.
    fn start_line(&mut self) {
        let kept = self.out.trim_end_matches(' ').len();
        self.out.truncate(kept);
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.extend(iter::repeat(' ').take(self.depth * self.indent));
    }
}

/// Pretty-print `expr` with `indent` spaces per nesting level.
pub fn pretty(expr: &str, indent: usize) -> String {
    let mut printer = Printer {
        indent,
        depth: 0,
        token: String::new(),
        out: String::with_capacity(expr.len() * 2),
    };

    for c in expr.chars() {
        match c {
            '(' => {
                printer.flush_token();
                printer.start_line();
                printer.out.push('(');
                printer.depth += 1;
            }
            ')' => {
                printer.flush_token();
                printer.depth = printer.depth.saturating_sub(1);
                printer.out.push(')');
            }
            '\n' => {
                printer.flush_token();
                printer.start_line();
            }
            c => printer.token.push(c),
        }
    }
    printer.flush_token();

    printer.out.trim().to_string()
}
