//! Chunk splitting.
//!
//! Child process output is delivered in chunks that need not line up with
//! line boundaries. [`SplitMode::Tokens`] splits every chunk independently on
//! runs of whitespace and commas. [`SplitMode::Lines`] splits on newlines and
//! carries an incomplete trailing line over to the next chunk through a
//! [`LineBuffer`].

use serde::Serialize;
use std::fmt;

/// The child process stream a chunk was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    /// Returns true for the error channel.
    pub fn is_stderr(&self) -> bool {
        matches!(self, Stream::Stderr)
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => f.write_str("stdout"),
            Stream::Stderr => f.write_str("stderr"),
        }
    }
}

/// How chunks are broken into classifiable lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Split each chunk on runs of whitespace and commas, without reassembly.
    #[default]
    Tokens,
    /// Split on newlines and reassemble lines cut across chunk boundaries.
    Lines,
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == '\u{feff}'
}

/// Splits one chunk on runs of whitespace and commas.
///
/// Empty fragments produced by leading or trailing separators are skipped.
pub fn split_chunk(chunk: &str, stream: Stream) -> impl Iterator<Item = (&str, Stream)> + '_ {
    chunk
        .split(is_separator)
        .filter(|fragment| !fragment.is_empty())
        .map(move |fragment| (fragment, stream))
}

/// Longest fragment held back while waiting for a newline, in bytes.
///
/// Output that never ends a line, such as `\r`-only progress bars, is
/// released as a line once it grows past this size.
pub const MAX_PENDING_LINE: usize = 64 * 1024;

/// Holds the incomplete trailing line of one stream between chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every line it completed, in order.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);

        let mut lines: Vec<String> = match self.pending.rfind('\n') {
            Some(last_newline) => {
                let rest = self.pending.split_off(last_newline + 1);
                let complete = std::mem::replace(&mut self.pending, rest);
                complete
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            None => Vec::new(),
        };

        if self.pending.len() > MAX_PENDING_LINE {
            lines.extend(self.finish());
        }

        lines
    }

    /// Returns the buffered fragment once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        let mut rest = std::mem::take(&mut self.pending);
        if rest.ends_with('\r') {
            rest.pop();
        }
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }

    /// Returns true if no fragment is waiting for its newline.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragments(chunk: &str) -> Vec<&str> {
        split_chunk(chunk, Stream::Stdout).map(|(f, _)| f).collect()
    }

    #[test]
    fn test_split_on_whitespace_and_commas() {
        assert_eq!(
            fragments("a b,c\n\td,, e\r\nf"),
            vec!["a", "b", "c", "d", "e", "f"]
        );
    }

    #[test]
    fn test_split_skips_empty_fragments() {
        assert!(fragments("").is_empty());
        assert!(fragments(" \n,\t").is_empty());
        assert_eq!(fragments("\nBuild\n"), vec!["Build"]);
    }

    #[test]
    fn test_split_keeps_stream() {
        let parts: Vec<_> = split_chunk("x y", Stream::Stderr).collect();
        assert_eq!(parts, vec![("x", Stream::Stderr), ("y", Stream::Stderr)]);
    }

    #[test]
    fn test_split_fragments_diagnostic_text() {
        assert_eq!(
            fragments("Foo.java:10: error: cannot find symbol"),
            vec!["Foo.java:10:", "error:", "cannot", "find", "symbol"]
        );
    }

    #[test]
    fn test_line_buffer_reassembles_lines() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push("Foo.java:10: err").is_empty());
        assert!(!buffer.is_empty());
        assert_eq!(
            buffer.push("or: cannot find symbol\nnext"),
            vec!["Foo.java:10: error: cannot find symbol"]
        );
        assert_eq!(buffer.push(" line\r\n\r\nlast"), vec!["next line"]);
        assert_eq!(buffer.finish(), Some("last".to_string()));
        assert!(buffer.is_empty());
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_line_buffer_keeps_commas() {
        let mut buffer = LineBuffer::new();
        assert_eq!(
            buffer.push("e: A.kt: (1, 2): expected a, b\n"),
            vec!["e: A.kt: (1, 2): expected a, b"]
        );
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_line_buffer_strips_trailing_carriage_return() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push("tail\r").is_empty());
        assert_eq!(buffer.finish(), Some("tail".to_string()));
    }

    #[test]
    fn test_line_buffer_releases_oversized_fragment() {
        let mut buffer = LineBuffer::new();
        let progress = "x".repeat(MAX_PENDING_LINE);
        assert!(buffer.push(&progress).is_empty());

        let released = buffer.push("yz\r");
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].len(), MAX_PENDING_LINE + 2);
        assert!(released[0].ends_with("yz"));
        assert!(buffer.is_empty());
    }
}
