//! Command line sources
//!
//! A session reads from a [`LineSource`]. The usual arrangement is the
//! start script first, then an interactive or piped source, joined with
//! [`Chain`].

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::Path;

use crate::error::Result;

/// Supplier of command lines.
pub trait LineSource {
    /// Next line, or `None` once the source is exhausted.
    ///
    /// `prompt` is the text an interactive source should display.
    fn next_line(&mut self, prompt: &str) -> Option<String>;
}

/// Pre-recorded lines, consumed in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptLines {
    lines: VecDeque<String>,
}

impl ScriptLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split newline-delimited text into lines.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    /// Load a start script. An absent path or a missing file yields an
    /// empty script.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                let script = Self::from_text(&text);
                tracing::debug!(path = %path.display(), lines = script.len(), "start script loaded");
                Ok(script)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no start script");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lines not yet consumed.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LineSource for ScriptLines {
    fn next_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Lines read from any buffered reader (piped stdin, files).
pub struct ReaderLines<R> {
    reader: R,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderLines<R> {
    /// Invalid UTF-8 is replaced rather than ending input; only end of
    /// stream and read failures do that.
    fn next_line(&mut self, _prompt: &str) -> Option<String> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                Some(line.trim_end_matches(['\n', '\r']).to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "input read failed");
                None
            }
        }
    }
}

/// `first` until exhausted, then `second`.
pub struct Chain<A, B> {
    first: A,
    second: B,
    first_done: bool,
}

impl<A: LineSource, B: LineSource> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            first_done: false,
        }
    }
}

impl<A: LineSource, B: LineSource> LineSource for Chain<A, B> {
    fn next_line(&mut self, prompt: &str) -> Option<String> {
        if !self.first_done {
            match self.first.next_line(prompt) {
                Some(line) => return Some(line),
                None => self.first_done = true,
            }
        }
        self.second.next_line(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(source: &mut impl LineSource) -> Vec<String> {
        std::iter::from_fn(|| source.next_line("> ")).collect()
    }

    #[test]
    fn test_script_lines_in_order() {
        let mut script = ScriptLines::from_text("ls\n\ncd docs\nls -l\n");
        assert_eq!(script.len(), 4);
        assert_eq!(drain(&mut script), vec!["ls", "", "cd docs", "ls -l"]);
        assert!(script.is_empty());
    }

    #[test]
    fn test_reader_lines_strip_line_endings() {
        let mut source = ReaderLines::new("ls\r\ncal 2024\nexit".as_bytes());
        assert_eq!(drain(&mut source), vec!["ls", "cal 2024", "exit"]);
    }

    #[test]
    fn test_reader_lines_survive_invalid_utf8() {
        let mut source = ReaderLines::new(&b"ls \xff\nls\nexit\n"[..]);
        assert_eq!(drain(&mut source), vec!["ls \u{FFFD}", "ls", "exit"]);
    }

    #[test]
    fn test_chain_script_then_reader() {
        let mut source = Chain::new(
            ScriptLines::new(["ls", "cd docs"]),
            ReaderLines::new("pwd\n".as_bytes()),
        );
        assert_eq!(drain(&mut source), vec!["ls", "cd docs", "pwd"]);
    }

    #[tokio::test]
    async fn test_load_missing_script_is_empty() {
        let script = ScriptLines::load(Some(Path::new("/nonexistent/arcshell/start.txt")))
            .await
            .unwrap();
        assert!(script.is_empty());
        assert!(ScriptLines::load(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("start.txt");
        std::fs::write(&path, "ls\ncal 2024\n").unwrap();
        let mut script = ScriptLines::load(Some(&path)).await.unwrap();
        assert_eq!(drain(&mut script), vec!["ls", "cal 2024"]);
    }
}
