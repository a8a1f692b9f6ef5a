//! Terminal input for the interactive prompt

use arcshell::LineSource;

#[cfg(feature = "interactive")]
pub use editor::Interactive;

#[cfg(not(feature = "interactive"))]
pub use plain::Interactive;

#[cfg(feature = "interactive")]
mod editor {
    use super::LineSource;
    use anyhow::{Context, Result};
    use rustyline::DefaultEditor;
    use rustyline::error::ReadlineError;

    /// Line-edited prompt with in-memory history.
    ///
    /// Ctrl-C discards the current line, Ctrl-D ends input.
    pub struct Interactive {
        editor: DefaultEditor,
    }

    impl Interactive {
        pub fn new() -> Result<Self> {
            let editor = DefaultEditor::new().context("Failed to initialize line editor")?;
            Ok(Self { editor })
        }
    }

    impl LineSource for Interactive {
        fn next_line(&mut self, prompt: &str) -> Option<String> {
            loop {
                match self.editor.readline(prompt) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = self.editor.add_history_entry(line.as_str());
                        }
                        return Some(line);
                    }
                    Err(ReadlineError::Interrupted) => continue,
                    Err(ReadlineError::Eof) => return None,
                    Err(e) => {
                        tracing::error!(error = %e, "line editor failed");
                        return None;
                    }
                }
            }
        }
    }
}

#[cfg(not(feature = "interactive"))]
mod plain {
    use super::LineSource;
    use anyhow::Result;
    use arcshell::ReaderLines;
    use std::io::{StdinLock, Write};

    /// Prompt on stdout, read from stdin.
    pub struct Interactive {
        stdin: ReaderLines<StdinLock<'static>>,
    }

    impl Interactive {
        pub fn new() -> Result<Self> {
            Ok(Self {
                stdin: ReaderLines::new(std::io::stdin().lock()),
            })
        }
    }

    impl LineSource for Interactive {
        fn next_line(&mut self, prompt: &str) -> Option<String> {
            print!("{}", prompt);
            let _ = std::io::stdout().flush();
            self.stdin.next_line(prompt)
        }
    }
}
