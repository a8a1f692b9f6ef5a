//! Session state and command dispatch
//!
//! A [`Session`] owns everything a running shell needs: the archive handle,
//! the tree built from it, the ownership overlay, the current position,
//! the command registry and the audit sink.
//!
//! Each non-blank line is split on whitespace into a command name and
//! arguments, journaled exactly once, then dispatched. Journaling happens
//! before dispatch, so rejected and unknown commands are recorded too.

mod input;
mod state;

pub use input::{Chain, LineSource, ReaderLines, ScriptLines};
pub use state::{ControlFlow, ExecResult, Lifecycle};

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::archive::ArchiveHandle;
use crate::audit::{AuditSink, CommandRecord, CsvAuditLog};
use crate::commands::{Command, CommandRegistry, Context};
use crate::config::ShellConfig;
use crate::error::{Error, Result};
use crate::ownership::OwnershipOverlay;
use crate::vfs::{ArchiveTree, VirtualNode};

/// Exit code reported for names missing from the registry.
pub const COMMAND_NOT_FOUND: i32 = 127;

/// Exit code commands use for malformed arguments. Such results get the
/// command's usage line appended.
const USAGE_ERROR: i32 = 2;

/// An interactive shell over one archive.
pub struct Session {
    username: String,
    cwd: VirtualNode,
    tree: ArchiveTree,
    owners: OwnershipOverlay,
    archive: ArchiveHandle,
    commands: CommandRegistry,
    audit: Box<dyn AuditSink>,
    lifecycle: Lifecycle,
    start_script: Option<PathBuf>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("cwd", &self.cwd)
            .field("archive", &self.archive)
            .field("lifecycle", &self.lifecycle)
            .field("start_script", &self.start_script)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open a session with the default command set and a CSV audit log.
    pub async fn open(config: &ShellConfig) -> Result<Self> {
        Self::builder(config.clone()).open().await
    }

    /// Create a builder for a customized session.
    pub fn builder(config: ShellConfig) -> SessionBuilder {
        SessionBuilder {
            config,
            audit: None,
            commands: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Current position.
    pub fn cwd(&self) -> &VirtualNode {
        &self.cwd
    }

    pub fn tree(&self) -> &ArchiveTree {
        &self.tree
    }

    pub fn owners(&self) -> &OwnershipOverlay {
        &self.owners
    }

    pub fn archive(&self) -> &ArchiveHandle {
        &self.archive
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Interactive prompt: `<username>@<position>> `.
    pub fn prompt(&self) -> String {
        format!("{}@{}> ", self.username, self.cwd)
    }

    /// Load the configured start script (empty if none).
    pub async fn start_script(&self) -> Result<ScriptLines> {
        ScriptLines::load(self.start_script.as_deref()).await
    }

    /// Execute one input line.
    ///
    /// Blank lines return `Ok(None)` and are not journaled. Every other line
    /// is journaled once and returns the command's result, including
    /// rejected and unknown commands. `Err` means the session could not
    /// process the line at all (closed session, audit failure).
    pub async fn execute(&mut self, line: &str) -> Result<Option<ExecResult>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        if !self.is_running() {
            return Err(Error::SessionClosed);
        }
        let args: Vec<String> = words.map(str::to_string).collect();

        self.audit
            .record(&CommandRecord::new(&self.username, name, &args))
            .await?;

        tracing::debug!(command = name, args = ?args, cwd = %self.cwd, "dispatch");

        let result = match self.commands.get(name) {
            Some(command) => {
                let ctx = Context {
                    args: &args,
                    username: &self.username,
                    cwd: &mut self.cwd,
                    tree: &self.tree,
                    owners: &mut self.owners,
                };
                let mut result = command.execute(ctx).await?;
                if result.exit_code == USAGE_ERROR
                    && let Some(usage) = command.usage()
                {
                    result.stderr.push_str(&format!("usage: {}\n", usage));
                }
                result
            }
            None => ExecResult::err(
                format!("{}: command not found\n", name),
                COMMAND_NOT_FOUND,
            ),
        };

        if !result.is_success() {
            tracing::warn!(command = name, exit_code = result.exit_code, "command rejected");
        }
        if result.control_flow == ControlFlow::Exit {
            self.close();
        }

        Ok(Some(result))
    }

    /// Read and execute lines until `exit` or until `source` runs dry.
    ///
    /// Command output goes to `out`, error messages to `err`. The session is
    /// closed when this returns `Ok`.
    pub async fn run<S, W, E>(&mut self, source: &mut S, out: &mut W, err: &mut E) -> Result<()>
    where
        S: LineSource + ?Sized,
        W: Write,
        E: Write,
    {
        while self.is_running() {
            let prompt = self.prompt();
            let Some(line) = source.next_line(&prompt) else {
                tracing::debug!("input exhausted");
                break;
            };
            if let Some(result) = self.execute(&line).await? {
                out.write_all(result.stdout.as_bytes())?;
                out.flush()?;
                err.write_all(result.stderr.as_bytes())?;
                err.flush()?;
            }
        }
        self.close();
        Ok(())
    }

    /// End the session and release the archive.
    ///
    /// Safe to call more than once; only the first call has an effect.
    pub fn close(&mut self) {
        if self.lifecycle == Lifecycle::Terminated {
            return;
        }
        self.lifecycle = Lifecycle::Terminated;
        self.archive.close();
        tracing::info!(user = %self.username, "session closed");
    }
}

/// Builder for customized [`Session`] setup.
pub struct SessionBuilder {
    config: ShellConfig,
    audit: Option<Box<dyn AuditSink>>,
    commands: Vec<(String, Box<dyn Command>)>,
}

impl SessionBuilder {
    /// Journal to `sink` instead of the configured CSV log.
    pub fn audit_sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit = Some(Box::new(sink));
        self
    }

    /// Register an extra command, replacing a builtin of the same name.
    pub fn command(mut self, name: impl Into<String>, command: Box<dyn Command>) -> Self {
        self.commands.push((name.into(), command));
        self
    }

    /// Open the archive and the audit log, and seed the ownership overlay.
    ///
    /// Fails with [`Error::ArchiveNotFound`] before touching the audit log
    /// if the archive is missing. If the archive opens but a later step
    /// fails, the archive is released before the error is returned.
    pub async fn open(self) -> Result<Session> {
        let SessionBuilder {
            config,
            audit,
            commands: extra,
        } = self;
        config.validate()?;

        let archive = ArchiveHandle::open(&config.filesystem_path)?;

        let audit: Box<dyn AuditSink> = match audit {
            Some(sink) => sink,
            None => Box::new(CsvAuditLog::open(&config.log_path).await?),
        };

        let tree = ArchiveTree::from_entries(archive.entries().iter().cloned());
        let owners = OwnershipOverlay::seeded(&config.username, tree.list_entries());

        let mut commands = CommandRegistry::with_builtins();
        for (name, command) in extra {
            commands.register(name, command);
        }

        tracing::info!(
            user = %config.username,
            archive = %config.filesystem_path.display(),
            entries = tree.len(),
            "session opened"
        );

        Ok(Session {
            username: config.username,
            cwd: VirtualNode::root(),
            tree,
            owners,
            archive,
            commands,
            audit,
            lifecycle: Lifecycle::Running,
            start_script: config.start_script,
        })
    }
}
