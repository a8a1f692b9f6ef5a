//! Shell commands
//!
//! Every command implements [`Command`] and is looked up by name in a
//! [`CommandRegistry`]. Names missing from the registry are reported as
//! unknown by the session.
//!
//! # Custom Commands
//!
//! ```rust
//! use arcshell::{Command, CommandContext, ExecResult, async_trait};
//!
//! struct Pwd;
//!
//! #[async_trait]
//! impl Command for Pwd {
//!     async fn execute(&self, ctx: CommandContext<'_>) -> arcshell::Result<ExecResult> {
//!         Ok(ExecResult::ok(format!("{}\n", ctx.cwd)))
//!     }
//! }
//! ```
//!
//! Register via [`SessionBuilder::command`](crate::SessionBuilder::command).

mod cal;
mod fileops;
mod flow;
mod ls;
mod navigation;

pub use cal::Cal;
pub use fileops::Chown;
pub use flow::Exit;
pub use ls::Ls;
pub use navigation::Cd;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::ownership::OwnershipOverlay;
use crate::session::ExecResult;
use crate::vfs::{ArchiveTree, VirtualNode};

/// Execution context for a command.
///
/// Gives access to the session state a command may read or change.
pub struct Context<'a> {
    /// Command arguments (not including the command name).
    ///
    /// For `chown bob:staff file1.txt`, this contains `["bob:staff", "file1.txt"]`.
    pub args: &'a [String],

    /// Session user.
    pub username: &'a str,

    /// Current position (mutable).
    ///
    /// Used by `cd` and as the start of relative path resolution.
    pub cwd: &'a mut VirtualNode,

    /// Archive namespace.
    pub tree: &'a ArchiveTree,

    /// Ownership overlay (mutable).
    pub owners: &'a mut OwnershipOverlay,
}

/// Trait for implementing shell commands.
///
/// Rejected input is not an error: return [`ExecResult::err`] with a
/// message and a non-zero exit code, and leave the context untouched.
/// `Err` is reserved for failures that should end the session.
#[async_trait]
pub trait Command: Send + Sync {
    /// Execute the command.
    async fn execute(&self, ctx: Context<'_>) -> Result<ExecResult>;

    /// One-line usage summary, appended to usage errors (exit code 2).
    fn usage(&self) -> Option<&'static str> {
        None
    }
}

/// Mapping from command name to implementation.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `ls`, `cd`, `chown`, `cal` and `exit`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("ls", Box::new(Ls));
        registry.register("cd", Box::new(Cd));
        registry.register("chown", Box::new(Chown));
        registry.register("cal", Box::new(Cal));
        registry.register("exit", Box::new(Exit));
        registry
    }

    /// Add or replace a command.
    pub fn register(&mut self, name: impl Into<String>, command: Box<dyn Command>) {
        self.commands.insert(name.into(), command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = CommandRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["cal", "cd", "chown", "exit", "ls"]);
        assert!(registry.get("ls").is_some());
        assert!(registry.get("rm").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = CommandRegistry::with_builtins();
        registry.register("ls", Box::new(Exit));
        assert_eq!(registry.names().len(), 5);
        assert!(registry.contains("ls"));
    }
}
