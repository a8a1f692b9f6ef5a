//! arcshell - a shell over a filesystem that lives inside one archive
//!
//! The archive (zip, tar or tar.gz) is indexed once at startup into a
//! virtual tree. Commands navigate that tree, list it, and attach synthetic
//! `user:group` ownership to its entries. Every command line is appended to
//! an audit log.
//!
//! # Example
//!
//! ```rust,no_run
//! use arcshell::{Session, ShellConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ShellConfig::new("alice", "fs.zip", "log.csv");
//!     let mut session = Session::open(&config).await?;
//!
//!     session.execute("chown bob:staff file1.txt").await?;
//!     if let Some(result) = session.execute("ls -l").await? {
//!         print!("{}", result.stdout);
//!     }
//!     session.execute("exit").await?;
//!     Ok(())
//! }
//! ```

mod archive;
mod audit;
pub mod calendar;
mod commands;
mod config;
mod error;
mod ownership;
mod session;
mod vfs;

pub use archive::{ArchiveEntry, ArchiveFormat, ArchiveHandle, EntryKind};
pub use audit::{AuditSink, CommandRecord, CsvAuditLog, MemoryAuditLog};
pub use commands::{
    Cal, Cd, Chown, Command, CommandRegistry, Context as CommandContext, Exit, Ls,
};
pub use config::ShellConfig;
pub use error::{Error, Result};
pub use ownership::{OwnerSpecError, OwnershipOverlay, OwnershipRecord};
pub use session::{
    COMMAND_NOT_FOUND, Chain, ControlFlow, ExecResult, Lifecycle, LineSource, ReaderLines,
    ScriptLines, Session, SessionBuilder,
};
pub use vfs::{ArchiveTree, NodeKind, ResolveError, VirtualNode, resolve};

/// Re-export async_trait for custom command implementations.
pub use async_trait::async_trait;
