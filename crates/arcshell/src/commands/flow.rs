//! Session control (exit)

use async_trait::async_trait;

use super::{Command, Context};
use crate::error::Result;
use crate::session::ExecResult;

/// The exit command - end the session.
///
/// Arguments are ignored.
pub struct Exit;

#[async_trait]
impl Command for Exit {
    async fn execute(&self, _ctx: Context<'_>) -> Result<ExecResult> {
        Ok(ExecResult::exit())
    }

    fn usage(&self) -> Option<&'static str> {
        Some("exit")
    }
}
