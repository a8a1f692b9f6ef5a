//! Navigation (cd)

use async_trait::async_trait;

use super::{Command, Context};
use crate::error::Result;
use crate::session::ExecResult;
use crate::vfs::resolve;

/// The cd command - change the current position.
///
/// Usage: cd PATH
///
/// The position only changes when PATH resolves to a directory.
pub struct Cd;

#[async_trait]
impl Command for Cd {
    async fn execute(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let target = match ctx.args {
            [] => return Ok(ExecResult::err("cd: missing argument\n", 2)),
            [target] => target,
            _ => return Ok(ExecResult::err("cd: too many arguments\n", 2)),
        };

        match resolve(ctx.tree, ctx.cwd, target) {
            Ok(node) if node.is_dir() => {
                *ctx.cwd = node;
                Ok(ExecResult::ok(""))
            }
            Ok(_) => Ok(ExecResult::err(
                format!("cd: {}: Not a directory\n", target),
                1,
            )),
            Err(e) => Ok(ExecResult::err(format!("cd: {}\n", e), 1)),
        }
    }

    fn usage(&self) -> Option<&'static str> {
        Some("cd PATH")
    }
}
