//! Directory listing (ls)

use async_trait::async_trait;

use super::{Command, Context};
use crate::error::Result;
use crate::session::ExecResult;
use crate::vfs::resolve;

/// The ls command - list directory contents.
///
/// Usage: ls [-l] [PATH]
///
/// Options:
///   -l   One entry per line with its owner (`name user:group`)
///
/// Without `-l`, names are printed on one line separated by spaces.
/// Entries are ordered by name.
pub struct Ls;

#[async_trait]
impl Command for Ls {
    async fn execute(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let mut long = false;
        let mut paths: Vec<&str> = Vec::new();

        for arg in ctx.args {
            if arg.starts_with('-') && arg.len() > 1 {
                for c in arg[1..].chars() {
                    match c {
                        'l' => long = true,
                        _ => {
                            return Ok(ExecResult::err(
                                format!("ls: invalid option -- '{}'\n", c),
                                2,
                            ));
                        }
                    }
                }
            } else {
                paths.push(arg);
            }
        }

        if paths.len() > 1 {
            return Ok(ExecResult::err("ls: too many arguments\n", 2));
        }

        let target = match paths.first() {
            None => ctx.cwd.clone(),
            Some(path) => match resolve(ctx.tree, ctx.cwd, path) {
                Ok(node) => node,
                Err(e) => return Ok(ExecResult::err(format!("ls: {}\n", e), 1)),
            },
        };

        let nodes = if target.is_dir() {
            ctx.tree.children_of(&target)
        } else {
            vec![target]
        };

        let mut output = String::new();
        if long {
            for node in &nodes {
                let owner = ctx.owners.get(node.path());
                output.push_str(&format!("{} {}\n", node.name(), owner));
            }
        } else {
            let names: Vec<&str> = nodes.iter().map(|n| n.name()).collect();
            output.push_str(&names.join(" "));
            output.push('\n');
        }

        Ok(ExecResult::ok(output))
    }

    fn usage(&self) -> Option<&'static str> {
        Some("ls [-l] [PATH]")
    }
}
