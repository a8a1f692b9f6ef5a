//! Ownership changes (chown)

use async_trait::async_trait;

use super::{Command, Context};
use crate::error::Result;
use crate::ownership::OwnershipRecord;
use crate::session::ExecResult;
use crate::vfs::resolve;

/// The chown command - set the synthetic owner of an entry.
///
/// Usage: chown USER:GROUP PATH
///
/// The owner spec must contain exactly one `:`. Nothing changes when the
/// spec is malformed or PATH does not resolve.
pub struct Chown;

#[async_trait]
impl Command for Chown {
    async fn execute(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let (spec, path) = match ctx.args {
            [spec, path] => (spec, path),
            [] | [_] => return Ok(ExecResult::err("chown: missing operand\n", 2)),
            [_, _, extra, ..] => {
                return Ok(ExecResult::err(
                    format!("chown: extra operand '{}'\n", extra),
                    2,
                ));
            }
        };

        let record: OwnershipRecord = match spec.parse() {
            Ok(record) => record,
            Err(e) => return Ok(ExecResult::err(format!("chown: {}\n", e), 2)),
        };

        match resolve(ctx.tree, ctx.cwd, path) {
            Ok(node) => {
                tracing::debug!(path = node.path(), owner = %record, "ownership changed");
                ctx.owners.set(node.path(), record);
                Ok(ExecResult::ok(""))
            }
            Err(e) => Ok(ExecResult::err(
                format!("chown: cannot access '{}': {}\n", path, e),
                1,
            )),
        }
    }

    fn usage(&self) -> Option<&'static str> {
        Some("chown USER:GROUP PATH")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Fixture;

    fn fixture() -> Fixture {
        Fixture::new(&["file1.txt", "file2.txt", "a/notes.txt", "b/notes.txt"])
    }

    #[tokio::test]
    async fn test_chown_sets_owner() {
        let mut fx = fixture();
        let result = fx.run(&Chown, &["newuser:newgroup", "file1.txt"]).await;
        assert!(result.is_success());
        assert_eq!(fx.owners.get("file1.txt").to_string(), "newuser:newgroup");
        assert_eq!(fx.owners.get("file2.txt").to_string(), "test_user:test_user_group");
    }

    #[tokio::test]
    async fn test_chown_overwrites_previous() {
        let mut fx = fixture();
        fx.run(&Chown, &["u1:g1", "file1.txt"]).await;
        fx.run(&Chown, &["u2:g2", "file1.txt"]).await;
        assert_eq!(fx.owners.get("file1.txt").to_string(), "u2:g2");
    }

    #[tokio::test]
    async fn test_chown_relative_to_cwd() {
        let mut fx = fixture();
        fx.cwd = fx.tree.node("a").unwrap();
        fx.run(&Chown, &["carol:ops", "notes.txt"]).await;
        assert_eq!(fx.owners.get("a/notes.txt").to_string(), "carol:ops");
        assert_eq!(fx.owners.get("b/notes.txt").to_string(), "test_user:test_user_group");
    }

    #[tokio::test]
    async fn test_chown_directory() {
        let mut fx = fixture();
        fx.run(&Chown, &["carol:ops", "/a"]).await;
        assert_eq!(fx.owners.get("a").to_string(), "carol:ops");
    }

    #[tokio::test]
    async fn test_chown_malformed_spec() {
        let mut fx = fixture();
        let before = fx.owners.clone();
        let result = fx
            .run(&Chown, &["bad_format_without_colon", "file1.txt"])
            .await;
        assert_eq!(result.exit_code, 2);
        assert_eq!(
            result.stderr,
            "chown: invalid owner 'bad_format_without_colon': expected USER:GROUP\n"
        );
        assert_eq!(fx.owners.get("file1.txt"), before.get("file1.txt"));
        assert_eq!(fx.owners.len(), before.len());
    }

    #[tokio::test]
    async fn test_chown_missing_target() {
        let mut fx = fixture();
        let before = fx.owners.len();
        let result = fx.run(&Chown, &["u:g", "nonexistent_file.txt"]).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(
            result.stderr,
            "chown: cannot access 'nonexistent_file.txt': nonexistent_file.txt: No such file or directory\n"
        );
        assert!(fx.owners.explicit("nonexistent_file.txt").is_none());
        assert_eq!(fx.owners.len(), before);
    }

    #[tokio::test]
    async fn test_chown_operand_count() {
        let mut fx = fixture();
        assert_eq!(fx.run(&Chown, &[]).await.stderr, "chown: missing operand\n");
        assert_eq!(fx.run(&Chown, &["u:g"]).await.stderr, "chown: missing operand\n");
        assert_eq!(
            fx.run(&Chown, &["u:g", "file1.txt", "file2.txt"]).await.stderr,
            "chown: extra operand 'file2.txt'\n"
        );
        assert_eq!(fx.owners.get("file1.txt").to_string(), "test_user:test_user_group");
    }
}
