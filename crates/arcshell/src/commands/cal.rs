//! Calendar (cal)

use async_trait::async_trait;
use chrono::{Datelike, Local};

use super::{Command, Context};
use crate::calendar::{self, MAX_YEAR, MIN_YEAR};
use crate::error::Result;
use crate::session::ExecResult;

/// The cal command - print a full-year calendar.
///
/// Usage: cal [YEAR]
///
/// YEAR defaults to the current local year.
pub struct Cal;

#[async_trait]
impl Command for Cal {
    async fn execute(&self, ctx: Context<'_>) -> Result<ExecResult> {
        let year = match ctx.args {
            [] => Local::now().year(),
            [year] => match year.parse::<i32>() {
                Ok(year) => year,
                Err(_) => {
                    return Ok(ExecResult::err(
                        format!("cal: invalid year '{}'\n", year),
                        2,
                    ));
                }
            },
            _ => return Ok(ExecResult::err("cal: too many arguments\n", 2)),
        };

        match calendar::format_year(year) {
            Some(text) => Ok(ExecResult::ok(text)),
            None => Ok(ExecResult::err(
                format!(
                    "cal: year '{}' not in range {}..{}\n",
                    year, MIN_YEAR, MAX_YEAR
                ),
                2,
            )),
        }
    }

    fn usage(&self) -> Option<&'static str> {
        Some("cal [YEAR]")
    }
}
