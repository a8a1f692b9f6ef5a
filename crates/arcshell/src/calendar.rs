//! Text calendar rendering for `cal`
//!
//! Layout: year centered over rows of three months, each month column 20
//! characters wide with six spaces between columns, weeks starting on
//! Monday. Trailing spaces are trimmed from every line.

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};

/// Lowest year `cal` accepts.
pub const MIN_YEAR: i32 = 1;
/// Highest year `cal` accepts.
pub const MAX_YEAR: i32 = 9999;

const DAY_WIDTH: usize = 2;
const COLUMN_WIDTH: usize = (DAY_WIDTH + 1) * 7 - 1;
const COLUMN_SPACING: usize = 6;
const MONTHS_PER_ROW: usize = 3;
const WEEK_HEADER: &str = "Mo Tu We Th Fr Sa Su";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Render the full-year calendar for `year`.
///
/// Returns `None` when the year is outside [`MIN_YEAR`]..=[`MAX_YEAR`].
pub fn format_year(year: i32) -> Option<String> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }

    let total_width = COLUMN_WIDTH * MONTHS_PER_ROW + COLUMN_SPACING * (MONTHS_PER_ROW - 1);
    let mut out = String::new();
    push_line(&mut out, &format!("{:^width$}", year, width = total_width));
    out.push('\n');

    for row in 0..12 / MONTHS_PER_ROW {
        let months: Vec<u32> = (0..MONTHS_PER_ROW)
            .map(|i| (row * MONTHS_PER_ROW + i + 1) as u32)
            .collect();
        let weeks: Vec<Vec<String>> = months
            .iter()
            .map(|&m| month_weeks(year, m))
            .collect::<Option<_>>()?;

        out.push('\n');
        push_columns(&mut out, months.iter().map(|&m| MONTH_NAMES[m as usize - 1]));
        push_columns(&mut out, months.iter().map(|_| WEEK_HEADER));

        let height = weeks.iter().map(Vec::len).max().unwrap_or(0);
        for line in 0..height {
            push_columns(
                &mut out,
                weeks
                    .iter()
                    .map(|w| w.get(line).map(String::as_str).unwrap_or("")),
            );
        }
    }

    Some(out)
}

/// Week lines of one month, Monday first, blank-padded outside the month.
fn month_weeks(year: i32, month: u32) -> Option<Vec<String>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days = next.signed_duration_since(first).num_days() as usize;
    let offset = first.weekday().num_days_from_monday() as usize;

    let mut weeks = Vec::new();
    let mut line = String::new();
    for slot in 0..(offset + days).div_ceil(7) * 7 {
        if slot % 7 != 0 {
            line.push(' ');
        }
        if slot < offset || slot >= offset + days {
            line.push_str(&" ".repeat(DAY_WIDTH));
        } else {
            let _ = write!(line, "{:>width$}", slot - offset + 1, width = DAY_WIDTH);
        }
        if slot % 7 == 6 {
            weeks.push(std::mem::take(&mut line));
        }
    }
    Some(weeks)
}

fn push_columns<'a>(out: &mut String, cols: impl Iterator<Item = &'a str>) {
    let line = cols
        .map(|c| format!("{:^width$}", c, width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ".repeat(COLUMN_SPACING).as_str());
    push_line(out, &line);
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contains_year_and_all_months() {
        let cal = format_year(2024).unwrap();
        assert!(cal.contains("2024"));
        for name in MONTH_NAMES {
            assert!(cal.contains(name), "missing {}", name);
        }
        assert_eq!(cal.matches(WEEK_HEADER).count(), 12);
    }

    #[test]
    fn test_header_centered() {
        let cal = format_year(2024).unwrap();
        let first = cal.lines().next().unwrap();
        assert_eq!(first, format!("{}2024", " ".repeat(34)));
    }

    #[test]
    fn test_first_row_layout_2024() {
        // 2024-01-01 is a Monday, 2024-02-01 a Thursday, 2024-03-01 a Friday
        let cal = format_year(2024).unwrap();
        let lines: Vec<&str> = cal.lines().collect();
        let gap = " ".repeat(COLUMN_SPACING);

        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2],
            format!(
                "{}January{}{}{}February{}{}{}March",
                " ".repeat(6),
                " ".repeat(7),
                gap,
                " ".repeat(6),
                " ".repeat(6),
                gap,
                " ".repeat(7)
            )
        );
        assert_eq!(lines[3], [WEEK_HEADER; 3].join(gap.as_str()));
        assert_eq!(
            lines[4],
            format!(
                " 1  2  3  4  5  6  7{}{}1  2  3  4{}{}1  2  3",
                gap,
                " ".repeat(10),
                gap,
                " ".repeat(13)
            )
        );
    }

    #[test]
    fn test_leap_february() {
        let weeks = month_weeks(2024, 2).unwrap();
        assert!(weeks.last().unwrap().contains("29"));
        let weeks = month_weeks(2023, 2).unwrap();
        assert!(!weeks.iter().any(|w| w.contains("29")));
    }

    #[test]
    fn test_month_weeks_padding() {
        // September 2024 starts on a Sunday and needs six week lines
        let weeks = month_weeks(2024, 9).unwrap();
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0], format!("{}1", " ".repeat(19)));
        assert_eq!(weeks[5], format!("30{}", " ".repeat(18)));
    }

    #[test]
    fn test_year_range() {
        assert!(format_year(0).is_none());
        assert!(format_year(10000).is_none());
        assert!(format_year(1).is_some());
        assert!(format_year(9999).is_some());
    }
}
