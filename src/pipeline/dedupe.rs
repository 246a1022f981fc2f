use crate::types::StudentRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Which reading wins for an ambiguous slash date such as `05/06/2024`.
/// The other reading is still tried when the preferred one is impossible
/// (`13/05/2024` under `MonthFirst`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

impl DateOrder {
    fn formats(self) -> [&'static str; 4] {
        match self {
            DateOrder::MonthFirst => ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"],
            DateOrder::DayFirst => ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"],
        }
    }
}

/// Parses the enrollment dates seen in spreadsheet exports. Anything with a
/// time component is reduced to its leading `YYYY-MM-DD`.
pub fn parse_enrollment_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let raw = raw.trim();
    order
        .formats()
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// Identity key for a student row: trimmed, lower-cased email.
pub fn identity_key(record: &StudentRecord) -> String {
    record
        .email
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Keeps the most recently enrolled row per email.
///
/// Rows are stable-sorted newest first; rows without a parseable date sort
/// after all dated rows. The first row seen per key wins, so equal dates
/// keep their input order.
pub fn dedupe(records: Vec<StudentRecord>) -> Vec<StudentRecord> {
    dedupe_with_order(records, DateOrder::default())
}

pub fn dedupe_with_order(mut records: Vec<StudentRecord>, order: DateOrder) -> Vec<StudentRecord> {
    records.sort_by_key(|r| {
        let date = r
            .enrollment_date
            .as_deref()
            .and_then(|d| parse_enrollment_date(d, order));
        // `Some` sorts above `None`, so reversing puts undated rows last
        Reverse(date)
    });

    let mut seen = HashSet::new();
    records.retain(|r| seen.insert(identity_key(r)));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(email: &str, date: Option<&str>, id: &str) -> StudentRecord {
        StudentRecord {
            email: Some(email.to_string()),
            enrollment_date: date.map(str::to_string),
            student_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn ids(records: &[StudentRecord]) -> Vec<&str> {
        records.iter().filter_map(|r| r.student_id.as_deref()).collect()
    }

    #[test]
    fn keeps_latest_enrollment() {
        let out = dedupe(vec![
            row("ada@example.com", Some("2024-01-01"), "old"),
            row("ada@example.com", Some("2024-06-01"), "new"),
        ]);
        assert_eq!(ids(&out), vec!["new"]);
    }

    #[test]
    fn key_ignores_case_and_whitespace() {
        let out = dedupe(vec![
            row(" Ada@Example.com", Some("2024-03-01"), "a"),
            row("ada@example.com", Some("2024-02-01"), "b"),
        ]);
        assert_eq!(ids(&out), vec!["a"]);
    }

    #[test]
    fn ties_keep_first_in_input_order() {
        let out = dedupe(vec![
            row("ada@example.com", Some("2024-05-05"), "first"),
            row("ada@example.com", Some("2024-05-05"), "second"),
        ]);
        assert_eq!(ids(&out), vec!["first"]);
    }

    #[test]
    fn undated_rows_lose_to_dated_ones() {
        let out = dedupe(vec![
            row("ada@example.com", None, "undated"),
            row("ada@example.com", Some("not a date"), "garbage"),
            row("ada@example.com", Some("2023-09-01"), "dated"),
        ]);
        assert_eq!(ids(&out), vec!["dated"]);
    }

    #[test]
    fn output_is_newest_first() {
        let out = dedupe(vec![
            row("a@example.com", Some("2024-01-10"), "a"),
            row("b@example.com", Some("03/15/2024"), "b"),
            row("c@example.com", Some("2023-12-31T09:00:00Z"), "c"),
        ]);
        assert_eq!(ids(&out), vec!["b", "a", "c"]);
    }

    #[test]
    fn parses_supported_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1);
        let order = DateOrder::MonthFirst;
        assert_eq!(parse_enrollment_date("2024-06-01", order), expected);
        assert_eq!(parse_enrollment_date("06/01/2024", order), expected);
        assert_eq!(parse_enrollment_date("2024/06/01", order), expected);
        assert_eq!(parse_enrollment_date("2024-06-01 08:30:00", order), expected);
        assert_eq!(parse_enrollment_date("June", order), None);
    }

    #[test]
    fn ambiguous_slash_dates_follow_the_order() {
        assert_eq!(
            parse_enrollment_date("05/06/2024", DateOrder::MonthFirst),
            NaiveDate::from_ymd_opt(2024, 5, 6)
        );
        assert_eq!(
            parse_enrollment_date("05/06/2024", DateOrder::DayFirst),
            NaiveDate::from_ymd_opt(2024, 6, 5)
        );
        // The impossible reading falls through to the other one either way
        assert_eq!(
            parse_enrollment_date("13/05/2024", DateOrder::MonthFirst),
            NaiveDate::from_ymd_opt(2024, 5, 13)
        );
        assert_eq!(
            parse_enrollment_date("05/13/2024", DateOrder::DayFirst),
            NaiveDate::from_ymd_opt(2024, 5, 13)
        );
    }

    #[test]
    fn day_first_order_changes_which_row_survives() {
        let rows = || {
            vec![
                row("ada@example.com", Some("02/03/2024"), "a"),
                row("ada@example.com", Some("2024-02-15"), "b"),
            ]
        };
        // Month first: 3 Feb loses to 15 Feb; day first: 2 Mar wins
        assert_eq!(ids(&dedupe_with_order(rows(), DateOrder::MonthFirst)), vec!["b"]);
        assert_eq!(ids(&dedupe_with_order(rows(), DateOrder::DayFirst)), vec!["a"]);
    }
}
