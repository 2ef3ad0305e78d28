use crate::error::{HeatError, Result};
use chrono::{Datelike, NaiveDate};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn day_key(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub fn month_key(day: NaiveDate) -> String {
    format!("{}-{:02}", day.year(), day.month())
}

pub fn week_key(day: NaiveDate) -> String {
    let week = day.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Parses a `YYYY-MM-DD` range bound.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DAY_FORMAT)
        .map_err(|e| HeatError::InvalidRange(format!("'{input}' is not a calendar date: {e}")))
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub fn last_of_month(day: NaiveDate) -> NaiveDate {
    let first = first_of_month(day);
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DAY_FORMAT).unwrap()
    }

    #[test]
    fn keys_are_zero_padded() {
        assert_eq!(day_key(d("2016-01-05")), "2016-01-05");
        assert_eq!(month_key(d("2016-01-05")), "2016-01");
        assert_eq!(week_key(d("2016-01-05")), "2016-W01");
    }

    #[test]
    fn week_key_uses_iso_year() {
        // 2016-01-01 is a Friday belonging to the last ISO week of 2015.
        assert_eq!(week_key(d("2016-01-01")), "2015-W53");
    }

    #[test]
    fn parse_day_rejects_non_dates() {
        assert!(parse_day("2016-02-30").is_err());
        assert!(parse_day("yesterday").is_err());
        assert_eq!(parse_day(" 2016-02-29 ").unwrap(), d("2016-02-29"));
    }

    #[test]
    fn month_bounds() {
        assert_eq!(first_of_month(d("2016-02-17")), d("2016-02-01"));
        assert_eq!(last_of_month(d("2016-02-17")), d("2016-02-29"));
        assert_eq!(last_of_month(d("2015-12-03")), d("2015-12-31"));
    }
}
