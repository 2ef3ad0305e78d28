use crate::error::{HeatError, Result};
use crate::model::{CalendarBucket, Granularity};
use crate::util::{day_key, first_of_month, last_of_month, month_key, week_key};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Horizontal spacing rules for chart columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpacing {
    pub col_width: u32,
    /// Advance used by rest days in day charts instead of a full column.
    pub rest_day_gap: u32,
    /// Extra advance after each December column in month charts.
    pub year_gap: u32,
    #[serde(default)]
    pub rest_days: Vec<Weekday>,
}

impl Default for ColumnSpacing {
    fn default() -> Self {
        Self {
            col_width: 20,
            rest_day_gap: 2,
            year_gap: 4,
            rest_days: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

/// Builds the chart columns covering `from..=to`.
///
/// The first bucket contains `from`; enumeration stops at the first bucket
/// whose end reaches or passes `to`. Offsets are cumulative and start at 0.
pub fn buckets(
    from: NaiveDate,
    to: NaiveDate,
    granularity: Granularity,
    spacing: &ColumnSpacing,
) -> Result<Vec<CalendarBucket>> {
    if from > to {
        return Err(HeatError::InvalidRange(format!("{from} is after {to}")));
    }

    let mut out = Vec::new();
    let mut offset = 0u32;
    let mut cursor = match granularity {
        Granularity::Month => first_of_month(from),
        Granularity::Day | Granularity::Week => from,
    };

    loop {
        let (end, label, is_skipped, advance) = match granularity {
            Granularity::Day => {
                let skipped = spacing.rest_days.contains(&cursor.weekday());
                let advance = if skipped { spacing.rest_day_gap } else { spacing.col_width };
                (cursor, day_key(cursor), skipped, advance)
            }
            Granularity::Week => {
                let to_sunday = 6 - i64::from(cursor.weekday().num_days_from_monday());
                let end = (cursor + Duration::days(to_sunday)).min(to);
                (end, week_key(cursor), false, spacing.col_width)
            }
            Granularity::Month => {
                let advance = if cursor.month() == 12 {
                    spacing.col_width + spacing.year_gap
                } else {
                    spacing.col_width
                };
                (last_of_month(cursor), month_key(cursor), false, advance)
            }
        };

        out.push(CalendarBucket {
            label,
            start: cursor,
            end,
            offset,
            is_skipped,
        });
        offset += advance;

        if end >= to {
            break;
        }
        match end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    if out.is_empty() {
        return Err(HeatError::InvalidRange(format!("no buckets between {from} and {to}")));
    }
    Ok(out)
}

/// Total horizontal extent of `buckets`, including the last column.
pub fn span(buckets: &[CalendarBucket], spacing: &ColumnSpacing) -> u32 {
    buckets
        .last()
        .map(|b| b.offset + spacing.col_width)
        .unwrap_or(0)
}
