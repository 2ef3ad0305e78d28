use crate::error::{HeatError, Result};
use crate::model::CommitRecord;
use crate::util::DAY_FORMAT;
use chrono::NaiveDate;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static FILES_CHANGED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+ files? changed").expect("static regex"));
static INSERTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) insertions?").expect("static regex"));
static DELETIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) deletions?").expect("static regex"));
static HG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\S+)\s(\S+)\s\d*:\s\+(\d*).-(\d*)").expect("static regex")
});

struct PendingHeader {
    day: NaiveDate,
    author: String,
    line: usize,
}

/// Parses `git log --pretty="%aI %ae" --shortstat` output.
///
/// Each stat line is attributed to the most recent header. A header that is
/// never followed by a stat line (merge commits, empty commits, or a record
/// cut off at end of input) is dropped.
pub fn parse_git_log(text: &str) -> Result<Vec<CommitRecord>> {
    let mut records = Vec::new();
    let mut pending: Option<PendingHeader> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        if is_stat_line(raw) {
            let header = pending
                .take()
                .ok_or_else(|| HeatError::malformed(line, "stat line without a preceding header"))?;
            let added = optional_count(&INSERTIONS, raw, line)?.unwrap_or(0);
            let removed = optional_count(&DELETIONS, raw, line)?.unwrap_or(0);
            records.push(CommitRecord::new(header.day, header.author, added, removed));
        } else if let Some(dropped) = pending.replace(parse_git_header(raw, line)?) {
            debug!(
                "Dropping header at line {} ({} {}): no stat line",
                dropped.line, dropped.day, dropped.author
            );
        }
    }

    if let Some(dropped) = pending {
        debug!(
            "Dropping trailing header at line {} ({} {}): input ended before its stat line",
            dropped.line, dropped.day, dropped.author
        );
    }

    Ok(records)
}

/// Parses `hg log --template "{date(date,'%Y-%m-%d')} {author|email} {diffstat}\n"` output,
/// one self-contained record per line: `2016-01-25 john.doe@aol.com 1: +0/-12`.
pub fn parse_hg_log(text: &str) -> Result<Vec<CommitRecord>> {
    let mut records = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let caps = HG_LINE
            .captures(raw)
            .ok_or_else(|| HeatError::malformed(line, format!("unrecognized log line '{raw}'")))?;
        let day = parse_log_day(&caps[1], line)?;
        let added = digits_or_zero(&caps[3], line)?;
        let removed = digits_or_zero(&caps[4], line)?;
        records.push(CommitRecord::new(day, &caps[2], added, removed));
    }

    Ok(records)
}

fn is_stat_line(line: &str) -> bool {
    line.starts_with(char::is_whitespace) || FILES_CHANGED.is_match(line)
}

fn parse_git_header(raw: &str, line: usize) -> Result<PendingHeader> {
    let header = raw.trim().trim_matches('"');
    let mut tokens = header.split_whitespace();

    let date = tokens
        .next()
        .ok_or_else(|| HeatError::malformed(line, "empty header"))?;
    // git prints `%ae` as nothing for commits made with `--author="Name <>"`.
    let author = tokens.last().unwrap_or("");

    let day_text = date
        .get(..10)
        .ok_or_else(|| HeatError::malformed(line, format!("'{date}' is not an ISO date")))?;

    Ok(PendingHeader {
        day: parse_log_day(day_text, line)?,
        author: author.to_string(),
        line,
    })
}

fn parse_log_day(text: &str, line: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DAY_FORMAT)
        .map_err(|_| HeatError::malformed(line, format!("'{text}' is not a calendar date")))
}

/// Absence of a match is `None`; a matched digit run that does not fit is an error.
fn optional_count(pattern: &Regex, raw: &str, line: usize) -> Result<Option<u64>> {
    match pattern.captures(raw) {
        Some(caps) => parse_count(&caps[1], line).map(Some),
        None => Ok(None),
    }
}

fn digits_or_zero(text: &str, line: usize) -> Result<u64> {
    if text.is_empty() {
        Ok(0)
    } else {
        parse_count(text, line)
    }
}

fn parse_count(text: &str, line: usize) -> Result<u64> {
    text.parse::<u64>().map_err(|_| HeatError::UnparsableCount {
        line,
        text: text.to_string(),
    })
}
