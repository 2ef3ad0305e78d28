use crate::model::{ActivityTable, CommitRecord};
use crate::util::month_key;
use std::collections::{BTreeMap, HashMap};

/// `YYYY-MM -> author -> lines changed`.
pub type MonthTable = BTreeMap<String, BTreeMap<String, u64>>;

pub fn aggregate<'a, I>(records: I) -> ActivityTable
where
    I: IntoIterator<Item = &'a CommitRecord>,
{
    let mut table = ActivityTable::new();
    for record in records {
        table.add(record.day, &record.author, record.added, record.removed);
    }
    table
}

pub fn by_month(table: &ActivityTable) -> MonthTable {
    let mut months = MonthTable::new();
    for (day, authors) in table.days() {
        let month = months.entry(month_key(*day)).or_default();
        for (author, delta) in authors {
            let lines = month.entry(author.clone()).or_insert(0);
            *lines = lines.saturating_add(delta.lines_changed());
        }
    }
    months
}

/// Totals per author, in the order authors are first met walking the months.
pub fn totals_by_author(months: &MonthTable) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for authors in months.values() {
        for (author, lines) in authors {
            match index.get(author.as_str()) {
                Some(&i) => totals[i].1 = totals[i].1.saturating_add(*lines),
                None => {
                    index.insert(author.as_str(), totals.len());
                    totals.push((author.clone(), *lines));
                }
            }
        }
    }
    totals
}

/// Authors by descending total; ties keep discovery order.
pub fn rank_authors(months: &MonthTable) -> Vec<(String, u64)> {
    let mut totals = totals_by_author(months);
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}
