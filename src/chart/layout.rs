use super::color::{opacity_for, ColorAssigner, Rgba};
use super::config::ChartConfig;
use crate::activity::{by_month, rank_authors, totals_by_author, MonthTable};
use crate::error::{HeatError, Result};
use crate::model::{ActivityTable, CalendarBucket, Granularity};
use crate::util::day_key;
use chrono::NaiveDate;
use std::collections::HashMap;

const LABEL_NUDGE: i32 = 7;
const LEGEND_GAP: i32 = 18;
const LEGEND_COLUMN_WIDTH: i32 = 80;
const AUTHOR_LABEL_ROOM: u32 = 320;
const BOTTOM_ROOM: u32 = 40;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        stroke: Rgba,
        fill: Rgba,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        /// Degrees; -90 reads bottom to top.
        rotation: f32,
        color: Rgba,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

/// One repository's block of rows.
#[derive(Debug, Clone)]
pub struct RepoSection {
    pub name: String,
    pub table: ActivityTable,
}

impl RepoSection {
    pub fn new(name: impl Into<String>, table: ActivityTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

/// Lays out the whole chart: column labels, legend, one header row per
/// repository followed by one row of cells per author, and the footer.
pub fn layout(
    sections: &[RepoSection],
    buckets: &[CalendarBucket],
    config: &ChartConfig,
    colors: &mut ColorAssigner,
    generated_on: NaiveDate,
) -> Result<ChartLayout> {
    let last = buckets
        .iter()
        .rev()
        .find(|b| !b.is_skipped)
        .or_else(|| buckets.last())
        .ok_or_else(|| HeatError::InvalidRange("no buckets to lay out".to_string()))?;

    let mut engine = LayoutEngine {
        config,
        colors,
        commands: Vec::new(),
        legend_x: px(config.left_margin) + px(last.offset) + px(config.col_width()) + LEGEND_GAP,
        row: 0,
    };

    engine.column_labels(buckets);
    engine.legend();
    for section in sections {
        engine.section(section, buckets);
    }
    if config.footer {
        engine.footer(generated_on);
    }

    let rows_bottom = config.top_margin + engine.row * config.row_height + BOTTOM_ROOM;
    let (width, height) = if config.grow_to_fit {
        (
            config.canvas_width.max(engine.legend_x.max(0) as u32 + AUTHOR_LABEL_ROOM),
            config.canvas_height.max(rows_bottom),
        )
    } else {
        (config.canvas_width, config.canvas_height)
    };

    Ok(ChartLayout {
        width,
        height,
        commands: engine.commands,
    })
}

struct LayoutEngine<'a> {
    config: &'a ChartConfig,
    colors: &'a mut ColorAssigner,
    commands: Vec<DrawCommand>,
    legend_x: i32,
    row: u32,
}

impl LayoutEngine<'_> {
    fn text(&mut self, text: impl Into<String>, x: i32, y: i32, rotation: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            x,
            y,
            rotation,
            color: Rgba::BLACK,
        });
    }

    fn cell(&mut self, x: i32, y: i32, fill: Rgba) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width: self.config.col_width(),
            height: self.config.row_height,
            stroke: Rgba::LIGHT_GRAY,
            fill,
        });
    }

    fn row_y(&self, row: u32) -> i32 {
        px(self.config.top_margin) + px(row * self.config.row_height)
    }

    fn column_labels(&mut self, buckets: &[CalendarBucket]) {
        let y = px(self.config.top_margin) - 10;
        for bucket in buckets.iter().filter(|b| !b.is_skipped) {
            let x = px(self.config.left_margin) + px(bucket.offset) + LABEL_NUDGE;
            self.text(bucket.label.clone(), x, y, -90.0);
        }
    }

    fn legend(&mut self) {
        let x = self.legend_x;
        self.text("Number of Lines Changed", x + 10, 10, 0.0);

        let labels = legend_labels(&self.config.thresholds);
        let steps = (labels.len() - 1).max(1) as f32;
        let col = px(self.config.col_width());
        let row_h = px(self.config.row_height);

        for (i, label) in labels.into_iter().enumerate() {
            let i = i as i32;
            let swatch_x = x + 10 + (i / 3) * LEGEND_COLUMN_WIDTH;
            let swatch_y = col + (i % 3 + 1) * row_h - 10;
            let fill = self.config.legend_color.with_opacity(i as f32 / steps);
            self.cell(swatch_x, swatch_y, fill);
            self.text(label, swatch_x + col + 10, swatch_y + 6, 0.0);
        }
    }

    fn section(&mut self, section: &RepoSection, buckets: &[CalendarBucket]) {
        let header_y = self.row_y(self.row) + LABEL_NUDGE;
        self.text(section.name.clone(), px(self.config.left_margin), header_y, 0.0);
        self.row += 1;

        let months = by_month(&section.table);
        let authors = match self.config.granularity {
            Granularity::Month => rank_authors(&months),
            Granularity::Day | Granularity::Week => {
                let totals: HashMap<String, u64> = totals_by_author(&months).into_iter().collect();
                section
                    .table
                    .authors()
                    .into_iter()
                    .map(|a| {
                        let total = totals.get(&a).copied().unwrap_or(0);
                        (a, total)
                    })
                    .collect()
            }
        };

        for (author, total) in &authors {
            let y = self.row_y(self.row);
            let label_x = self.legend_x;
            self.text(format!("{author} ({total})"), label_x, y + 5, 0.0);

            let color = self.colors.color_for(author);
            for bucket in buckets.iter().filter(|b| !b.is_skipped) {
                let lines = self.lines_changed(&section.table, &months, bucket, author);
                let fill = if lines == 0 {
                    Rgba::TRANSPARENT
                } else {
                    color.with_opacity(opacity_for(lines, &self.config.thresholds))
                };
                let x = px(self.config.left_margin) + px(bucket.offset);
                self.cell(x, y, fill);
            }
            self.row += 1;
        }
    }

    fn lines_changed(
        &self,
        table: &ActivityTable,
        months: &MonthTable,
        bucket: &CalendarBucket,
        author: &str,
    ) -> u64 {
        match self.config.granularity {
            Granularity::Month => months
                .get(&bucket.label)
                .and_then(|authors| authors.get(author))
                .copied()
                .unwrap_or(0),
            Granularity::Day | Granularity::Week => {
                table.lines_changed_between(author, bucket.start, bucket.end)
            }
        }
    }

    fn footer(&mut self, generated_on: NaiveDate) {
        let y = self.row_y(self.row) + 10;
        let text = format!("Generated on {} with devheat", day_key(generated_on));
        self.text(text, px(self.config.left_margin), y, 0.0);
    }
}

/// `"t0"`, then `"t0+"`, `"t1+"`, ... one label per opacity step.
pub fn legend_labels(thresholds: &[u64]) -> Vec<String> {
    let first = thresholds.first().copied().unwrap_or(0);
    std::iter::once(first.to_string())
        .chain(thresholds.iter().map(|t| format!("{t}+")))
        .collect()
}

fn px(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::aggregate;
    use crate::calendar::buckets;
    use crate::model::CommitRecord;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn table(records: &[(&str, &str, u64, u64)]) -> ActivityTable {
        let records: Vec<CommitRecord> = records
            .iter()
            .map(|(day, author, added, removed)| CommitRecord::new(d(day), *author, *added, *removed))
            .collect();
        aggregate(&records)
    }

    fn texts(layout: &ChartLayout) -> Vec<&str> {
        layout
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn text_y(layout: &ChartLayout, needle: &str) -> i32 {
        layout
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { text, y, .. } if text == needle => Some(*y),
                _ => None,
            })
            .unwrap()
    }

    /// Cells drawn in the row area (legend swatches sit above the top margin).
    fn cells(layout: &ChartLayout, config: &ChartConfig) -> Vec<(i32, i32, Rgba)> {
        layout
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { x, y, fill, .. } if *y >= config.top_margin as i32 => {
                    Some((*x, *y, *fill))
                }
                _ => None,
            })
            .collect()
    }

    fn render(sections: &[RepoSection], from: &str, to: &str, config: &ChartConfig) -> ChartLayout {
        let buckets = buckets(d(from), d(to), config.granularity, &config.spacing).unwrap();
        let mut colors = ColorAssigner::default();
        layout(sections, &buckets, config, &mut colors, d("2016-03-01")).unwrap()
    }

    #[test]
    fn day_chart_cells_skip_weekends() {
        let config = ChartConfig::day();
        let sections = [RepoSection::new(
            "core",
            table(&[
                ("2016-01-01", "a@x.org", 1200, 300),
                ("2016-01-02", "a@x.org", 50, 0),
                ("2016-01-04", "b@x.org", 1, 0),
            ]),
        )];
        // Fri, Sat, Sun, Mon: the weekend only advances by 2 px each.
        let chart = render(&sections, "2016-01-01", "2016-01-04", &config);
        let cells = cells(&chart, &config);
        assert_eq!(cells.len(), 4);

        let row_a = config.top_margin as i32 + config.row_height as i32;
        let row_b = row_a + config.row_height as i32;
        assert_eq!(
            cells,
            vec![
                (20, row_a, Rgba::MAGENTA.with_opacity(0.4)),
                (44, row_a, Rgba::TRANSPARENT),
                (20, row_b, Rgba::TRANSPARENT),
                (44, row_b, Rgba::ORANGE.with_opacity(0.2)),
            ]
        );
        assert_eq!((chart.width, chart.height), (880, 560));
    }

    #[test]
    fn column_labels_only_for_visible_days() {
        let config = ChartConfig::day();
        let chart = render(&[], "2016-01-01", "2016-01-04", &config);
        let labels = texts(&chart);
        assert!(labels.contains(&"2016-01-01"));
        assert!(labels.contains(&"2016-01-04"));
        assert!(!labels.contains(&"2016-01-02"));
        assert!(!labels.contains(&"2016-01-03"));
    }

    #[test]
    fn sections_stack_vertically() {
        let config = ChartConfig::day();
        let sections = [
            RepoSection::new("core", table(&[("2016-01-04", "b@x.org", 1, 0), ("2016-01-04", "a@x.org", 1, 0)])),
            RepoSection::new("web", table(&[("2016-01-05", "c@x.org", 1, 0)])),
        ];
        let chart = render(&sections, "2016-01-04", "2016-01-05", &config);
        let top = config.top_margin as i32;
        let rh = config.row_height as i32;
        assert_eq!(text_y(&chart, "core"), top + 7);
        assert_eq!(text_y(&chart, "a@x.org (1)"), top + rh + 5);
        assert_eq!(text_y(&chart, "b@x.org (1)"), top + 2 * rh + 5);
        assert_eq!(text_y(&chart, "web"), top + 3 * rh + 7);
        assert_eq!(text_y(&chart, "c@x.org (1)"), top + 4 * rh + 5);
    }

    #[test]
    fn author_colors_persist_across_sections() {
        let config = ChartConfig::day();
        let sections = [
            RepoSection::new("core", table(&[("2016-01-04", "a@x.org", 10, 0)])),
            RepoSection::new("web", table(&[("2016-01-04", "b@x.org", 10, 0), ("2016-01-04", "a@x.org", 10, 0)])),
        ];
        let chart = render(&sections, "2016-01-04", "2016-01-04", &config);
        let fills: Vec<Rgba> = cells(&chart, &config).into_iter().map(|c| c.2).collect();
        let a = Rgba::MAGENTA.with_opacity(0.2);
        let b = Rgba::ORANGE.with_opacity(0.2);
        assert_eq!(fills, vec![a, a, b]);
    }

    #[test]
    fn month_chart_ranks_authors_and_adds_footer() {
        let config = ChartConfig::month();
        let sections = [RepoSection::new(
            "swift",
            table(&[
                ("2015-12-03", "small@x.org", 10, 0),
                ("2016-01-10", "big@x.org", 2000, 0),
                ("2016-01-11", "big@x.org", 0, 100),
            ]),
        )];
        let chart = render(&sections, "2015-12-01", "2016-01-31", &config);
        let texts = texts(&chart);
        let big = texts.iter().position(|t| *t == "big@x.org (2100)").unwrap();
        let small = texts.iter().position(|t| *t == "small@x.org (10)").unwrap();
        assert!(big < small);
        assert!(texts.contains(&"Generated on 2016-03-01 with devheat"));

        let cells = cells(&chart, &config);
        // big@ is in the first author row; January sits after the December year gap.
        let big_row = config.top_margin as i32 + config.row_height as i32;
        assert!(cells.contains(&(20, big_row, Rgba::TRANSPARENT)));
        assert!(cells.contains(&(20 + 20, big_row, Rgba::MAGENTA.with_opacity(0.4))));
        assert!(chart.height >= config.top_margin + 3 * config.row_height);
    }

    #[test]
    fn legend_lists_every_band() {
        assert_eq!(
            legend_labels(&[0, 1000, 2500, 4000, 5000]),
            vec!["0", "0+", "1000+", "2500+", "4000+", "5000+"]
        );
        let config = ChartConfig::day();
        let chart = render(&[], "2016-01-04", "2016-01-04", &config);
        let swatches = chart
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count();
        assert_eq!(swatches, 6);
        assert!(texts(&chart).contains(&"Number of Lines Changed"));
        assert!(!texts(&chart).iter().any(|t| t.starts_with("Generated on")));
    }

    #[test]
    fn empty_buckets_are_rejected() {
        let mut colors = ColorAssigner::default();
        let err = layout(&[], &[], &ChartConfig::day(), &mut colors, d("2016-01-01")).unwrap_err();
        assert!(matches!(err, HeatError::InvalidRange(_)));
    }
}
