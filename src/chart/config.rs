use super::color::Rgba;
use crate::calendar::ColumnSpacing;
use crate::error::Result;
use crate::model::Granularity;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry and color constants of one chart. Not mutated once rendering starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub granularity: Granularity,
    pub spacing: ColumnSpacing,
    pub row_height: u32,
    pub left_margin: u32,
    pub top_margin: u32,
    /// Ascending line-count cut points, one opacity step each.
    pub thresholds: Vec<u64>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Grow the canvas height to fit every row instead of clipping.
    #[serde(default)]
    pub grow_to_fit: bool,
    pub legend_color: Rgba,
    #[serde(default)]
    pub footer: bool,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_font_size() -> f32 {
    11.0
}

impl ChartConfig {
    pub fn day() -> Self {
        Self {
            granularity: Granularity::Day,
            spacing: ColumnSpacing {
                col_width: 20,
                rest_day_gap: 2,
                year_gap: 0,
                rest_days: vec![Weekday::Sat, Weekday::Sun],
            },
            row_height: 20,
            left_margin: 20,
            top_margin: 100,
            thresholds: vec![0, 1000, 2500, 4000, 5000],
            canvas_width: 880,
            canvas_height: 560,
            grow_to_fit: false,
            legend_color: Rgba::GRAY,
            footer: false,
            font_size: default_font_size(),
        }
    }

    pub fn week() -> Self {
        Self {
            granularity: Granularity::Week,
            spacing: ColumnSpacing {
                rest_days: Vec::new(),
                ..Self::day().spacing
            },
            thresholds: vec![0, 2500, 6000, 12000, 20000],
            grow_to_fit: true,
            ..Self::day()
        }
    }

    pub fn month() -> Self {
        Self {
            granularity: Granularity::Month,
            spacing: ColumnSpacing {
                col_width: 16,
                rest_day_gap: 2,
                year_gap: 4,
                rest_days: Vec::new(),
            },
            row_height: 16,
            left_margin: 20,
            top_margin: 80,
            thresholds: vec![0, 1500, 3000, 6000, 15000],
            canvas_width: 1400,
            canvas_height: 400,
            grow_to_fit: true,
            legend_color: Rgba::ORANGE,
            footer: true,
            font_size: default_font_size(),
        }
    }

    pub fn for_granularity(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Self::day(),
            Granularity::Week => Self::week(),
            Granularity::Month => Self::month(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn col_width(&self) -> u32 {
        self.spacing.col_width
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::day()
    }
}
