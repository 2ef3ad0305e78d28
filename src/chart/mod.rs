pub mod canvas;
pub mod color;
pub mod config;
pub mod layout;

pub use canvas::{draw, find_system_font, load_font, DrawingSurface, RasterCanvas};
pub use color::{opacity_for, ColorAssigner, Rgba};
pub use config::ChartConfig;
pub use layout::{layout, ChartLayout, DrawCommand, RepoSection};

use crate::calendar::buckets;
use crate::cli::{ChartArgs, CommonArgs};
use crate::error::Result;
use crate::model::Granularity;
use crate::store::{self, TableSource};
use ab_glyph::FontVec;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use console::style;
use log::{info, warn};
use std::path::Path;

/// Repositories that made it into the chart, and the ones left out with why.
#[derive(Debug, Default)]
pub struct RenderSummary {
    pub rendered: Vec<String>,
    pub skipped: Vec<(String, String)>,
}

/// Loads every source; one that cannot be read is skipped, not fatal.
pub fn load_sections(sources: &[TableSource]) -> (Vec<RepoSection>, Vec<(String, String)>) {
    let mut sections = Vec::new();
    let mut skipped = Vec::new();
    for source in sources {
        match store::load(&source.path) {
            Ok(table) => sections.push(RepoSection::new(source.name.clone(), table)),
            Err(e) => {
                warn!("Skipping repository '{}': {e}", source.name);
                skipped.push((source.name.clone(), e.to_string()));
            }
        }
    }
    (sections, skipped)
}

/// Lays out `sections` over `from..=to` and writes the PNG to `out`.
pub fn render_sections(
    sections: &[RepoSection],
    from: NaiveDate,
    to: NaiveDate,
    config: &ChartConfig,
    colors: &mut ColorAssigner,
    font: Option<FontVec>,
    out: &Path,
) -> Result<ChartLayout> {
    let columns = buckets(from, to, config.granularity, &config.spacing)?;
    let chart = layout(sections, &columns, config, colors, Local::now().date_naive())?;

    let mut canvas = RasterCanvas::new(chart.width, chart.height, Rgba::WHITE);
    if let Some(font) = font {
        canvas = canvas.with_font(font, config.font_size);
    }
    draw(&chart, &mut canvas);
    canvas.save(out)?;
    Ok(chart)
}

pub fn render_files(
    sources: &[TableSource],
    from: NaiveDate,
    to: NaiveDate,
    config: &ChartConfig,
    font: Option<FontVec>,
    out: &Path,
) -> Result<RenderSummary> {
    let (sections, skipped) = load_sections(sources);
    let mut colors = ColorAssigner::default();
    render_sections(&sections, from, to, config, &mut colors, font, out)?;
    Ok(RenderSummary {
        rendered: sections.into_iter().map(|s| s.name).collect(),
        skipped,
    })
}

/// An explicit `--granularity` wins over the one in a `--config` file.
pub fn chart_config(args: &ChartArgs) -> anyhow::Result<ChartConfig> {
    let Some(path) = &args.config else {
        return Ok(ChartConfig::for_granularity(args.granularity.unwrap_or(Granularity::Day)));
    };
    let mut config = ChartConfig::load(path)
        .with_context(|| format!("Failed to read chart config {}", path.display()))?;
    if let Some(granularity) = args.granularity {
        if granularity != config.granularity {
            info!(
                "Overriding {} granularity from {} with --granularity {granularity}",
                config.granularity,
                path.display()
            );
        }
        config.granularity = granularity;
    }
    Ok(config)
}

/// An explicit font must load; otherwise the first system font found is used.
pub fn resolve_font(explicit: Option<&Path>) -> anyhow::Result<Option<FontVec>> {
    if let Some(path) = explicit {
        return load_font(path).map(Some).context("Failed to load font");
    }
    match find_system_font() {
        Some(path) => match load_font(&path) {
            Ok(font) => Ok(Some(font)),
            Err(e) => {
                warn!("{e}; labels will not be drawn");
                Ok(None)
            }
        },
        None => {
            warn!("No system font found, labels will not be drawn (use --font)");
            Ok(None)
        }
    }
}

pub fn exec(common: &CommonArgs, args: &ChartArgs, sources: &[TableSource]) -> anyhow::Result<()> {
    let (from, to) = common.range()?;
    let config = chart_config(args)?;
    let font = resolve_font(args.font.as_deref())?;

    let summary = render_files(sources, from, to, &config, font, &args.out)
        .context("Failed to render chart")?;

    print_summary(&summary, &args.out);
    Ok(())
}

pub fn print_summary(summary: &RenderSummary, out: &Path) {
    for (name, reason) in &summary.skipped {
        println!("{} {name}: {reason}", style("skipped").yellow());
    }
    println!(
        "{} {} ({} repositories)",
        style("wrote").green().bold(),
        out.display(),
        summary.rendered.len()
    );
}
