use crate::activity::aggregate;
use crate::chart::{self, ColorAssigner, RenderSummary, RepoSection};
use crate::cli::{ChartArgs, CommonArgs};
use crate::error::Result;
use crate::model::ActivityTable;
use crate::store;
use crate::util::day_key;
use crate::vcs::{capture_stdout, Vcs};
use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Runs the VCS log for `repo` over `from..to` and folds it into a table.
pub fn extract_table(vcs: Vcs, repo: &Path, from: &str, to: &str) -> Result<ActivityTable> {
    let text = capture_stdout(vcs.log_command(repo, from, to))?;
    let records = vcs.parse(&text)?;
    debug!("Parsed {} {vcs} records from {}", records.len(), repo.display());
    Ok(aggregate(&records))
}

pub fn repo_name(repo: &Path) -> String {
    repo.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo.display().to_string())
}

fn spinner(quiet: bool, message: String) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(message);
    pb
}

struct Extracted {
    tables: Vec<(PathBuf, ActivityTable)>,
    skipped: Vec<(String, String)>,
}

/// Extracts each repository in turn. A failing repository is logged and
/// skipped; tables keep input order.
fn extract_all(common: &CommonArgs, vcs: Vcs, repos: &[PathBuf]) -> anyhow::Result<Extracted> {
    let (from, to) = common.range()?;
    let (from, to) = (day_key(from), day_key(to));

    let mut tables = Vec::new();
    let mut skipped = Vec::new();
    for repo in repos {
        let pb = spinner(common.quiet, format!("Reading {vcs} log of {}", repo.display()));
        let result = extract_table(vcs, repo, &from, &to);
        pb.finish_and_clear();

        match result {
            Ok(table) => tables.push((repo.clone(), table)),
            Err(e) => {
                warn!("Skipping repository {}: {e}", repo.display());
                skipped.push((repo.display().to_string(), e.to_string()));
            }
        }
    }

    if tables.is_empty() {
        anyhow::bail!("No repository could be extracted");
    }
    Ok(Extracted { tables, skipped })
}

fn save_tables(
    common: &CommonArgs,
    tables: &[(PathBuf, ActivityTable)],
    out_dir: &Path,
) -> anyhow::Result<()> {
    let (from, to) = common.range()?;
    let (from, to) = (day_key(from), day_key(to));
    for (repo, table) in tables {
        let path = out_dir.join(store::table_file_name(repo, &from, &to));
        store::save(table, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{} {} ({} days)",
            style("wrote").green().bold(),
            path.display(),
            table.day_count()
        );
    }
    Ok(())
}

pub fn exec(
    common: &CommonArgs,
    vcs: Vcs,
    repos: &[PathBuf],
    out_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let extracted = extract_all(common, vcs, repos)?;
    for (repo, reason) in &extracted.skipped {
        println!("{} {repo}: {reason}", style("skipped").yellow());
    }
    let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
    save_tables(common, &extracted.tables, &out_dir)
}

pub fn exec_chart(
    common: &CommonArgs,
    vcs: Vcs,
    args: &ChartArgs,
    repos: &[PathBuf],
    save_json: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (from, to) = common.range()?;
    let config = chart::chart_config(args)?;
    let font = chart::resolve_font(args.font.as_deref())?;

    let Extracted { tables, skipped } = extract_all(common, vcs, repos)?;
    if let Some(dir) = save_json {
        save_tables(common, &tables, &dir)?;
    }

    let sections: Vec<RepoSection> = tables
        .into_iter()
        .map(|(repo, table)| RepoSection::new(repo_name(&repo), table))
        .collect();

    let mut colors = ColorAssigner::default();
    chart::render_sections(&sections, from, to, &config, &mut colors, font, &args.out)
        .context("Failed to render chart")?;

    let summary = RenderSummary {
        rendered: sections.into_iter().map(|s| s.name).collect(),
        skipped,
    };
    chart::print_summary(&summary, &args.out);
    Ok(())
}
