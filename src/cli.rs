use crate::model::Granularity;
use crate::store::TableSource;
use crate::util::parse_day;
use crate::vcs::Vcs;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devheat")]
#[command(about = "Commit activity heatmaps from git and Mercurial history")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "First day of the range (YYYY-MM-DD)")]
    pub from: String,

    #[arg(long, help = "Last day of the range (YYYY-MM-DD)")]
    pub to: String,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(short, long, help = "Hide progress spinners")]
    pub quiet: bool,
}

impl CommonArgs {
    /// Validated `(from, to)` bounds.
    pub fn range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let from = parse_day(&self.from).context("Invalid --from")?;
        let to = parse_day(&self.to).context("Invalid --to")?;
        if from > to {
            anyhow::bail!("Invalid range: --from {from} is after --to {to}");
        }
        Ok((from, to))
    }
}

#[derive(Args, Clone)]
pub struct ChartArgs {
    #[arg(long, short, help = "Output PNG path")]
    pub out: PathBuf,

    #[arg(long, value_enum, help = "Column granularity [default: day, or the --config value]")]
    pub granularity: Option<Granularity>,

    #[arg(long, help = "JSON chart configuration replacing the built-in preset")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "TrueType/OpenType font used for labels")]
    pub font: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read VCS history and write one JSON activity table per repository
    Extract {
        #[arg(long, value_enum, default_value_t = Vcs::Git, help = "Version control system")]
        vcs: Vcs,

        #[arg(long, help = "Directory for the JSON files (default: current directory)")]
        out_dir: Option<PathBuf>,

        #[arg(required = true, help = "Repository paths")]
        repos: Vec<PathBuf>,
    },
    /// Render a heatmap PNG from previously extracted JSON tables
    Render {
        #[clap(flatten)]
        chart: ChartArgs,

        #[arg(required = true, help = "Tables as NAME=PATH (or PATH, named after the file)")]
        sources: Vec<TableSource>,
    },
    /// Extract and render in one run
    Chart {
        #[arg(long, value_enum, default_value_t = Vcs::Git, help = "Version control system")]
        vcs: Vcs,

        #[clap(flatten)]
        chart: ChartArgs,

        #[arg(long, help = "Also save the extracted JSON tables into this directory")]
        save_json: Option<PathBuf>,

        #[arg(required = true, help = "Repository paths")]
        repos: Vec<PathBuf>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Extract { vcs, out_dir, repos } => {
                crate::extract::exec(&self.common, vcs, &repos, out_dir)
            }
            Commands::Render { chart, sources } => {
                crate::chart::exec(&self.common, &chart, &sources)
            }
            Commands::Chart {
                vcs,
                chart,
                save_json,
                repos,
            } => crate::extract::exec_chart(&self.common, vcs, &chart, &repos, save_json),
        }
    }
}
