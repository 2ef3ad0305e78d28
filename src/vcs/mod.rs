pub mod parse;
pub mod process;

use crate::error::Result;
use crate::model::CommitRecord;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

pub use parse::{parse_git_log, parse_hg_log};
pub use process::capture_stdout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Vcs {
    Git,
    #[value(alias = "hg")]
    Mercurial,
}

impl Vcs {
    pub fn program(&self) -> &'static str {
        match self {
            Vcs::Git => "git",
            Vcs::Mercurial => "hg",
        }
    }

    /// Log invocation producing the text `parse` expects, for commits in `from..to`.
    pub fn log_command(&self, repo: &Path, from: &str, to: &str) -> Command {
        let mut command = Command::new(self.program());
        match self {
            Vcs::Git => {
                command
                    .arg("-C")
                    .arg(repo)
                    .args(["log", "--pretty=%aI %ae", "--shortstat"])
                    .arg(format!("--after={from}"))
                    .arg(format!("--before={to}"));
            }
            Vcs::Mercurial => {
                command
                    .args([
                        "log",
                        "--template",
                        "{date(date,'%Y-%m-%d')} {author|email} {diffstat}\\n",
                        "--date",
                    ])
                    .arg(format!("{from} to {to}"))
                    .arg("--repository")
                    .arg(repo);
            }
        }
        command
    }

    pub fn parse(&self, text: &str) -> Result<Vec<CommitRecord>> {
        match self {
            Vcs::Git => parse_git_log(text),
            Vcs::Mercurial => parse_hg_log(text),
        }
    }
}

impl std::fmt::Display for Vcs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vcs::Git => write!(f, "git"),
            Vcs::Mercurial => write!(f, "mercurial"),
        }
    }
}
