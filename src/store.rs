use crate::error::{HeatError, Result};
use crate::model::ActivityTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name for an extracted table: `<repo>_<from>_<to>.json`.
pub fn table_file_name(repo: &Path, from: &str, to: &str) -> String {
    let name = repo
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "repository".to_string());
    format!("{name}_{from}_{to}.json")
}

pub fn save(table: &ActivityTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(table)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a persisted table. Any read or decode failure is `DataUnavailable`.
pub fn load(path: &Path) -> Result<ActivityTable> {
    let text = fs::read_to_string(path).map_err(|e| HeatError::unavailable(path, e))?;
    serde_json::from_str(&text).map_err(|e| HeatError::unavailable(path, e))
}

/// A named repository section backed by a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub name: String,
    pub path: PathBuf,
}

impl TableSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl std::str::FromStr for TableSource {
    type Err = String;

    /// `name=path`, or a bare path whose file stem becomes the name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some((name, path)) = s.split_once('=') {
            if name.is_empty() || path.is_empty() {
                return Err(format!("Invalid source '{s}': expected NAME=PATH"));
            }
            return Ok(Self::new(name, path));
        }
        let path = PathBuf::from(s);
        let name = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| format!("Invalid source '{s}': no file name"))?;
        Ok(Self::new(name, path))
    }
}
