use std::cmp::Ordering;
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::table;

pub const EXPECTED_COLUMNS: [&str; 10] = [
    "Season",
    "Team",
    "MatchID",
    "Player",
    "Runs",
    "Wickets",
    "Strike Rate",
    "Economy Rate",
    "Overs Bowled",
    "AllRounder Score",
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("dataset {} is missing columns: {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("malformed row at line {line} of {}: {source}", .path.display())]
    Row {
        path: PathBuf,
        line: u64,
        source: csv::Error,
    },
}

/// Season label. Integer labels compare numerically, anything else as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Season(String);

impl Season {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

impl Ord for Season {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Season {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Season {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// One player-match observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Season")]
    pub season: Season,
    #[serde(rename = "Team")]
    pub team: String,
    /// Integer ids are stored canonically, so `01` and `1` are one match.
    #[serde(rename = "MatchID", deserialize_with = "canonical_match_id")]
    pub match_id: String,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Runs")]
    pub runs: u32,
    #[serde(rename = "Wickets")]
    pub wickets: u32,
    #[serde(rename = "Strike Rate", deserialize_with = "blank_as_nan")]
    pub strike_rate: f64,
    #[serde(rename = "Economy Rate", deserialize_with = "blank_as_nan")]
    pub economy_rate: f64,
    #[serde(rename = "Overs Bowled", deserialize_with = "blank_as_nan")]
    pub overs_bowled: f64,
    /// Precomputed per-row input, unrelated to the derived per-player score.
    #[serde(rename = "AllRounder Score", deserialize_with = "blank_as_nan")]
    pub allrounder_score: f64,
}

fn canonical_match_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(match raw.trim().parse::<i64>() {
        Ok(id) => id.to_string(),
        Err(_) => raw,
    })
}

/// Empty rate cells (a batter who never bowled) load as NaN.
fn blank_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Immutable table of records loaded from one source.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Local>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            source: None,
            loaded_at: Local::now(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }

    pub fn players(&self) -> Vec<String> {
        table::distinct(&self.records, |r| r.player.clone())
    }

    pub fn match_ids(&self) -> Vec<String> {
        table::distinct(&self.records, |r| r.match_id.clone())
    }

    pub fn teams(&self) -> Vec<String> {
        table::distinct(&self.records, |r| r.team.clone())
    }

    pub fn seasons(&self) -> Vec<Season> {
        let mut seasons = table::distinct(&self.records, |r| r.season.clone());
        seasons.sort();
        seasons
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_dataset_from_reader(file, path)?;
    info!(
        "loaded {} records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

pub fn load_dataset_from_reader<R: Read>(rdr: R, source: &Path) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|source_err| csv_error(source, source_err))?
        .clone();
    let missing: Vec<String> = EXPECTED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns {
            path: source.to_path_buf(),
            missing,
        });
    }
    for extra in headers.iter().filter(|h| !EXPECTED_COLUMNS.contains(h)) {
        debug!("ignoring extra column {extra:?} in {}", source.display());
    }

    let mut records = Vec::new();
    for result in reader.deserialize::<Record>() {
        match result {
            Ok(record) => records.push(record),
            Err(err) => {
                let line = err.position().map(|pos| pos.line()).unwrap_or_default();
                if line == 0 {
                    return Err(csv_error(source, err));
                }
                return Err(DatasetError::Row {
                    path: source.to_path_buf(),
                    line,
                    source: err,
                });
            }
        }
    }

    Ok(Dataset {
        records,
        source: Some(source.to_path_buf()),
        loaded_at: Local::now(),
    })
}

fn csv_error(path: &Path, source: csv::Error) -> DatasetError {
    DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    digest: [u8; 32],
}

impl Fingerprint {
    fn of(bytes: &[u8]) -> Self {
        Self {
            len: bytes.len() as u64,
            digest: Sha256::digest(bytes).into(),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    fingerprint: Fingerprint,
    dataset: Arc<Dataset>,
}

/// Load-once cache keyed on the source path and a SHA-256 of its contents.
///
/// Every lookup reads the file to hash it; only a changed digest re-parses.
/// Edits that keep the bytes identical, or a touched mtime, are cache hits.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, DatasetError> {
        let bytes = fs::read(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fingerprint = Fingerprint::of(&bytes);
        if let Some(entry) = &self.entry {
            if entry.path == path && entry.fingerprint == fingerprint {
                debug!("dataset cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        let dataset = Arc::new(load_dataset_from_reader(bytes.as_slice(), path)?);
        info!(
            "loaded {} records from {}",
            dataset.len(),
            path.display()
        );
        self.loads += 1;
        self.entry = Some(CacheEntry {
            path: path.to_path_buf(),
            fingerprint,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Number of times the source was actually read.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.entry.as_ref().map(|entry| Arc::clone(&entry.dataset))
    }
}
