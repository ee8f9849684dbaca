use std::path::PathBuf;

use crate::analysis::{DEFAULT_LEADERBOARD_ROWS, RenderOptions};

pub const DEFAULT_DATASET_PATH: &str = "data/ipl_dataset.csv";
pub const DEFAULT_LOGO_PATH: &str = "assets/ipl_logo.txt";
const MAX_LEADERBOARD_ROWS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub logo_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub leaderboard_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            log_file: None,
            leaderboard_rows: DEFAULT_LEADERBOARD_ROWS,
        }
    }
}

impl AppConfig {
    /// Reads `IPL_*` variables. Call after the `.env` files have been loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };
        let defaults = Self::default();

        let leaderboard_rows = non_empty("IPL_LEADERBOARD_ROWS")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(defaults.leaderboard_rows)
            .clamp(1, MAX_LEADERBOARD_ROWS);

        Self {
            dataset_path: non_empty("IPL_DATASET")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),
            logo_path: non_empty("IPL_LOGO")
                .map(PathBuf::from)
                .unwrap_or(defaults.logo_path),
            log_file: non_empty("IPL_LOG_FILE").map(PathBuf::from),
            leaderboard_rows,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            leaderboard_rows: self.leaderboard_rows,
        }
    }
}
