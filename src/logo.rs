use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use once_cell::unsync::OnceCell;

const BUILTIN_LOGO: [&str; 3] = ["  .-.  ", " ( o ) ", "  '-'  "];

/// Text logo shown in the header, exactly as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    lines: Vec<String>,
    source: Option<PathBuf>,
}

impl Logo {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read logo {}", path.display()))?;
        Ok(Self {
            lines: raw.lines().map(str::to_string).collect(),
            source: Some(path.to_path_buf()),
        })
    }

    pub fn builtin() -> Self {
        Self {
            lines: BUILTIN_LOGO.iter().map(|l| l.to_string()).collect(),
            source: None,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn width(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or_default()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Logo file read on first use and kept for the life of the process.
#[derive(Debug)]
pub struct LogoAsset {
    path: PathBuf,
    cell: OnceCell<Logo>,
}

impl LogoAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> &Logo {
        self.cell.get_or_init(|| match Logo::load(&self.path) {
            Ok(logo) => logo,
            Err(err) => {
                warn!("{err:#}; using built-in logo");
                Logo::builtin()
            }
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn asset_reads_file_once() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, " /\\ ").unwrap();
        writeln!(file, "/__\\").unwrap();

        let asset = LogoAsset::new(file.path());
        assert!(!asset.is_loaded());
        assert_eq!(asset.get().lines(), [" /\\ ", "/__\\"]);

        fs::write(file.path(), "changed\n").unwrap();
        assert_eq!(asset.get().height(), 2);
        assert_eq!(asset.get().source(), Some(file.path()));
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let asset = LogoAsset::new("/definitely/not/here/logo.txt");
        assert_eq!(asset.get(), &Logo::builtin());
        assert_eq!(asset.get().width(), 7);
    }
}
