//! Read-only access to the per-exchange price file tree.
//!
//! Layout: `{root}/{exchange}/{ticker}.csv`. Reports produced by earlier runs
//! (`{ticker}_outliers.csv`) live alongside the inputs and are never listed
//! as tickers.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;

const PRICE_FILE_EXTENSION: &str = ".csv";

/// Suffix appended to a ticker to name its report file.
pub const REPORT_SUFFIX: &str = "_outliers.csv";

#[derive(Debug, Clone)]
pub struct PriceFileStore {
    root: PathBuf,
}

impl PriceFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins a caller-supplied relative path onto the data root.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] for absolute paths or paths with
    /// `..` components.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, StoreError> {
        let candidate = Path::new(relative);
        let safe = !relative.is_empty()
            && candidate
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(StoreError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(candidate))
    }

    /// Reads every line of a file under the data root.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the file does not exist,
    /// [`StoreError::InvalidPath`] if the path escapes the root, or
    /// [`StoreError::Io`] for other read failures.
    pub fn read_lines(&self, relative: &str) -> Result<Vec<String>, StoreError> {
        let path = self.resolve(relative)?;
        Self::read_file(&path)
    }

    /// Reads the price file of one ticker.
    ///
    /// # Errors
    ///
    /// See [`PriceFileStore::read_lines`].
    pub fn read_ticker(&self, exchange: &str, ticker: &str) -> Result<Vec<String>, StoreError> {
        Self::read_file(&self.price_path(exchange, ticker))
    }

    /// Reads every line of an arbitrary file, outside any data root.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the file does not exist or
    /// [`StoreError::Io`] for other read failures.
    pub fn read_file(path: &Path) -> Result<Vec<String>, StoreError> {
        let contents =
            fs::read_to_string(path).map_err(|e| StoreError::from_io(path.to_path_buf(), e))?;
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();
        debug!(path = %path.display(), lines = lines.len(), "read price file");
        Ok(lines)
    }

    #[must_use]
    pub fn price_path(&self, exchange: &str, ticker: &str) -> PathBuf {
        self.root
            .join(exchange)
            .join(format!("{ticker}{PRICE_FILE_EXTENSION}"))
    }

    #[must_use]
    pub fn report_path(&self, exchange: &str, ticker: &str) -> PathBuf {
        self.root.join(exchange).join(format!("{ticker}{REPORT_SUFFIX}"))
    }

    /// Lists exchange directories, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the data root is missing.
    pub fn exchanges(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in Self::read_dir(&self.root)? {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Lists tickers with a price file in `exchange`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the exchange directory is missing.
    pub fn tickers(&self, exchange: &str) -> Result<Vec<String>, StoreError> {
        let mut tickers = Vec::new();
        for entry in Self::read_dir(&self.root.join(exchange))? {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !is_file || name.ends_with(REPORT_SUFFIX) {
                continue;
            }
            if let Some(ticker) = name.strip_suffix(PRICE_FILE_EXTENSION) {
                if !ticker.is_empty() {
                    tickers.push(ticker.to_string());
                }
            }
        }
        tickers.sort();
        Ok(tickers)
    }

    fn read_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, StoreError> {
        fs::read_dir(dir)
            .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
            .map_err(|e| StoreError::from_io(dir.to_path_buf(), e))
    }
}
