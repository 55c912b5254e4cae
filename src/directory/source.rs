//! Where dataset rows come from
//!
//! A [`CardSource`] produces the full row set of one dataset. Loading is
//! blocking (HTTP download, SQLite read); the directory runs it on tokio's
//! blocking pool.

use crate::directory::cdb;
use crate::directory::config::DirectoryConfig;
use crate::directory::record::{CardRecord, Dataset};
use crate::{DeckError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Supplier of complete dataset snapshots
pub trait CardSource: Send + Sync {
    /// Load every record of `dataset`
    fn load(&self, dataset: Dataset) -> Result<Vec<CardRecord>>;
}

/// Downloads `.cdb` files over HTTP and reads them
pub struct HttpSource {
    ignis_url: String,
    omega_url: String,
    cache_dir: PathBuf,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(config: &DirectoryConfig) -> Self {
        HttpSource {
            ignis_url: config.ignis_url.clone(),
            omega_url: config.omega_url.clone(),
            cache_dir: config.cache_dir.clone(),
            timeout: config.download_timeout,
        }
    }

    fn url(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Ignis => &self.ignis_url,
            Dataset::Omega => &self.omega_url,
        }
    }

    /// Cached file path for a dataset
    pub fn cache_path(&self, dataset: Dataset) -> PathBuf {
        let file = match dataset {
            Dataset::Ignis => "cards.cdb",
            Dataset::Omega => "OmegaDB.cdb",
        };
        self.cache_dir.join(file)
    }

    /// Download to a `.part` file and rename over the cached copy, so a failed
    /// download never leaves a truncated database behind
    fn download(&self, dataset: Dataset) -> Result<PathBuf> {
        let url = self.url(dataset);
        info!(%dataset, url, "downloading card database");

        // The blocking client owns a runtime; build and drop it on this
        // (blocking) thread only.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| DeckError::Upstream(format!("http client: {e}")))?;
        let bytes = client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(|e| DeckError::Upstream(format!("downloading {dataset} from {url}: {e}")))?;

        std::fs::create_dir_all(&self.cache_dir)?;
        let path = self.cache_path(dataset);
        let partial = path.with_extension("cdb.part");
        std::fs::write(&partial, &bytes)?;
        std::fs::rename(&partial, &path)?;
        debug!(%dataset, bytes = bytes.len(), path = %path.display(), "card database saved");
        Ok(path)
    }
}

impl CardSource for HttpSource {
    fn load(&self, dataset: Dataset) -> Result<Vec<CardRecord>> {
        let path = self.download(dataset)?;
        cdb::read_records(&path)
    }
}

/// Reads local `.cdb` files (offline mode)
pub struct FileSource {
    ignis: PathBuf,
    omega: PathBuf,
}

impl FileSource {
    pub fn new(ignis: impl Into<PathBuf>, omega: impl Into<PathBuf>) -> Self {
        FileSource {
            ignis: ignis.into(),
            omega: omega.into(),
        }
    }

    fn path(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::Ignis => &self.ignis,
            Dataset::Omega => &self.omega,
        }
    }
}

impl CardSource for FileSource {
    fn load(&self, dataset: Dataset) -> Result<Vec<CardRecord>> {
        let path = self.path(dataset);
        if !path.exists() {
            return Err(DeckError::Upstream(format!(
                "{dataset} database not found: {}",
                path.display()
            )));
        }
        cdb::read_records(path)
    }
}

/// Fixed in-memory records
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    ignis: Vec<CardRecord>,
    omega: Vec<CardRecord>,
}

impl MemorySource {
    pub fn new(ignis: Vec<CardRecord>, omega: Vec<CardRecord>) -> Self {
        MemorySource { ignis, omega }
    }
}

impl CardSource for MemorySource {
    fn load(&self, dataset: Dataset) -> Result<Vec<CardRecord>> {
        Ok(match dataset {
            Dataset::Ignis => self.ignis.clone(),
            Dataset::Omega => self.omega.clone(),
        })
    }
}
