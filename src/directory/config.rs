//! Card directory configuration

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Where the directory gets its data and how often it refreshes
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Download URL of the Ignis (BabelCDB) `cards.cdb`
    pub ignis_url: String,
    /// Download URL of `OmegaDB.cdb`
    pub omega_url: String,
    /// Directory downloaded `.cdb` files are written to
    pub cache_dir: PathBuf,
    /// Time between background refreshes. Zero disables them; the directory
    /// then only refreshes on `start()` and explicit `refresh_now()` calls.
    pub refresh_interval: Duration,
    /// Upper bound on one dataset download
    pub download_timeout: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            ignis_url: "https://github.com/ProjectIgnis/BabelCDB/raw/master/cards.cdb".to_string(),
            omega_url: "https://duelistsunite.org/omega/OmegaDB.cdb".to_string(),
            cache_dir: std::env::temp_dir().join("deckforge"),
            refresh_interval: Self::DEFAULT_REFRESH_INTERVAL,
            download_timeout: Duration::from_secs(60),
        }
    }
}

impl DirectoryConfig {
    pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
    /// Shortest non-zero refresh interval accepted
    pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

    pub fn with_urls(mut self, ignis_url: impl Into<String>, omega_url: impl Into<String>) -> Self {
        self.ignis_url = ignis_url.into();
        self.omega_url = omega_url.into();
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Fix out-of-range values so the config is safe to use
    ///
    /// - A non-zero `refresh_interval` is raised to [`Self::MIN_REFRESH_INTERVAL`].
    /// - A zero `download_timeout` is replaced with the default; downloads
    ///   always carry a bound.
    pub fn validated(mut self) -> Self {
        if !self.refresh_interval.is_zero() && self.refresh_interval < Self::MIN_REFRESH_INTERVAL {
            warn!(
                interval_secs = self.refresh_interval.as_secs(),
                min_secs = Self::MIN_REFRESH_INTERVAL.as_secs(),
                "refresh interval below minimum, raising"
            );
            self.refresh_interval = Self::MIN_REFRESH_INTERVAL;
        }
        if self.download_timeout.is_zero() {
            self.download_timeout = Self::default().download_timeout;
        }
        self
    }

    /// Background refresh period, `None` when periodic refresh is disabled
    pub fn refresh_period(&self) -> Option<Duration> {
        if self.refresh_interval.is_zero() {
            None
        } else {
            Some(self.refresh_interval)
        }
    }
}
