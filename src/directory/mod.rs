//! Card directory: id/name/type lookups over two card databases
//!
//! The directory holds one immutable [`DirectorySnapshot`] at a time behind
//! an `Arc`. A refresh loads both datasets off the async threads, builds a
//! complete new snapshot, and swaps the pointer. Readers clone the `Arc` and
//! keep using whatever snapshot they grabbed, so a lookup never sees a mix
//! of old and new data.
//!
//! Lifecycle:
//! 1. [`CardDirectory::start`] awaits the first refresh, then spawns the
//!    background refresh task.
//! 2. [`CardDirectory::refresh_now`] forces a reload at any time.
//! 3. [`CardDirectory::stop`] ends the background task.

pub mod cdb;
pub mod config;
pub mod flags;
pub mod record;
pub mod snapshot;
pub mod source;

pub use config::DirectoryConfig;
pub use flags::{TypeFlag, TypeFlags};
pub use record::{CardRecord, Dataset, Scope};
pub use snapshot::{DatasetIndex, DirectorySnapshot};
pub use source::{CardSource, FileSource, HttpSource, MemorySource};

use crate::{DeckError, Result};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Counts from a successful refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    pub ignis_cards: usize,
    pub omega_cards: usize,
    pub duration: Duration,
}

struct Refresher {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodically refreshed card lookup table
pub struct CardDirectory {
    source: Arc<dyn CardSource>,
    config: DirectoryConfig,
    current: RwLock<Arc<DirectorySnapshot>>,
    /// Serializes refreshes so two loads never race to swap
    refresh_lock: tokio::sync::Mutex<()>,
    refresher: Mutex<Option<Refresher>>,
}

impl CardDirectory {
    /// Create a directory with an empty snapshot; call [`start`](Self::start)
    /// before doing lookups
    pub fn new(source: impl CardSource + 'static, config: DirectoryConfig) -> Arc<Self> {
        Arc::new(CardDirectory {
            source: Arc::new(source),
            config: config.validated(),
            current: RwLock::new(Arc::new(DirectorySnapshot::empty())),
            refresh_lock: tokio::sync::Mutex::new(()),
            refresher: Mutex::new(None),
        })
    }

    /// A ready-to-use directory over fixed records, with periodic refresh
    /// disabled
    pub fn from_records(ignis: Vec<CardRecord>, omega: Vec<CardRecord>) -> Arc<Self> {
        let snapshot = DirectorySnapshot::new(ignis.clone(), omega.clone());
        let directory = CardDirectory::new(
            MemorySource::new(ignis, omega),
            DirectoryConfig::default().with_refresh_interval(Duration::ZERO),
        );
        directory.install(snapshot);
        directory
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Load the first snapshot, then start refreshing in the background
    ///
    /// Fails if the first refresh fails: no lookup is meaningful before one
    /// has succeeded.
    pub async fn start(self: &Arc<Self>) -> Result<RefreshStats> {
        let stats = self.refresh_now().await?;

        if let Some(period) = self.config.refresh_period() {
            let (shutdown, shutdown_rx) = watch::channel(false);
            let handle = tokio::spawn(refresh_loop(Arc::downgrade(self), period, shutdown_rx));
            let previous = self
                .refresher
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .replace(Refresher { shutdown, handle });
            if let Some(previous) = previous {
                previous.handle.abort();
            }
            info!(period_secs = period.as_secs(), "card directory refresh scheduled");
        }
        Ok(stats)
    }

    /// Reload both datasets and swap in the new snapshot
    ///
    /// On failure the current snapshot is left untouched.
    pub async fn refresh_now(&self) -> Result<RefreshStats> {
        let _guard = self.refresh_lock.lock().await;
        let started = Instant::now();
        let source = Arc::clone(&self.source);

        let loaded = tokio::task::spawn_blocking(move || -> Result<DirectorySnapshot> {
            let ignis = source.load(Dataset::Ignis)?;
            let omega = source.load(Dataset::Omega)?;
            Ok(DirectorySnapshot::new(ignis, omega))
        })
        .await
        .map_err(DeckError::from)
        .and_then(|result| result);

        let snapshot = match loaded {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "card directory refresh failed, keeping previous snapshot");
                return Err(match e {
                    DeckError::Upstream(_) => e,
                    other => DeckError::Upstream(other.to_string()),
                });
            }
        };

        let stats = RefreshStats {
            ignis_cards: snapshot.dataset(Dataset::Ignis).len(),
            omega_cards: snapshot.dataset(Dataset::Omega).len(),
            duration: started.elapsed(),
        };
        self.install(snapshot);
        info!(
            ignis = stats.ignis_cards,
            omega = stats.omega_cards,
            elapsed_ms = stats.duration.as_millis() as u64,
            "card directory refreshed"
        );
        Ok(stats)
    }

    /// Stop the background refresh task, if running
    pub async fn stop(&self) {
        let refresher = self
            .refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(refresher) = refresher {
            let _ = refresher.shutdown.send(true);
            if let Err(e) = refresher.handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "card directory refresh task ended abnormally");
                }
            }
            info!("card directory refresh stopped");
        }
    }

    /// True while the background refresh task is running
    pub fn is_refreshing_periodically(&self) -> bool {
        self.refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    fn install(&self, snapshot: DirectorySnapshot) {
        let snapshot = Arc::new(snapshot);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// The current snapshot
    ///
    /// Hold on to it for the length of one conversion so every lookup in
    /// that conversion answers from the same data.
    pub fn snapshot(&self) -> Arc<DirectorySnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn name_for_id(&self, id: u32, scope: Scope) -> Result<String> {
        self.snapshot().name_for_id(id, scope).map(str::to_string)
    }

    pub fn id_for_name(&self, name: &str, scope: Scope) -> Result<u32> {
        self.snapshot().id_for_name(name, scope)
    }

    pub fn type_flags_for_id(&self, id: u32, scope: Scope) -> Result<TypeFlags> {
        self.snapshot().type_flags_for_id(id, scope)
    }

    pub fn record_for_id(&self, id: u32, scope: Scope) -> Result<Arc<CardRecord>> {
        self.snapshot().record_for_id(id, scope).map(Arc::clone)
    }
}

async fn refresh_loop(
    directory: Weak<CardDirectory>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(directory) = directory.upgrade() else {
                    debug!("card directory dropped, ending refresh task");
                    return;
                };
                // Failures are logged inside and leave the old snapshot live
                let _ = directory.refresh_now().await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return;
                }
            }
        }
    }
}
