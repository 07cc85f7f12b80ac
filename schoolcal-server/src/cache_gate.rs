//! File-backed cache in front of the schedule source.
//!
//! Rendered calendars live at `<cache_dir>/<office>/<school>.ics`. A request
//! first looks for a fresh file; otherwise it takes the per-school lock,
//! looks again (another request may have just refreshed it), and only then
//! fetches, renders and stores a new document.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use schoolcal_core::{
    Freshness, ScheduleSource, SchoolCalConfig, SchoolCalResult, SchoolKey, render_calendar,
};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// How a calendar was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from a fresh cache file.
    Hit,
    /// No usable cache file; fetched and rendered.
    Miss,
    /// The cache file was stale; fetched and rendered again.
    Refreshed,
}

#[derive(Debug)]
pub struct CachedCalendar {
    pub ics: String,
    pub status: CacheStatus,
}

pub struct CacheGate<S> {
    source: S,
    cache_dir: PathBuf,
    cache_days: u32,
    in_flight: DashMap<SchoolKey, Arc<Mutex<()>>>,
}

impl<S: ScheduleSource> CacheGate<S> {
    pub fn new(source: S, config: &SchoolCalConfig) -> Self {
        CacheGate {
            source,
            cache_dir: config.cache_path(),
            cache_days: config.cache_days,
            in_flight: DashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn path_for(&self, key: &SchoolKey) -> PathBuf {
        self.cache_dir
            .join(key.office_code())
            .join(format!("{}.ics", key.school_code()))
    }

    /// Return the calendar for `key`, from cache when fresh.
    pub async fn calendar(&self, key: &SchoolKey) -> SchoolCalResult<CachedCalendar> {
        if let (Freshness::Fresh(generated_at), Some(ics)) = self.lookup(key).await {
            debug!(%key, %generated_at, "cache hit");
            return Ok(CachedCalendar {
                ics,
                status: CacheStatus::Hit,
            });
        }

        let claim = InFlight::claim(&self.in_flight, key);
        let _guard = claim.lock.lock().await;
        match self.lookup(key).await {
            (Freshness::Fresh(_), Some(ics)) => {
                debug!(%key, "cache filled while waiting");
                Ok(CachedCalendar {
                    ics,
                    status: CacheStatus::Hit,
                })
            }
            (previous, _) => self.refresh(key, previous).await,
        }
    }

    /// Read the cache file. Read errors count as a miss.
    async fn lookup(&self, key: &SchoolKey) -> (Freshness, Option<String>) {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(%key, path = %path.display(), error = %e, "unreadable cache file, treating as miss");
                None
            }
        };

        let freshness = Freshness::of_document(content.as_deref(), Utc::now(), self.cache_days);
        (freshness, content)
    }

    async fn refresh(
        &self,
        key: &SchoolKey,
        previous: Freshness,
    ) -> SchoolCalResult<CachedCalendar> {
        info!(%key, ?previous, "fetching schedule from NEIS");

        let response = self
            .source
            .fetch(key.office_code(), key.school_code())
            .await?;

        if response.skipped > 0 {
            warn!(%key, skipped = response.skipped, "dropped schedule rows with malformed dates");
        }

        let display_name = response
            .school_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(key.school_code());
        let ics = render_calendar(display_name, &response.records, Utc::now());

        // A calendar that could not be written is still worth serving.
        if let Err(e) = self.store(key, &ics).await {
            error!(%key, error = %e, "could not write cache file");
        }

        let status = match previous {
            Freshness::Stale(_) => CacheStatus::Refreshed,
            _ => CacheStatus::Miss,
        };
        Ok(CachedCalendar { ics, status })
    }

    /// Write through a temporary file so readers never see a partial document.
    async fn store(&self, key: &SchoolKey, ics: &str) -> io::Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("ics.tmp");
        fs::write(&tmp, ics).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

/// A claim on the per-school lock. The map entry is removed when the last
/// claim goes away, including when the request future is dropped early.
struct InFlight<'a> {
    map: &'a DashMap<SchoolKey, Arc<Mutex<()>>>,
    key: &'a SchoolKey,
    lock: Arc<Mutex<()>>,
}

impl<'a> InFlight<'a> {
    fn claim(map: &'a DashMap<SchoolKey, Arc<Mutex<()>>>, key: &'a SchoolKey) -> Self {
        let lock = map.entry(key.clone()).or_default().clone();
        InFlight { map, key, lock }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // Held only by the map and this claim.
        self.map.remove_if(self.key, |_, lock| {
            Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2
        });
    }
}
