use crate::dataset::loader::load_dataset;
use crate::dataset::record::LocationDataset;
use crate::telemetry::log::LogManager;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Result of loading the location log. A failed load carries an empty dataset
/// and the message shown to the user.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Arc<LocationDataset>,
    pub error: Option<String>,
}

impl LoadOutcome {
    pub fn loaded(dataset: LocationDataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
            error: None,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            dataset: Arc::new(LocationDataset::empty()),
            error: Some(message),
        }
    }
}

/// Process-wide cache of the location log. The file is read at most once
/// until [`DatasetCache::invalidate`] is called.
pub struct DatasetCache {
    path: PathBuf,
    year: String,
    slot: RwLock<Option<Arc<LoadOutcome>>>,
    loads: AtomicUsize,
    logger: LogManager,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>, year: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            year: year.into(),
            slot: RwLock::new(None),
            loads: AtomicUsize::new(0),
            logger: LogManager::new("loader"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached outcome, loading the file on first use.
    pub fn get(&self) -> Arc<LoadOutcome> {
        if let Some(outcome) = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return outcome.clone();
        }

        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(outcome) = guard.as_ref() {
            return outcome.clone();
        }
        let outcome = Arc::new(self.load_now());
        *guard = Some(outcome.clone());
        outcome
    }

    /// Drops the cached outcome so the next [`DatasetCache::get`] rereads the file.
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.logger.record("dataset cache invalidated");
    }

    /// Number of times the file has actually been read.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn load_now(&self) -> LoadOutcome {
        self.loads.fetch_add(1, Ordering::Relaxed);
        match load_dataset(&self.path, &self.year) {
            Ok(dataset) => {
                self.logger.record(&format!(
                    "loaded {} records from {}",
                    dataset.len(),
                    self.path.display()
                ));
                LoadOutcome::loaded(dataset)
            }
            Err(err) => {
                let message = format!("Error loading data: {}", err);
                self.logger.error(&message);
                LoadOutcome::failed(message)
            }
        }
    }
}
