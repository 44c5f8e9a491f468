use std::{
    sync::{Arc, RwLock},
    thread::{self, JoinHandle},
};

use log::{error, info, warn};

use crate::{errors::ItineraryError, feed::Feed, types::Itinerary};

/// Outcome of the single itinerary fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Pending,
    Loaded(Arc<Itinerary>),
    Unavailable(String),
}

/// Fetches the itinerary once on a background thread.
///
/// Until the fetch succeeds [`ItineraryLoader::latest`] returns `None`. A
/// failed fetch is not retried and leaves the itinerary unavailable.
pub struct ItineraryLoader {
    state: Arc<RwLock<LoadState>>,
    worker: Option<JoinHandle<()>>,
}

impl ItineraryLoader {
    /// Starts the fetch. `on_settled` runs once the fetch has either loaded
    /// the itinerary or given up.
    pub fn spawn<F: Feed>(
        feed: F,
        on_settled: impl FnOnce() + Send + 'static,
    ) -> Result<Self, ItineraryError> {
        let state = Arc::new(RwLock::new(LoadState::Pending));
        let shared = Arc::clone(&state);

        let worker = thread::Builder::new()
            .name("itinerary-loader".to_string())
            .spawn(move || {
                let outcome = load(&feed);
                match shared.write() {
                    Ok(mut state) => *state = outcome,
                    Err(_) => error!("Failed to acquire lock on the itinerary state."),
                }
                on_settled();
            })
            .map_err(|e| ItineraryError::Spawn(e.to_string()))?;

        Ok(Self {
            state,
            worker: Some(worker),
        })
    }

    pub fn state(&self) -> LoadState {
        match self.state.read() {
            Ok(state) => state.clone(),
            Err(_) => LoadState::Unavailable("itinerary state lock poisoned".to_string()),
        }
    }

    /// The loaded itinerary, or `None` while pending or after a failure.
    pub fn latest(&self) -> Option<Arc<Itinerary>> {
        match self.state() {
            LoadState::Loaded(itinerary) => Some(itinerary),
            _ => None,
        }
    }

    /// Blocks until the fetch has settled.
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Itinerary loader thread panicked.");
            }
        }
    }
}

fn load<F: Feed>(feed: &F) -> LoadState {
    match feed.fetch() {
        Ok(itinerary) => {
            if itinerary.skipped > 0 {
                warn!(
                    "Skipped {} malformed destination(s) from {}",
                    itinerary.skipped,
                    feed.describe()
                );
            }
            info!(
                "Loaded {} destinations from {}",
                itinerary.len(),
                feed.describe()
            );
            LoadState::Loaded(Arc::new(itinerary))
        }
        Err(e) => {
            error!("Itinerary unavailable: {e}");
            LoadState::Unavailable(e.to_string())
        }
    }
}
