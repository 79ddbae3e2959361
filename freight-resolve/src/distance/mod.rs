//! Debounced, cached road-distance lookups.
//!
//! Rapid calls collapse to the last coordinate pair while the debounce timer
//! is pending. Once a lookup has fired it runs to completion; its result is
//! cached either way but only published if no later request superseded it.

use std::sync::Arc;
use std::time::Duration;

use freight_core::{
    DistanceProvider, FifoCache, Notice, NoticeSink, ProviderError, coordinate_pair_key,
    meters_to_kilometers,
};
use geo::Coord;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::debounce::{DebounceSlot, Ticket, delay_unless_cancelled};

/// Notice shown when a distance lookup fails.
pub const DISTANCE_FAILURE: &str = "Could not calculate the distance between these locations.";

/// Observable state of a [`DistanceEstimator`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistanceState {
    /// Whether the latest requested pair is being looked up.
    pub loading: bool,
    /// Distance for the latest requested pair; `None` while unresolved.
    pub kilometers: Option<f64>,
}

/// What [`DistanceEstimator::estimate`] did with a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceEstimate {
    /// The distance was cached.
    Cached(f64),
    /// A lookup will run once the debounce delay passes.
    Scheduled,
}

/// Tuning for [`DistanceEstimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Quiet period before a lookup is sent.
    pub debounce: Duration,
    /// Maximum number of cached coordinate pairs.
    pub cache_capacity: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            cache_capacity: 20,
        }
    }
}

impl EstimatorConfig {
    /// Override the debounce delay.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Override the cache capacity.
    #[must_use]
    pub const fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

#[derive(Debug)]
struct EstimatorState {
    cache: FifoCache<String, f64>,
    timer: DebounceSlot,
    latest: u64,
    published: watch::Sender<DistanceState>,
}

struct Inner {
    provider: Arc<dyn DistanceProvider>,
    notices: Arc<dyn NoticeSink>,
    config: EstimatorConfig,
    root: CancellationToken,
    state: Mutex<EstimatorState>,
}

/// Estimates the road distance between pickup and destination.
///
/// [`estimate`](Self::estimate) spawns onto the current Tokio runtime and
/// must be called from within one.
#[derive(Clone)]
pub struct DistanceEstimator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for DistanceEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceEstimator")
            .field("config", &self.inner.config)
            .field("shut_down", &self.inner.root.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl DistanceEstimator {
    /// Create an estimator with its own cancellation root.
    #[must_use]
    pub fn new(
        provider: Arc<dyn DistanceProvider>,
        notices: Arc<dyn NoticeSink>,
        config: EstimatorConfig,
    ) -> Self {
        Self::with_root(provider, notices, config, CancellationToken::new())
    }

    pub(crate) fn with_root(
        provider: Arc<dyn DistanceProvider>,
        notices: Arc<dyn NoticeSink>,
        config: EstimatorConfig,
        root: CancellationToken,
    ) -> Self {
        let (published, _) = watch::channel(DistanceState::default());
        Self {
            inner: Arc::new(Inner {
                provider,
                notices,
                config,
                root,
                state: Mutex::new(EstimatorState {
                    cache: FifoCache::new(config.cache_capacity),
                    timer: DebounceSlot::new(),
                    latest: 0,
                    published,
                }),
            }),
        }
    }

    /// Estimate the distance from `origin` to `destination`.
    ///
    /// Coordinates are compared at four decimal places, so points closer
    /// than roughly ten metres share a cache entry.
    pub fn estimate(&self, origin: Coord<f64>, destination: Coord<f64>) -> DistanceEstimate {
        let key = coordinate_pair_key(origin, destination);
        let mut state = self.inner.state.lock();
        state.latest += 1;
        let request = state.latest;

        if let Some(km) = state.cache.get(&key).copied() {
            log::debug!("distance cache hit for {key}");
            state.timer.cancel();
            state.published.send_replace(DistanceState {
                loading: false,
                kilometers: Some(km),
            });
            return DistanceEstimate::Cached(km);
        }

        let ticket = state.timer.arm(&self.inner.root);
        state.published.send_if_modified(|s| {
            let unresolved = DistanceState::default();
            let changed = *s != unresolved;
            *s = unresolved;
            changed
        });
        drop(state);

        log::debug!(
            "scheduling distance lookup for {key} in {:?}",
            self.inner.config.debounce
        );
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner
                .run_lookup(origin, destination, key, request, ticket)
                .await;
        });
        DistanceEstimate::Scheduled
    }

    /// Watch the estimator's state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DistanceState> {
        self.inner.state.lock().published.subscribe()
    }

    /// Snapshot of the estimator's state.
    #[must_use]
    pub fn state(&self) -> DistanceState {
        *self.inner.state.lock().published.borrow()
    }

    /// Latest resolved distance, or zero while unresolved.
    #[must_use]
    pub fn kilometers_or_zero(&self) -> f64 {
        self.state().kilometers.unwrap_or_default()
    }

    /// Cancel the pending timer and abort in-flight lookups.
    pub fn shutdown(&self) {
        self.inner.root.cancel();
        self.inner.state.lock().timer.cancel();
        log::debug!("distance estimator shut down");
    }
}

impl Inner {
    async fn run_lookup(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        key: String,
        request: u64,
        ticket: Ticket,
    ) {
        if !delay_unless_cancelled(ticket.token(), self.config.debounce).await {
            return;
        }

        {
            let mut state = self.state.lock();
            if !state.timer.is_current(&ticket) {
                return;
            }
            state.timer.release(&ticket);
            if state.latest == request {
                state.published.send_modify(|s| s.loading = true);
            }
        }

        let outcome = tokio::select! {
            biased;
            () = ticket.token().cancelled() => return,
            outcome = self.provider.distance_meters(origin, destination) => outcome,
        };
        let distance = outcome.and_then(|meters| {
            meters_to_kilometers(meters).ok_or_else(|| ProviderError::ParseError {
                message: format!("invalid route distance {meters} m"),
            })
        });

        let mut state = self.state.lock();
        let current = state.latest == request;
        match distance {
            Ok(km) => {
                state.cache.insert(key.clone(), km);
                if current {
                    log::debug!("distance for {key} is {km} km");
                    state.published.send_replace(DistanceState {
                        loading: false,
                        kilometers: Some(km),
                    });
                } else {
                    log::debug!("cached superseded distance for {key}");
                }
            }
            Err(err) => {
                log::warn!("distance lookup for {key} failed: {err}");
                if current {
                    state.published.send_replace(DistanceState {
                        loading: false,
                        kilometers: None,
                    });
                    drop(state);
                    self.notices.notify(Notice::error(DISTANCE_FAILURE));
                }
            }
        }
    }
}
