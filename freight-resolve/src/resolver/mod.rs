//! Debounced, cached and cancellable place search per input channel.
//!
//! Each [`Channel`] keeps its own debounce slot and reactive state; the
//! search cache is shared between channels. A request's token covers both
//! its debounce timer and its network call, so issuing a new query cancels
//! whichever of the two is still outstanding.

use std::sync::Arc;
use std::time::Duration;

use freight_core::{
    CandidateLocation, FifoCache, GeocodingProvider, Location, Notice, NoticeSink,
    PlaceDetailsProvider, PlaceId, ProviderError,
};
use geo::Coord;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::debounce::{DebounceSlot, Ticket, delay_unless_cancelled};

/// Notice shown when a place search fails.
pub const SEARCH_FAILURE: &str = "Could not search locations. Please try again.";

/// Notice shown when a selected place cannot be resolved to coordinates.
pub const DETAILS_FAILURE: &str = "Could not get location details. Please try again.";

/// Logical search input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Where the cargo is collected.
    Pickup,
    /// Where the cargo is delivered.
    Destination,
}

impl Channel {
    /// Lowercase name used in logs and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Destination => "destination",
        }
    }
}

/// Observable state of one channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelState {
    /// Query whose results are shown or being fetched.
    pub query: String,
    /// Whether a search for `query` is in flight.
    pub loading: bool,
    /// Candidates for `query`.
    pub results: Vec<CandidateLocation>,
    /// Location the user selected, with coordinates.
    pub selected: Option<Location>,
}

/// What [`LocationResolver::resolve`] did with a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Results are available now: cached hits, or an empty list for a query
    /// that is too short.
    Immediate(Vec<CandidateLocation>),
    /// A search will run once the debounce delay passes.
    Scheduled,
    /// The query was already issued on this channel; nothing new happens.
    Suppressed,
}

/// Tuning for [`LocationResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Quiet period before a search is sent.
    pub debounce: Duration,
    /// Maximum number of cached queries.
    pub cache_capacity: usize,
    /// Shortest trimmed query, in characters, that triggers a search.
    pub min_query_chars: usize,
    /// ISO 3166-1 alpha-2 country restriction passed to the provider.
    pub country: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            cache_capacity: 50,
            min_query_chars: 2,
            country: None,
        }
    }
}

impl ResolverConfig {
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

    /// Override the minimum query length.
    #[must_use]
    pub const fn with_min_query_chars(mut self, chars: usize) -> Self {
        self.min_query_chars = chars;
        self
    }

    /// Restrict searches to `country`.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

#[derive(Debug)]
struct ChannelSlot {
    request: DebounceSlot,
    /// Key of the armed request, pending or in flight.
    armed_key: Option<String>,
    last_issued: Option<String>,
    published: watch::Sender<ChannelState>,
}

impl ChannelSlot {
    fn new() -> Self {
        let (published, _) = watch::channel(ChannelState::default());
        Self {
            request: DebounceSlot::new(),
            armed_key: None,
            last_issued: None,
            published,
        }
    }

    fn arm(&mut self, root: &CancellationToken, key: &str) -> Ticket {
        self.cancel();
        self.armed_key = Some(key.to_owned());
        self.request.arm(root)
    }

    /// Cancel the outstanding request. An issued request that never
    /// completed must not suppress a retry of the same query; a timer that
    /// never fired leaves the last issued query alone.
    fn cancel(&mut self) {
        let armed_key = self.armed_key.take();
        if self.request.cancel() && armed_key.is_some() && armed_key == self.last_issued {
            self.last_issued = None;
        }
    }

    fn release(&mut self, ticket: &Ticket) {
        if self.request.is_current(ticket) {
            self.armed_key = None;
        }
        self.request.release(ticket);
    }
}

#[derive(Debug)]
struct ResolverState {
    cache: FifoCache<String, Vec<CandidateLocation>>,
    pickup: ChannelSlot,
    destination: ChannelSlot,
}

impl ResolverState {
    const fn slot(&mut self, channel: Channel) -> &mut ChannelSlot {
        match channel {
            Channel::Pickup => &mut self.pickup,
            Channel::Destination => &mut self.destination,
        }
    }
}

struct Inner {
    geocoding: Arc<dyn GeocodingProvider>,
    details: Arc<dyn PlaceDetailsProvider>,
    notices: Arc<dyn NoticeSink>,
    config: ResolverConfig,
    root: CancellationToken,
    state: Mutex<ResolverState>,
}

/// Turns free text into candidate locations for the pickup and destination
/// inputs.
///
/// Queries shorter than the configured minimum resolve to nothing, cached
/// queries resolve immediately, and anything else is searched after a quiet
/// period. Only the latest query on a channel can publish results.
///
/// Scheduling spawns onto the current Tokio runtime, so
/// [`resolve`](Self::resolve) must be called from within one.
#[derive(Clone)]
pub struct LocationResolver {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("config", &self.inner.config)
            .field("shut_down", &self.inner.root.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl LocationResolver {
    /// Create a resolver with its own cancellation root.
    #[must_use]
    pub fn new(
        geocoding: Arc<dyn GeocodingProvider>,
        details: Arc<dyn PlaceDetailsProvider>,
        notices: Arc<dyn NoticeSink>,
        config: ResolverConfig,
    ) -> Self {
        Self::with_root(geocoding, details, notices, config, CancellationToken::new())
    }

    pub(crate) fn with_root(
        geocoding: Arc<dyn GeocodingProvider>,
        details: Arc<dyn PlaceDetailsProvider>,
        notices: Arc<dyn NoticeSink>,
        config: ResolverConfig,
        root: CancellationToken,
    ) -> Self {
        let state = ResolverState {
            cache: FifoCache::new(config.cache_capacity),
            pickup: ChannelSlot::new(),
            destination: ChannelSlot::new(),
        };
        Self {
            inner: Arc::new(Inner {
                geocoding,
                details,
                notices,
                config,
                root,
                state: Mutex::new(state),
            }),
        }
    }

    /// Resolve `query` on `channel`.
    ///
    /// Results of a scheduled search are published to the channel's
    /// [`subscribe`](Self::subscribe) receiver.
    pub fn resolve(&self, query: &str, channel: Channel) -> Resolution {
        let trimmed = query.trim();
        let key = trimmed.to_lowercase();
        let mut state = self.inner.state.lock();

        if trimmed.chars().count() < self.inner.config.min_query_chars {
            let slot = state.slot(channel);
            slot.cancel();
            slot.last_issued = None;
            slot.published.send_modify(|s| {
                s.query = trimmed.to_owned();
                s.loading = false;
                s.results.clear();
            });
            return Resolution::Immediate(Vec::new());
        }

        if let Some(hit) = state.cache.get(&key).filter(|hit| !hit.is_empty()).cloned() {
            log::debug!("{} search cache hit for {key:?}", channel.as_str());
            let slot = state.slot(channel);
            slot.cancel();
            slot.last_issued = Some(key);
            slot.published.send_modify(|s| {
                s.query = trimmed.to_owned();
                s.loading = false;
                s.results.clone_from(&hit);
            });
            return Resolution::Immediate(hit);
        }

        let slot = state.slot(channel);
        if slot.armed_key.as_deref() == Some(key.as_str()) {
            log::debug!("{} search for {key:?} already pending", channel.as_str());
            return Resolution::Suppressed;
        }
        slot.cancel();
        if slot.last_issued.as_deref() == Some(key.as_str()) {
            log::debug!("{} search for {key:?} already issued", channel.as_str());
            return Resolution::Suppressed;
        }
        let ticket = slot.arm(&self.inner.root, &key);
        drop(state);

        log::debug!(
            "scheduling {} search for {key:?} in {:?}",
            channel.as_str(),
            self.inner.config.debounce
        );
        let inner = Arc::clone(&self.inner);
        let text = trimmed.to_owned();
        tokio::spawn(async move { inner.run_search(channel, text, key, ticket).await });
        Resolution::Scheduled
    }

    /// Watch `channel`'s state.
    #[must_use]
    pub fn subscribe(&self, channel: Channel) -> watch::Receiver<ChannelState> {
        self.inner.state.lock().slot(channel).published.subscribe()
    }

    /// Snapshot of `channel`'s state.
    #[must_use]
    pub fn state(&self, channel: Channel) -> ChannelState {
        self.inner.state.lock().slot(channel).published.borrow().clone()
    }

    /// Look up the coordinates of `place_id`.
    ///
    /// # Errors
    ///
    /// Returns the place-details provider's error.
    pub async fn get_coordinates(&self, place_id: &PlaceId) -> Result<Coord<f64>, ProviderError> {
        self.inner.details.coordinates(place_id).await
    }

    /// Resolve `candidate` to coordinates and make it `channel`'s selection.
    ///
    /// # Errors
    ///
    /// Returns the place-details provider's error after notifying the user;
    /// the previous selection is kept.
    pub async fn select(
        &self,
        channel: Channel,
        candidate: &CandidateLocation,
    ) -> Result<Location, ProviderError> {
        match self.get_coordinates(&candidate.place_id).await {
            Ok(coord) => {
                let location = Location::new(candidate.description.clone(), coord);
                self.inner
                    .state
                    .lock()
                    .slot(channel)
                    .published
                    .send_modify(|s| s.selected = Some(location.clone()));
                Ok(location)
            }
            Err(err) => {
                log::warn!(
                    "details for {} place {} failed: {err}",
                    channel.as_str(),
                    candidate.place_id
                );
                self.inner.notices.notify(Notice::error(DETAILS_FAILURE));
                Err(err)
            }
        }
    }

    /// Cancel every pending timer and in-flight search on every channel.
    pub fn shutdown(&self) {
        self.inner.root.cancel();
        let mut state = self.inner.state.lock();
        state.pickup.cancel();
        state.destination.cancel();
        log::debug!("location resolver shut down");
    }
}

impl Inner {
    async fn run_search(&self, channel: Channel, text: String, key: String, ticket: Ticket) {
        if !delay_unless_cancelled(ticket.token(), self.config.debounce).await {
            return;
        }

        {
            let mut state = self.state.lock();
            let slot = state.slot(channel);
            if !slot.request.is_current(&ticket) {
                return;
            }
            slot.last_issued = Some(key.clone());
            slot.published.send_modify(|s| {
                s.query.clone_from(&text);
                s.loading = true;
            });
        }

        let outcome = tokio::select! {
            biased;
            () = ticket.token().cancelled() => return,
            outcome = self.geocoding.search(&text, self.config.country.as_deref()) => outcome,
        };

        let mut state = self.state.lock();
        if !state.slot(channel).request.is_current(&ticket) {
            log::debug!("discarding superseded {} search for {key:?}", channel.as_str());
            return;
        }
        match outcome {
            Ok(results) => {
                log::debug!(
                    "{} search for {key:?} returned {} candidate(s)",
                    channel.as_str(),
                    results.len()
                );
                state.cache.insert(key, results.clone());
                let slot = state.slot(channel);
                slot.release(&ticket);
                slot.published.send_modify(|s| {
                    s.loading = false;
                    s.results = results;
                });
            }
            Err(err) => {
                log::warn!("{} search for {key:?} failed: {err}", channel.as_str());
                let slot = state.slot(channel);
                slot.release(&ticket);
                slot.last_issued = None;
                slot.published.send_modify(|s| {
                    s.loading = false;
                    s.results.clear();
                });
                drop(state);
                self.notices.notify(Notice::error(SEARCH_FAILURE));
            }
        }
    }
}

#[cfg(test)]
mod tests;
