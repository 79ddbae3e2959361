//! HTTP adapters for the freight booking collaborators.
//!
//! Responsibilities:
//! - Implement the `freight_core` provider traits over HTTP with `reqwest`.
//! - Map transport failures, service statuses and backend rejections onto
//!   [`freight_core::ProviderError`].
//!
//! Boundaries:
//! - No caching, debouncing or retries; those belong to the calling
//!   component.
//! - No domain validation (lives in `freight-planner`).
//!
//! Invariants:
//! - Every request carries the configured timeout and user agent.
//! - Backend rejection messages are passed through verbatim.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backend;
mod http;
mod osrm;
mod places;

pub use backend::HttpBackendClient;
pub use http::{DEFAULT_USER_AGENT, HttpClientConfig, ProviderBuildError};
pub use osrm::{DEFAULT_OSRM_BASE_URL, HttpDistanceProvider};
pub use places::{DEFAULT_PLACES_BASE_URL, HttpPlacesProvider, PlacesConfig};
