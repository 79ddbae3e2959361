//! `search` command: resolve a free-text query to candidate locations.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use freight_core::{CandidateLocation, Notice, NoticeSink};
use freight_data::DEFAULT_PLACES_BASE_URL;
use freight_resolve::{Channel, LocationResolver, Resolution, ResolverConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::providers::{NoticeLog, ProviderFactory};
use crate::{
    ARG_CHANNEL, ARG_COUNTRY, ARG_PLACES_API_KEY, ARG_PLACES_BASE_URL, ARG_QUERY, CliError,
    ENV_SEARCH_PLACES_API_KEY, ENV_SEARCH_QUERY,
};

/// Search input a query is typed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ChannelArg {
    #[default]
    Pickup,
    Destination,
}

impl From<ChannelArg> for Channel {
    fn from(value: ChannelArg) -> Self {
        match value {
            ChannelArg::Pickup => Self::Pickup,
            ChannelArg::Destination => Self::Destination,
        }
    }
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search the places service for candidate locations. The query \
                 is debounced and cached exactly as in an interactive booking \
                 form; candidates are printed as JSON.",
    about = "Search for candidate locations"
)]
#[ortho_config(prefix = "FREIGHT")]
pub(crate) struct SearchArgs {
    /// Free-text location query.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Input the query belongs to.
    #[arg(long = ARG_CHANNEL, value_enum, value_name = "channel")]
    #[serde(default)]
    pub(crate) channel: Option<ChannelArg>,
    /// Base URL of the places service.
    #[arg(long = ARG_PLACES_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) places_base_url: Option<String>,
    /// API key for the places service.
    #[arg(long = ARG_PLACES_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) places_api_key: Option<String>,
    /// ISO 3166-1 alpha-2 country restriction (e.g. "rw").
    #[arg(long = ARG_COUNTRY, value_name = "code")]
    #[serde(default)]
    pub(crate) country: Option<String>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) query: String,
    pub(crate) channel: Channel,
    pub(crate) places_base_url: String,
    pub(crate) places_api_key: String,
    pub(crate) country: Option<String>,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let query = args.query.ok_or(CliError::MissingArgument {
            field: ARG_QUERY,
            env: ENV_SEARCH_QUERY,
        })?;
        let places_api_key = args
            .places_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_PLACES_API_KEY,
                env: ENV_SEARCH_PLACES_API_KEY,
            })?;
        Ok(Self {
            query,
            channel: args.channel.unwrap_or_default().into(),
            places_base_url: args
                .places_base_url
                .unwrap_or_else(|| DEFAULT_PLACES_BASE_URL.to_owned()),
            places_api_key,
            country: args.country.filter(|code| !code.trim().is_empty()),
        })
    }
}

/// Result printed by `search`.
#[derive(Debug, Serialize)]
pub(crate) struct SearchOutput {
    pub(crate) query: String,
    pub(crate) channel: &'static str,
    pub(crate) candidates: Vec<CandidateLocation>,
    pub(crate) notices: Vec<Notice>,
}

/// Resolve the configured query once, waiting out the debounce delay.
pub(crate) async fn run_search(
    config: &SearchConfig,
    factory: &dyn ProviderFactory,
) -> Result<SearchOutput, CliError> {
    let places = factory.places(&config.places_base_url, &config.places_api_key)?;
    let notices = Arc::new(NoticeLog::default());
    let mut resolver_config = ResolverConfig::default();
    if let Some(country) = &config.country {
        resolver_config = resolver_config.with_country(country.clone());
    }
    let resolver = LocationResolver::new(
        places.geocoding,
        places.details,
        Arc::clone(&notices) as Arc<dyn NoticeSink>,
        resolver_config,
    );

    let mut updates = resolver.subscribe(config.channel);
    let candidates = match resolver.resolve(&config.query, config.channel) {
        Resolution::Immediate(candidates) => candidates,
        Resolution::Scheduled | Resolution::Suppressed => {
            let target = config.query.trim();
            updates
                .wait_for(|state| state.query == target && !state.loading)
                .await
                .map(|state| state.results.clone())
                .unwrap_or_default()
        }
    };
    resolver.shutdown();

    Ok(SearchOutput {
        query: config.query.clone(),
        channel: config.channel.as_str(),
        candidates,
        notices: notices.take(),
    })
}
