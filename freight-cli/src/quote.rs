//! `quote` command: price a shipment, falling back to local rates.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use freight_core::{CategoryId, CostBreakdown, Notice, NoticeSink};
use freight_data::HttpClientConfig;
use freight_resolve::{CostEstimator, CostSource, FallbackRates};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::providers::{NoticeLog, ProviderFactory};
use crate::{
    ARG_BACKEND_BASE_URL, ARG_CATEGORY, ARG_DISTANCE_KM, ARG_FALLBACK_RATES, ARG_WEIGHT_KG,
    CliError, ENV_QUOTE_CATEGORY, ENV_QUOTE_WEIGHT_KG,
};

/// Which local rate table to use when pricing is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum RatesArg {
    /// 500 per km and 50 per kg.
    #[default]
    BookingForm,
    /// 1000 per km and 100 per kg.
    QuotePreview,
}

impl From<RatesArg> for FallbackRates {
    fn from(value: RatesArg) -> Self {
        match value {
            RatesArg::BookingForm => Self::BOOKING_FORM,
            RatesArg::QuotePreview => Self::QUOTE_PREVIEW,
        }
    }
}

/// CLI arguments for the `quote` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ask the pricing service for a quote. When the service fails \
                 the price is estimated from local per-km and per-kg rates \
                 and a notice says so.",
    about = "Price a shipment"
)]
#[ortho_config(prefix = "FREIGHT")]
pub(crate) struct QuoteArgs {
    /// Cargo weight in kilograms.
    #[arg(long = ARG_WEIGHT_KG, value_name = "kg")]
    #[serde(default)]
    pub(crate) weight_kg: Option<f64>,
    /// Route distance in kilometers; zero when unknown.
    #[arg(long = ARG_DISTANCE_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) distance_km: Option<f64>,
    /// Cargo category id.
    #[arg(long = ARG_CATEGORY, value_name = "id")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Local rate table used when pricing is unavailable.
    #[arg(long = ARG_FALLBACK_RATES, value_enum, value_name = "table")]
    #[serde(default)]
    pub(crate) fallback_rates: Option<RatesArg>,
    /// Base URL of the booking backend.
    #[arg(long = ARG_BACKEND_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) backend_base_url: Option<String>,
}

impl QuoteArgs {
    pub(crate) fn into_config(self) -> Result<QuoteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        QuoteConfig::try_from(merged)
    }
}

/// Resolved `quote` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QuoteConfig {
    pub(crate) weight_kg: f64,
    pub(crate) distance_km: f64,
    pub(crate) category: CategoryId,
    pub(crate) rates: FallbackRates,
    pub(crate) backend_base_url: String,
}

impl TryFrom<QuoteArgs> for QuoteConfig {
    type Error = CliError;

    fn try_from(args: QuoteArgs) -> Result<Self, Self::Error> {
        let weight_kg = args.weight_kg.ok_or(CliError::MissingArgument {
            field: ARG_WEIGHT_KG,
            env: ENV_QUOTE_WEIGHT_KG,
        })?;
        let category = args
            .category
            .map(CategoryId::new)
            .filter(|id| !id.is_blank())
            .ok_or(CliError::MissingArgument {
                field: ARG_CATEGORY,
                env: ENV_QUOTE_CATEGORY,
            })?;
        Ok(Self {
            weight_kg,
            distance_km: args.distance_km.unwrap_or_default(),
            category,
            rates: args.fallback_rates.unwrap_or_default().into(),
            backend_base_url: args
                .backend_base_url
                .unwrap_or_else(|| HttpClientConfig::default().base_url),
        })
    }
}

/// Result printed by `quote`.
#[derive(Debug, Serialize)]
pub(crate) struct QuoteOutput {
    pub(crate) cost: f64,
    pub(crate) source: &'static str,
    pub(crate) breakdown: Option<CostBreakdown>,
    pub(crate) notices: Vec<Notice>,
}

/// Price the configured shipment.
pub(crate) async fn run_quote(
    config: &QuoteConfig,
    factory: &dyn ProviderFactory,
) -> Result<QuoteOutput, CliError> {
    let backend = factory.backend(&config.backend_base_url)?;
    let notices = Arc::new(NoticeLog::default());
    let estimator = CostEstimator::new(
        backend.pricing,
        Arc::clone(&notices) as Arc<dyn NoticeSink>,
        config.rates,
    );
    let estimate = estimator
        .estimate(config.weight_kg, config.distance_km, &config.category)
        .await?;
    Ok(QuoteOutput {
        cost: estimate.cost,
        source: match estimate.source {
            CostSource::Provider => "provider",
            CostSource::Fallback => "fallback",
        },
        breakdown: estimate.breakdown,
        notices: notices.take(),
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<QuoteConfig, CliError> {
    let merged = QuoteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    QuoteConfig::try_from(merged)
}
