use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ingest::validate_metrics_map;
use crate::rating::{NicheInput, RatingEngine, ThresholdsUpdate, WeightsUpdate};

/// Contents of `config.yaml`.
///
/// Example YAML:
/// ```yaml
/// weights:
///   demand: 40
///   organic: 10
/// thresholds:
///   min_revenue: 2000000
/// niches:
///   - name: Hair masks
///     metrics:
///       demand_ratio: 8.5
///       revenue: 3500000
///       price_ad_ratio: 35
///       organic_percent: 70
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Weight overrides; keys left out keep their defaults
    #[serde(default, skip_serializing_if = "WeightsUpdate::is_empty")]
    pub weights: WeightsUpdate,

    #[serde(default, skip_serializing_if = "ThresholdsUpdate::is_empty")]
    pub thresholds: ThresholdsUpdate,

    /// Saved niches for `compare`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub niches: Vec<NicheEntry>,
}

/// A niche as written by hand. Metrics stay untyped until validated so that
/// every problem in the file can be reported at once.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NicheEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub metrics: Map<String, Value>,
}

impl Config {
    /// Build an engine from the defaults plus this config's overrides.
    pub fn engine(&self) -> RatingEngine {
        let mut engine = RatingEngine::default();
        engine.update_weights(&self.weights);
        engine.update_thresholds(&self.thresholds);
        engine
    }
}

/// Validate niche entries, collecting every error with its position.
pub fn validate_niches(entries: &[NicheEntry]) -> Result<Vec<NicheInput>, Vec<String>> {
    let mut niches = Vec::new();
    let mut errors = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        match validate_metrics_map(&entry.metrics) {
            Ok(metrics) => niches.push(NicheInput {
                name: entry.name.clone(),
                metrics,
            }),
            Err(entry_errors) => errors.extend(
                entry_errors
                    .into_iter()
                    .map(|e| format!("niches[{}].metrics.{}", i, e)),
            ),
        }
    }

    if errors.is_empty() {
        Ok(niches)
    } else {
        Err(errors)
    }
}
