use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Percentage weight of each metric in the final rating.
///
/// Weights are plain percentages (0-100). They are not required to sum to
/// 100: the engine uses them as given, so a sum above 100 lets the final
/// rating climb above 100 as well.
///
/// Example YAML:
/// ```yaml
/// weights:
///   demand: 30
///   revenue: 25
///   ads: 25
///   organic: 20
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    /// Demand/supply ratio (search queries per listed product)
    pub demand: f64,
    /// Category revenue per month
    pub revenue: f64,
    /// Advertising efficiency (price to bid ratio)
    pub ads: f64,
    /// Share of organic positions in search results
    pub organic: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            demand: 30.0,
            revenue: 25.0,
            ads: 25.0,
            organic: 20.0,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.demand + self.revenue + self.ads + self.organic
    }

    /// Merge the keys present in `update`, leaving the others untouched.
    pub fn merge(&mut self, update: &WeightsUpdate) {
        if let Some(v) = update.demand {
            self.demand = v;
        }
        if let Some(v) = update.revenue {
            self.revenue = v;
        }
        if let Some(v) = update.ads {
            self.ads = v;
        }
        if let Some(v) = update.organic {
            self.organic = v;
        }
    }
}

/// Floor values below which a sub-score is forced to zero.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    /// Minimum monthly category revenue (default: 1,000,000)
    pub min_revenue: f64,
    /// Minimum demand/supply ratio (default: 1.0)
    pub min_demand_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_revenue: 1_000_000.0,
            min_demand_ratio: 1.0,
        }
    }
}

impl Thresholds {
    /// Merge the keys present in `update`, leaving the others untouched.
    pub fn merge(&mut self, update: &ThresholdsUpdate) {
        if let Some(v) = update.min_revenue {
            self.min_revenue = v;
        }
        if let Some(v) = update.min_demand_ratio {
            self.min_demand_ratio = v;
        }
    }
}

/// Partial weights, as read from the config file or built from CLI flags.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ads: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic: Option<f64>,
}

impl WeightsUpdate {
    pub fn is_empty(&self) -> bool {
        self.demand.is_none()
            && self.revenue.is_none()
            && self.ads.is_none()
            && self.organic.is_none()
    }

    /// Set a single weight by its metric key.
    pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
        match key.trim().to_lowercase().as_str() {
            "demand" => self.demand = Some(value),
            "revenue" => self.revenue = Some(value),
            "ads" => self.ads = Some(value),
            "organic" => self.organic = Some(value),
            other => bail!(
                "Unknown weight '{}': expected one of demand, revenue, ads, organic",
                other
            ),
        }
        Ok(())
    }

    /// Parse a "key=value" pair, e.g. "demand=40".
    pub fn parse_pair(s: &str) -> Result<(String, f64)> {
        let Some((key, value)) = s.split_once('=') else {
            bail!("Weight must be in key=value form: {}", s);
        };
        let value: f64 = value.trim().parse()?;
        Ok((key.trim().to_string(), value))
    }
}

/// Partial thresholds, same merge semantics as [`WeightsUpdate`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_demand_ratio: Option<f64>,
}

impl ThresholdsUpdate {
    pub fn is_empty(&self) -> bool {
        self.min_revenue.is_none() && self.min_demand_ratio.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = Weights::default();
        assert_eq!(weights.demand, 30.0);
        assert_eq!(weights.revenue, 25.0);
        assert_eq!(weights.ads, 25.0);
        assert_eq!(weights.organic, 20.0);
        assert_eq!(weights.sum(), 100.0);
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.min_revenue, 1_000_000.0);
        assert_eq!(thresholds.min_demand_ratio, 1.0);
    }

    #[test]
    fn test_merge_keeps_absent_keys() {
        let mut weights = Weights::default();
        weights.merge(&WeightsUpdate {
            demand: Some(50.0),
            ..Default::default()
        });
        assert_eq!(weights.demand, 50.0);
        assert_eq!(weights.revenue, 25.0);
        assert_eq!(weights.ads, 25.0);
        assert_eq!(weights.organic, 20.0);
    }

    #[test]
    fn test_threshold_merge() {
        let mut thresholds = Thresholds::default();
        thresholds.merge(&ThresholdsUpdate {
            min_revenue: None,
            min_demand_ratio: Some(2.5),
        });
        assert_eq!(thresholds.min_revenue, 1_000_000.0);
        assert_eq!(thresholds.min_demand_ratio, 2.5);
    }

    #[test]
    fn test_set_by_key() {
        let mut update = WeightsUpdate::default();
        update.set("Ads", 40.0).unwrap();
        assert_eq!(update.ads, Some(40.0));
        assert!(update.set("price", 10.0).is_err());
    }

    #[test]
    fn test_parse_pair() {
        let (key, value) = WeightsUpdate::parse_pair("organic = 15").unwrap();
        assert_eq!(key, "organic");
        assert_eq!(value, 15.0);
        assert!(WeightsUpdate::parse_pair("organic").is_err());
        assert!(WeightsUpdate::parse_pair("organic=lots").is_err());
    }

    #[test]
    fn test_partial_weights_parse() {
        let yaml = r#"
demand: 40
organic: 10
"#;
        let update: WeightsUpdate = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(update.demand, Some(40.0));
        assert_eq!(update.organic, Some(10.0));
        assert!(update.revenue.is_none());
    }

    #[test]
    fn test_unknown_weight_key_rejected() {
        let yaml = "price: 10";
        let parsed: Result<WeightsUpdate, _> = serde_saphyr::from_str(yaml);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_updates() {
        assert!(WeightsUpdate::default().is_empty());
        assert!(ThresholdsUpdate::default().is_empty());
    }
}
