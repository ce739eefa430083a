use serde_json::{Map, Value};

use crate::rating::{RawMetrics, Thresholds, Weights};

const DEMAND_RATIO: &str = "demand_ratio";
const REVENUE: &str = "revenue";
const PRICE_AD_RATIO: &str = "price_ad_ratio";
const ORGANIC_PERCENT: &str = "organic_percent";

pub const METRIC_FIELDS: [&str; 4] = [DEMAND_RATIO, REVENUE, PRICE_AD_RATIO, ORGANIC_PERCENT];

fn check_metric(field: &str, value: f64, errors: &mut Vec<String>) {
    if !value.is_finite() {
        errors.push(format!("{}: must be a finite number", field));
    } else if value < 0.0 {
        errors.push(format!("{}: must be non-negative", field));
    }
}

/// Validate typed metrics before they reach the engine.
/// Returns all validation errors at once (not just the first).
pub fn validate_metrics(metrics: &RawMetrics) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    check_metric(DEMAND_RATIO, metrics.demand_ratio, &mut errors);
    check_metric(REVENUE, metrics.revenue, &mut errors);
    check_metric(PRICE_AD_RATIO, metrics.price_ad_ratio, &mut errors);
    check_metric(ORGANIC_PERCENT, metrics.organic_percent, &mut errors);

    if metrics.organic_percent > 100.0 {
        errors.push(format!("{}: cannot exceed 100%", ORGANIC_PERCENT));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an untyped metrics map (from a YAML or JSON niche file) and turn
/// it into [`RawMetrics`].
///
/// Reports every missing field, every non-numeric field, every negative
/// field and an organic share above 100, all in one pass.
pub fn validate_metrics_map(map: &Map<String, Value>) -> Result<RawMetrics, Vec<String>> {
    let mut errors = Vec::new();
    let mut values = [0.0; 4];

    for (slot, field) in values.iter_mut().zip(METRIC_FIELDS) {
        match map.get(field) {
            None => errors.push(format!("{}: missing", field)),
            Some(value) => match value.as_f64() {
                Some(v) => *slot = v,
                None => errors.push(format!("{}: must be a number, got {}", field, value)),
            },
        }
    }

    let [demand_ratio, revenue, price_ad_ratio, organic_percent] = values;
    let metrics = RawMetrics {
        demand_ratio,
        revenue,
        price_ad_ratio,
        organic_percent,
    };

    // Range checks only apply to fields that were present and numeric
    if let Err(range_errors) = validate_metrics(&metrics) {
        errors.extend(range_errors.into_iter().filter(|e| {
            let field = e.split(':').next().unwrap_or_default();
            map.get(field).is_some_and(Value::is_number)
        }));
    }

    if errors.is_empty() {
        Ok(metrics)
    } else {
        Err(errors)
    }
}

/// Validate weights and thresholds at startup.
/// The weight sum is not checked here; see [`weights_sum_warning`].
pub fn validate_config(weights: &Weights, thresholds: &Thresholds) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (key, value) in [
        ("demand", weights.demand),
        ("revenue", weights.revenue),
        ("ads", weights.ads),
        ("organic", weights.organic),
    ] {
        if !(0.0..=100.0).contains(&value) {
            errors.push(format!("weights.{}: must be between 0 and 100", key));
        }
    }

    if thresholds.min_revenue.is_nan() || thresholds.min_revenue <= 0.0 {
        errors.push("thresholds.min_revenue: must be positive".to_string());
    }
    if thresholds.min_demand_ratio.is_nan() || thresholds.min_demand_ratio < 0.0 {
        errors.push("thresholds.min_demand_ratio: must be non-negative".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Warning text when the weights do not add up to 100.
pub fn weights_sum_warning(weights: &Weights) -> Option<String> {
    let sum = weights.sum();
    if (sum - 100.0).abs() > 1e-9 {
        Some(format!(
            "Weights sum to {}% instead of 100%; the final rating is not normalized",
            sum
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_valid_metrics() {
        let metrics = RawMetrics {
            demand_ratio: 8.5,
            revenue: 3_500_000.0,
            price_ad_ratio: 35.0,
            organic_percent: 70.0,
        };
        assert!(validate_metrics(&metrics).is_ok());
        assert!(validate_metrics(&RawMetrics::default()).is_ok());
    }

    #[test]
    fn test_negative_and_over_100() {
        let metrics = RawMetrics {
            demand_ratio: -1.0,
            revenue: 10.0,
            price_ad_ratio: -2.0,
            organic_percent: 120.0,
        };
        let errors = validate_metrics(&metrics).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("demand_ratio"));
        assert!(errors[1].contains("price_ad_ratio"));
        assert!(errors[2].contains("100%"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let metrics = RawMetrics {
            revenue: f64::NAN,
            ..Default::default()
        };
        let errors = validate_metrics(&metrics).unwrap_err();
        assert_eq!(errors, vec!["revenue: must be a finite number".to_string()]);
    }

    #[test]
    fn test_map_valid() {
        let map = as_map(json!({
            "demand_ratio": 2.1,
            "revenue": 800000,
            "price_ad_ratio": 12,
            "organic_percent": 30.0
        }));
        let metrics = validate_metrics_map(&map).unwrap();
        assert_eq!(metrics.revenue, 800_000.0);
        assert_eq!(metrics.price_ad_ratio, 12.0);
    }

    #[test]
    fn test_map_collects_all_errors() {
        let map = as_map(json!({
            "demand_ratio": "high",
            "revenue": -5,
            "organic_percent": 140
        }));
        let errors = validate_metrics_map(&map).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.starts_with("demand_ratio: must be a number")));
        assert!(errors.iter().any(|e| e == "price_ad_ratio: missing"));
        assert!(errors.iter().any(|e| e == "revenue: must be non-negative"));
        assert!(errors.iter().any(|e| e == "organic_percent: cannot exceed 100%"));
    }

    #[test]
    fn test_map_missing_fields_not_reported_as_range_errors() {
        let errors = validate_metrics_map(&Map::new()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.ends_with("missing")));
    }

    #[test]
    fn test_map_extra_keys_ignored() {
        let map = as_map(json!({
            "demand_ratio": 1,
            "revenue": 1,
            "price_ad_ratio": 1,
            "organic_percent": 1,
            "rating": 99
        }));
        let metrics = validate_metrics_map(&map).unwrap();
        assert_eq!(metrics.organic_percent, 1.0);
    }

    #[test]
    fn test_default_config_valid() {
        assert!(validate_config(&Weights::default(), &Thresholds::default()).is_ok());
    }

    #[test]
    fn test_config_collects_all_errors() {
        let weights = Weights {
            demand: -5.0,
            revenue: 150.0,
            ads: 25.0,
            organic: 20.0,
        };
        let thresholds = Thresholds {
            min_revenue: 0.0,
            min_demand_ratio: -1.0,
        };
        let errors = validate_config(&weights, &thresholds).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("weights.demand"));
        assert!(errors[1].contains("weights.revenue"));
        assert!(errors[2].contains("min_revenue"));
        assert!(errors[3].contains("min_demand_ratio"));
    }

    #[test]
    fn test_weights_sum_warning() {
        assert!(weights_sum_warning(&Weights::default()).is_none());

        let weights = Weights {
            demand: 50.0,
            revenue: 40.0,
            ads: 25.0,
            organic: 15.0,
        };
        let warning = weights_sum_warning(&weights).unwrap();
        assert!(warning.contains("130%"));
    }
}
