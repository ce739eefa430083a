use serde::{Deserialize, Serialize};

use super::config::{Thresholds, ThresholdsUpdate, Weights, WeightsUpdate};
use super::normalize::{ad_score, demand_score, organic_score, revenue_score};

/// Raw niche metrics, as entered by hand or extracted from reports.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawMetrics {
    /// Search queries per listed product
    pub demand_ratio: f64,
    /// Category revenue per month
    pub revenue: f64,
    /// Average product price divided by average ad bid
    pub price_ad_ratio: f64,
    /// Share of organic (non-paid) positions in the top results, 0-100
    pub organic_percent: f64,
}

/// Per-metric sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    pub demand: f64,
    pub revenue: f64,
    pub ad_efficiency: f64,
    pub organic: f64,
}

/// Outcome of a single rating calculation.
///
/// `weights_used` and `thresholds_used` are copies taken at calculation time,
/// so later engine updates never change a result already handed out.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingResult {
    pub final_rating: f64,
    pub breakdown: ScoreBreakdown,
    pub weights_used: Weights,
    pub thresholds_used: Thresholds,
}

/// A named niche to compare.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NicheInput {
    #[serde(default)]
    pub name: Option<String>,
    pub metrics: RawMetrics,
}

/// A niche with its rating, as returned by [`RatingEngine::compare_niches`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NicheRanking {
    pub name: String,
    pub rating: f64,
    pub details: RatingResult,
}

pub const UNNAMED_NICHE: &str = "Unnamed niche";

/// Rating engine holding the weights and thresholds for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingEngine {
    weights: Weights,
    thresholds: Thresholds,
}

impl RatingEngine {
    pub fn new(weights: Weights, thresholds: Thresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Merge the given weights into the current ones. The sum is not checked.
    pub fn update_weights(&mut self, update: &WeightsUpdate) {
        self.weights.merge(update);
    }

    pub fn update_thresholds(&mut self, update: &ThresholdsUpdate) {
        self.thresholds.merge(update);
    }

    /// Rate a niche with the current weights and thresholds.
    ///
    /// The final rating is the weighted sum of the unrounded sub-scores. It is
    /// not clamped: weights summing above 100 can push it past 100.
    pub fn calculate_rating(&self, metrics: &RawMetrics) -> RatingResult {
        let demand = demand_score(metrics.demand_ratio, &self.thresholds);
        let revenue = revenue_score(metrics.revenue, &self.thresholds);
        let ad_efficiency = ad_score(metrics.price_ad_ratio);
        let organic = organic_score(metrics.organic_percent);

        let w = &self.weights;
        let final_rating = demand * (w.demand / 100.0)
            + revenue * (w.revenue / 100.0)
            + ad_efficiency * (w.ads / 100.0)
            + organic * (w.organic / 100.0);

        RatingResult {
            final_rating: round1(final_rating),
            breakdown: ScoreBreakdown {
                demand: round1(demand),
                revenue: round1(revenue),
                ad_efficiency: round1(ad_efficiency),
                organic: round1(organic),
            },
            weights_used: self.weights,
            thresholds_used: self.thresholds,
        }
    }

    /// Rate every niche and sort by rating, highest first.
    /// Equal ratings keep their input order.
    pub fn compare_niches(&self, niches: &[NicheInput]) -> Vec<NicheRanking> {
        let mut rankings: Vec<NicheRanking> = niches
            .iter()
            .map(|niche| {
                let details = self.calculate_rating(&niche.metrics);
                NicheRanking {
                    name: niche
                        .name
                        .clone()
                        .unwrap_or_else(|| UNNAMED_NICHE.to_string()),
                    rating: details.final_rating,
                    details,
                }
            })
            .collect();

        // sort_by is stable
        rankings.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rankings
    }
}

/// Round half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_niche() -> RawMetrics {
        RawMetrics {
            demand_ratio: 8.5,
            revenue: 3_500_000.0,
            price_ad_ratio: 35.0,
            organic_percent: 70.0,
        }
    }

    fn poor_niche() -> RawMetrics {
        RawMetrics {
            demand_ratio: 2.1,
            revenue: 800_000.0,
            price_ad_ratio: 12.0,
            organic_percent: 30.0,
        }
    }

    fn niche(name: &str, metrics: RawMetrics) -> NicheInput {
        NicheInput {
            name: Some(name.to_string()),
            metrics,
        }
    }

    #[test]
    fn test_good_niche_with_defaults() {
        let engine = RatingEngine::default();
        let result = engine.calculate_rating(&good_niche());

        assert_eq!(result.breakdown.demand, 100.0);
        assert_eq!(result.breakdown.revenue, 77.2);
        assert_eq!(result.breakdown.ad_efficiency, 100.0);
        assert_eq!(result.breakdown.organic, 70.0);
        // 100*.3 + 77.2034*.25 + 100*.25 + 70*.2 = 88.30
        assert_eq!(result.final_rating, 88.3);
    }

    #[test]
    fn test_poor_niche_with_defaults() {
        let engine = RatingEngine::default();
        let result = engine.calculate_rating(&poor_niche());

        assert_eq!(result.breakdown.demand, 31.5);
        assert_eq!(result.breakdown.revenue, 0.0);
        assert_eq!(result.breakdown.ad_efficiency, 36.0);
        assert_eq!(result.breakdown.organic, 30.0);
        // 9.45 + 0 + 9 + 6 = 24.45, rounded half up
        assert_eq!(result.final_rating, 24.5);
    }

    #[test]
    fn test_final_rating_not_clamped_when_weights_exceed_100() {
        let mut engine = RatingEngine::default();
        engine.update_weights(&WeightsUpdate {
            demand: Some(50.0),
            revenue: Some(40.0),
            ads: Some(25.0),
            organic: Some(15.0),
        });
        assert_eq!(engine.weights().sum(), 130.0);

        let result = engine.calculate_rating(&good_niche());
        // 50 + 30.88 + 25 + 10.5
        assert_eq!(result.final_rating, 116.4);
        assert!(result.final_rating > 100.0);
        assert!(result.breakdown.demand <= 100.0);
    }

    #[test]
    fn test_zero_weights_give_zero_rating() {
        let engine = RatingEngine::new(
            Weights {
                demand: 0.0,
                revenue: 0.0,
                ads: 0.0,
                organic: 0.0,
            },
            Thresholds::default(),
        );
        assert_eq!(engine.calculate_rating(&good_niche()).final_rating, 0.0);
    }

    #[test]
    fn test_result_snapshots_configuration() {
        let mut engine = RatingEngine::default();
        let before = engine.calculate_rating(&good_niche());

        engine.update_weights(&WeightsUpdate {
            demand: Some(90.0),
            ..Default::default()
        });
        engine.update_thresholds(&ThresholdsUpdate {
            min_revenue: Some(5_000_000.0),
            ..Default::default()
        });

        assert_eq!(before.weights_used, Weights::default());
        assert_eq!(before.thresholds_used, Thresholds::default());

        let after = engine.calculate_rating(&good_niche());
        assert_eq!(after.weights_used.demand, 90.0);
        assert_eq!(after.thresholds_used.min_revenue, 5_000_000.0);
        assert_eq!(after.breakdown.revenue, 0.0);
    }

    #[test]
    fn test_raised_demand_threshold_zeroes_demand() {
        let mut engine = RatingEngine::default();
        engine.update_thresholds(&ThresholdsUpdate {
            min_demand_ratio: Some(10.0),
            ..Default::default()
        });
        let result = engine.calculate_rating(&good_niche());
        assert_eq!(result.breakdown.demand, 0.0);
        assert_eq!(engine.thresholds().min_revenue, 1_000_000.0);
    }

    #[test]
    fn test_extreme_inputs_stay_in_range() {
        let engine = RatingEngine::default();
        let cases = [
            RawMetrics {
                demand_ratio: 1e300,
                revenue: 1e300,
                price_ad_ratio: 1e300,
                organic_percent: 1e300,
            },
            RawMetrics {
                demand_ratio: -1e300,
                revenue: -1e300,
                price_ad_ratio: -1e300,
                organic_percent: -1e300,
            },
            RawMetrics::default(),
        ];
        for metrics in cases {
            let result = engine.calculate_rating(&metrics);
            let b = result.breakdown;
            for score in [b.demand, b.revenue, b.ad_efficiency, b.organic, result.final_rating] {
                assert!((0.0..=100.0).contains(&score), "out of range: {}", score);
            }
        }
    }

    #[test]
    fn test_compare_sorted_descending() {
        let engine = RatingEngine::default();
        let rankings = engine.compare_niches(&[
            niche("poor", poor_niche()),
            niche("good", good_niche()),
            niche(
                "average",
                RawMetrics {
                    demand_ratio: 5.2,
                    revenue: 2_500_000.0,
                    price_ad_ratio: 25.0,
                    organic_percent: 65.0,
                },
            ),
        ]);

        let names: Vec<&str> = rankings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["good", "average", "poor"]);
        assert!(rankings.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert_eq!(rankings[0].rating, rankings[0].details.final_rating);
    }

    #[test]
    fn test_compare_is_stable_for_ties() {
        let engine = RatingEngine::default();
        let rankings = engine.compare_niches(&[
            niche("first", poor_niche()),
            niche("best", good_niche()),
            niche("second", poor_niche()),
            niche("third", poor_niche()),
        ]);

        let names: Vec<&str> = rankings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["best", "first", "second", "third"]);
    }

    #[test]
    fn test_compare_unnamed_niche() {
        let engine = RatingEngine::default();
        let rankings = engine.compare_niches(&[NicheInput {
            name: None,
            metrics: good_niche(),
        }]);
        assert_eq!(rankings[0].name, UNNAMED_NICHE);
    }

    #[test]
    fn test_compare_empty() {
        assert!(RatingEngine::default().compare_niches(&[]).is_empty());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(24.45), 24.5);
        assert_eq!(round1(77.2034), 77.2);
        assert_eq!(round1(0.04), 0.0);
        assert_eq!(round1(99.96), 100.0);
    }
}
