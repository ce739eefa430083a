use serde::Serialize;

use super::engine::RatingResult;

/// Classification band of a final rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NicheStatus {
    Excellent,
    Good,
    Average,
    Poor,
}

impl NicheStatus {
    pub fn label(&self) -> &'static str {
        match self {
            NicheStatus::Excellent => "Excellent niche",
            NicheStatus::Good => "Good niche",
            NicheStatus::Average => "Average niche",
            NicheStatus::Poor => "Poor niche",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            NicheStatus::Excellent => "Low competition, high potential",
            NicheStatus::Good => "Moderate competition, good potential",
            NicheStatus::Average => "High competition, medium potential",
            NicheStatus::Poor => "Very high competition, low potential",
        }
    }
}

/// Map a rating onto its band. Bands are checked highest first.
pub fn interpret_rating(rating: f64) -> NicheStatus {
    if rating >= 80.0 {
        NicheStatus::Excellent
    } else if rating >= 60.0 {
        NicheStatus::Good
    } else if rating >= 40.0 {
        NicheStatus::Average
    } else {
        NicheStatus::Poor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub text: &'static str,
    pub action: &'static str,
}

impl Recommendation {
    fn new(kind: RecommendationKind, text: &'static str, action: &'static str) -> Self {
        Self { kind, text, action }
    }
}

const LOW_DEMAND_SCORE: f64 = 40.0;
const LOW_REVENUE_SCORE: f64 = 30.0;
const LOW_AD_SCORE: f64 = 40.0;
const LOW_ORGANIC_SCORE: f64 = 50.0;
const PROMISING_RATING: f64 = 70.0;
const VIABLE_RATING: f64 = 50.0;

/// Build recommendations for a rating result.
///
/// Every sub-score check runs (demand, revenue, ads, organic, in that order)
/// and each one that fires adds a warning. At most one overall message
/// follows: success at 70+, info at 50+.
pub fn get_recommendations(result: &RatingResult) -> Vec<Recommendation> {
    let breakdown = &result.breakdown;
    let mut recommendations = Vec::new();

    if breakdown.demand < LOW_DEMAND_SCORE {
        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            "Low demand relative to supply. Consider a narrower niche.",
            "Look for less saturated subcategories or specialised products.",
        ));
    }

    if breakdown.revenue < LOW_REVENUE_SCORE {
        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            "Low category revenue. Check seasonality or consider another category.",
            "Review monthly sales trends and look at alternative categories.",
        ));
    }

    if breakdown.ad_efficiency < LOW_AD_SCORE {
        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            "Low advertising efficiency. Ad bids are high relative to product price.",
            "Plan a larger ad budget or look for ways to lower bids.",
        ));
    }

    if breakdown.organic < LOW_ORGANIC_SCORE {
        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            "Few organic positions. Advertising competition is high.",
            "Focus on listing SEO and collecting reviews.",
        ));
    }

    if result.final_rating >= PROMISING_RATING {
        recommendations.push(Recommendation::new(
            RecommendationKind::Success,
            "The niche looks attractive for entry!",
            "Move on to detailed competitor analysis and entry planning.",
        ));
    } else if result.final_rating >= VIABLE_RATING {
        recommendations.push(Recommendation::new(
            RecommendationKind::Info,
            "The niche has potential but calls for a cautious approach.",
            "Prepare a competitive strategy and a sufficient promotion budget.",
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{RatingEngine, RawMetrics, ScoreBreakdown, Thresholds, Weights};

    fn result_with(breakdown: ScoreBreakdown, final_rating: f64) -> RatingResult {
        RatingResult {
            final_rating,
            breakdown,
            weights_used: Weights::default(),
            thresholds_used: Thresholds::default(),
        }
    }

    fn healthy() -> ScoreBreakdown {
        ScoreBreakdown {
            demand: 80.0,
            revenue: 80.0,
            ad_efficiency: 80.0,
            organic: 80.0,
        }
    }

    fn kinds(recs: &[Recommendation]) -> Vec<RecommendationKind> {
        recs.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(interpret_rating(100.0), NicheStatus::Excellent);
        assert_eq!(interpret_rating(80.0), NicheStatus::Excellent);
        assert_eq!(interpret_rating(79.9), NicheStatus::Good);
        assert_eq!(interpret_rating(60.0), NicheStatus::Good);
        assert_eq!(interpret_rating(59.9), NicheStatus::Average);
        assert_eq!(interpret_rating(40.0), NicheStatus::Average);
        assert_eq!(interpret_rating(39.9), NicheStatus::Poor);
        assert_eq!(interpret_rating(0.0), NicheStatus::Poor);
    }

    #[test]
    fn test_bands_cover_whole_range() {
        let mut previous = NicheStatus::Poor;
        for step in 0..=1000 {
            let status = interpret_rating(step as f64 / 10.0);
            // Bands only ever move upwards as the rating grows
            let rank = |s: NicheStatus| match s {
                NicheStatus::Poor => 0,
                NicheStatus::Average => 1,
                NicheStatus::Good => 2,
                NicheStatus::Excellent => 3,
            };
            assert!(rank(status) >= rank(previous));
            previous = status;
        }
        assert_eq!(previous, NicheStatus::Excellent);
    }

    #[test]
    fn test_out_of_range_ratings() {
        assert_eq!(interpret_rating(116.4), NicheStatus::Excellent);
        assert_eq!(interpret_rating(-3.0), NicheStatus::Poor);
    }

    #[test]
    fn test_labels() {
        assert_eq!(NicheStatus::Good.label(), "Good niche");
        assert_eq!(
            NicheStatus::Poor.description(),
            "Very high competition, low potential"
        );
    }

    #[test]
    fn test_only_success_when_healthy_and_high() {
        let recs = get_recommendations(&result_with(healthy(), 80.0));
        assert_eq!(kinds(&recs), vec![RecommendationKind::Success]);
    }

    #[test]
    fn test_only_info_when_healthy_and_middling() {
        let recs = get_recommendations(&result_with(healthy(), 69.9));
        assert_eq!(kinds(&recs), vec![RecommendationKind::Info]);

        let recs = get_recommendations(&result_with(healthy(), 50.0));
        assert_eq!(kinds(&recs), vec![RecommendationKind::Info]);
    }

    #[test]
    fn test_nothing_when_healthy_and_low() {
        assert!(get_recommendations(&result_with(healthy(), 49.9)).is_empty());
    }

    #[test]
    fn test_all_warnings_in_fixed_order() {
        let breakdown = ScoreBreakdown {
            demand: 0.0,
            revenue: 0.0,
            ad_efficiency: 0.0,
            organic: 0.0,
        };
        let recs = get_recommendations(&result_with(breakdown, 0.0));
        assert_eq!(recs.len(), 4);
        assert!(recs.iter().all(|r| r.kind == RecommendationKind::Warning));
        assert!(recs[0].text.contains("demand"));
        assert!(recs[1].text.contains("revenue"));
        assert!(recs[2].text.contains("advertising"));
        assert!(recs[3].text.contains("organic"));
    }

    #[test]
    fn test_threshold_edges_do_not_warn() {
        let breakdown = ScoreBreakdown {
            demand: 40.0,
            revenue: 30.0,
            ad_efficiency: 40.0,
            organic: 50.0,
        };
        let recs = get_recommendations(&result_with(breakdown, 70.0));
        assert_eq!(kinds(&recs), vec![RecommendationKind::Success]);
    }

    #[test]
    fn test_warnings_precede_overall_message() {
        let breakdown = ScoreBreakdown {
            organic: 20.0,
            ..healthy()
        };
        let recs = get_recommendations(&result_with(breakdown, 75.0));
        assert_eq!(
            kinds(&recs),
            vec![RecommendationKind::Warning, RecommendationKind::Success]
        );
    }

    #[test]
    fn test_poor_sample_niche() {
        let engine = RatingEngine::default();
        let result = engine.calculate_rating(&RawMetrics {
            demand_ratio: 2.1,
            revenue: 800_000.0,
            price_ad_ratio: 12.0,
            organic_percent: 30.0,
        });
        assert_eq!(interpret_rating(result.final_rating), NicheStatus::Poor);

        let recs = get_recommendations(&result);
        assert_eq!(recs.len(), 4);
        assert!(recs.iter().all(|r| r.kind == RecommendationKind::Warning));
    }
}
