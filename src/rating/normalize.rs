use super::config::Thresholds;

const MAX_SCORE: f64 = 100.0;

/// Demand ratios above this earn a 1.2x bonus before the cap.
const DEMAND_BONUS_ABOVE: f64 = 10.0;
/// Price/bid ratios above this earn a 1.1x bonus before the cap.
const ADS_BONUS_ABOVE: f64 = 50.0;

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, MAX_SCORE)
}

/// Linear scale: 15 points per unit of demand/supply ratio.
pub fn demand_score(demand_ratio: f64, thresholds: &Thresholds) -> f64 {
    if demand_ratio < thresholds.min_demand_ratio {
        return 0.0;
    }

    let mut score = (demand_ratio * 15.0).min(MAX_SCORE);
    if demand_ratio > DEMAND_BONUS_ABOVE {
        score *= 1.2;
    }
    clamp_score(score)
}

/// Logarithmic scale against the revenue floor: revenue at the floor scores
/// 50, every tenfold increase adds another 50.
pub fn revenue_score(revenue: f64, thresholds: &Thresholds) -> f64 {
    if revenue < thresholds.min_revenue {
        return 0.0;
    }

    let ratio = revenue / thresholds.min_revenue;
    // Only reachable with a zero or negative floor, which config validation rejects
    if ratio.is_nan() || ratio <= 0.0 {
        return 0.0;
    }
    clamp_score((ratio.log10() * 50.0 + 50.0).min(MAX_SCORE))
}

/// Linear scale: 3 points per unit of price/bid ratio.
pub fn ad_score(price_ad_ratio: f64) -> f64 {
    if price_ad_ratio <= 0.0 {
        return 0.0;
    }

    let mut score = (price_ad_ratio * 3.0).min(MAX_SCORE);
    if price_ad_ratio > ADS_BONUS_ABOVE {
        score *= 1.1;
    }
    clamp_score(score)
}

/// Organic share is already a percentage.
pub fn organic_score(organic_percent: f64) -> f64 {
    clamp_score(organic_percent)
}
