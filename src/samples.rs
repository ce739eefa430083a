//! Built-in example niches for trying the tool without any reports.

use crate::rating::{NicheInput, RawMetrics};

pub const SAMPLE_NAMES: [&str; 3] = ["good", "average", "poor"];

/// Sample metrics by name: "good", "average" or "poor".
pub fn sample_metrics(name: &str) -> Option<RawMetrics> {
    match name.to_lowercase().as_str() {
        "good" => Some(RawMetrics {
            demand_ratio: 8.5,
            revenue: 3_500_000.0,
            price_ad_ratio: 35.0,
            organic_percent: 70.0,
        }),
        "average" => Some(RawMetrics {
            demand_ratio: 5.2,
            revenue: 2_500_000.0,
            price_ad_ratio: 25.0,
            organic_percent: 65.0,
        }),
        "poor" => Some(RawMetrics {
            demand_ratio: 2.1,
            revenue: 800_000.0,
            price_ad_ratio: 12.0,
            organic_percent: 30.0,
        }),
        _ => None,
    }
}

fn niche(
    name: &str,
    demand_ratio: f64,
    revenue: f64,
    price_ad_ratio: f64,
    organic_percent: f64,
) -> NicheInput {
    NicheInput {
        name: Some(name.to_string()),
        metrics: RawMetrics {
            demand_ratio,
            revenue,
            price_ad_ratio,
            organic_percent,
        },
    }
}

/// Four beauty-category niches for `compare --sample`.
pub fn comparison_sample() -> Vec<NicheInput> {
    vec![
        niche("Hair masks", 8.5, 3_500_000.0, 35.0, 70.0),
        niche("Face creams", 6.2, 4_200_000.0, 28.0, 55.0),
        niche("Shampoos", 3.8, 8_500_000.0, 15.0, 40.0),
        niche("Serums", 12.3, 1_800_000.0, 45.0, 85.0),
    ]
}
