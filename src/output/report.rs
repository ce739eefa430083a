use anyhow::{Context, Result};
use serde::Serialize;

use crate::rating::{
    get_recommendations, interpret_rating, NicheStatus, RatingResult, RawMetrics, Recommendation,
};

/// Everything `rate` reports about one niche, shaped for JSON output.
#[derive(Debug, Serialize)]
pub struct RatingReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub metrics: &'a RawMetrics,
    pub status: NicheStatus,
    pub status_label: &'static str,
    pub description: &'static str,
    pub result: &'a RatingResult,
    pub recommendations: Vec<Recommendation>,
}

impl<'a> RatingReport<'a> {
    pub fn new(name: Option<&'a str>, metrics: &'a RawMetrics, result: &'a RatingResult) -> Self {
        let status = interpret_rating(result.final_rating);
        Self {
            name,
            metrics,
            status,
            status_label: status.label(),
            description: status.description(),
            result,
            recommendations: get_recommendations(result),
        }
    }
}

/// Pretty-printed JSON for any report value
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}
