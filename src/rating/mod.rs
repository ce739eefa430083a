pub mod config;
pub mod engine;
pub mod interpret;
pub mod normalize;

pub use config::*;
pub use engine::{NicheInput, NicheRanking, RatingEngine, RatingResult, RawMetrics, ScoreBreakdown};
pub use interpret::{get_recommendations, interpret_rating, NicheStatus, Recommendation, RecommendationKind};
