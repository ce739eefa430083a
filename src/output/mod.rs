pub mod formatter;
pub mod report;

pub use formatter::{
    format_amount, format_comparison_table, format_file_summary, format_metrics,
    format_rating_detail, format_recommendations, format_tsv, should_use_colors,
};
pub use report::{format_json, RatingReport};
