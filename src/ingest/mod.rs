pub mod detect;
pub mod extract;
pub mod table;
pub mod validation;

pub use detect::{detect_report_kind, processing_tips, unrecognized_report_message, ReportKind};
pub use extract::{extract_metrics, BrandsMetrics, NicheSelectionMetrics, SeoMetrics};
pub use table::{analyze_file, parse_table, read_table, FileSummary, Table};
pub use validation::{validate_config, validate_metrics, validate_metrics_map, weights_sum_warning};
