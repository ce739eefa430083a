pub mod config;
pub mod diagnostics;
pub mod ingest;
pub mod output;
pub mod rating;
pub mod samples;
