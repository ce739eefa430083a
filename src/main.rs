use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use niche_rater::config::{self, Config};
use niche_rater::ingest::{self, ReportKind, Table};
use niche_rater::output;
use niche_rater::rating::{RatingEngine, RawMetrics, ThresholdsUpdate, WeightsUpdate};
use niche_rater::{samples, warn_user};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Tsv,
}

#[derive(Args, Clone, Debug, Default, PartialEq)]
struct MetricArgs {
    /// Display name for the niche
    #[arg(long)]
    name: Option<String>,

    /// Search queries per listed product
    #[arg(long)]
    demand_ratio: Option<f64>,

    /// Monthly category revenue
    #[arg(long)]
    revenue: Option<f64>,

    /// Average price divided by average ad bid
    #[arg(long)]
    price_ad_ratio: Option<f64>,

    /// Share of organic positions in the top results (0-100)
    #[arg(long)]
    organic_percent: Option<f64>,

    /// Use a built-in sample niche: good, average or poor
    #[arg(long, conflicts_with_all = ["file", "demand_ratio", "revenue", "price_ad_ratio", "organic_percent"])]
    sample: Option<String>,

    /// Extract metrics from exported reports (.xlsx or .csv)
    #[arg(long, num_args = 1..)]
    file: Vec<PathBuf>,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
enum Commands {
    /// Rate a single niche
    Rate(MetricArgs),
    /// Rank several niches (default if no subcommand)
    Compare {
        /// YAML file with a list of {name, metrics} entries
        #[arg(long)]
        niches: Option<PathBuf>,

        /// Compare the built-in sample niches
        #[arg(long, conflicts_with = "niches")]
        sample: bool,
    },
    /// Show what can be extracted from report files
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Create a config file interactively
    Init {
        /// Where to write the config (defaults to ~/.config/niche-rater/config.yaml)
        path: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "niche-rater")]
#[command(about = "Rate marketplace product niches", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/niche-rater/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Override a weight, e.g. -w demand=40 (repeatable)
    #[arg(short, long = "weight", global = true)]
    weights: Vec<String>,

    /// Override the minimum category revenue
    #[arg(long, global = true)]
    min_revenue: Option<f64>,

    /// Override the minimum demand/supply ratio
    #[arg(long, global = true)]
    min_demand_ratio: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; plain `niche-rater` compares the configured niches.
    fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Compare {
            niches: None,
            sample: false,
        })
    }
}

fn print_errors(header: &str, errors: &[String]) {
    eprintln!("{}", header);
    for error in errors {
        eprintln!("  - {}", error);
    }
}

/// Config file values with CLI overrides layered on top.
fn build_engine(cli: &Cli, config: &Config) -> Result<RatingEngine, Vec<String>> {
    let mut errors = Vec::new();

    let mut engine = config.engine();

    let mut overrides = WeightsUpdate::default();
    for pair in &cli.weights {
        match WeightsUpdate::parse_pair(pair) {
            Ok((key, value)) => {
                if let Err(e) = overrides.set(&key, value) {
                    errors.push(format!("--weight {}: {}", pair, e));
                }
            }
            Err(e) => errors.push(format!("--weight {}: {}", pair, e)),
        }
    }
    engine.update_weights(&overrides);
    engine.update_thresholds(&ThresholdsUpdate {
        min_revenue: cli.min_revenue,
        min_demand_ratio: cli.min_demand_ratio,
    });

    if let Err(config_errors) = ingest::validate_config(engine.weights(), engine.thresholds()) {
        errors.extend(config_errors);
    }

    if errors.is_empty() {
        Ok(engine)
    } else {
        Err(errors)
    }
}

/// Load every report, skipping (with a warning) the ones that fail.
fn load_reports(files: &[PathBuf], verbose: bool) -> Vec<(ingest::FileSummary, Table)> {
    let mut loaded = Vec::new();
    for path in files {
        let start = Instant::now();
        match ingest::analyze_file(path) {
            Ok((summary, table)) => {
                if verbose {
                    eprintln!(
                        "Loaded {} as {} ({} rows, {} columns) in {:?}",
                        summary.name,
                        summary.kind.label(),
                        summary.rows,
                        summary.columns,
                        start.elapsed()
                    );
                }
                if summary.kind == ReportKind::Unknown {
                    warn_user!("{}", ingest::unrecognized_report_message(&summary.name));
                }
                loaded.push((summary, table));
            }
            Err(e) => warn_user!("{:#}", e),
        }
    }
    loaded
}

fn extract_from_reports(reports: &[(ingest::FileSummary, Table)]) -> RawMetrics {
    for (summary, _) in reports {
        if summary.kind != ReportKind::Unknown && !summary.kind.feeds_rating() {
            warn_user!(
                "{} is a {}; this kind of report does not feed the rating",
                summary.name,
                summary.kind.label()
            );
        }
    }

    let has = |kind| reports.iter().any(|(s, _)| s.kind == kind);
    if !has(ReportKind::NicheSelection) && !has(ReportKind::BrandsReport) {
        warn_user!("No niche selection or brands report: revenue and demand ratio default to 0");
    } else if !has(ReportKind::NicheSelection) {
        warn_user!("No niche selection report: demand ratio defaults to 0");
    }
    if !has(ReportKind::SeoResults) {
        warn_user!("No SEO results report: price/bid ratio and organic share default to 0");
    }

    let inputs: Vec<(ReportKind, &Table)> = reports.iter().map(|(s, t)| (s.kind, t)).collect();
    ingest::extract_metrics(&inputs)
}

/// Resolve the metrics for `rate` from a sample, report files or flags.
fn resolve_metrics(args: &MetricArgs, verbose: bool) -> Result<RawMetrics, Vec<String>> {
    if let Some(ref sample) = args.sample {
        return samples::sample_metrics(sample).ok_or_else(|| {
            vec![format!(
                "Unknown sample '{}': expected one of {}",
                sample,
                samples::SAMPLE_NAMES.join(", ")
            )]
        });
    }

    if !args.file.is_empty() {
        let reports = load_reports(&args.file, verbose);
        if reports.is_empty() {
            return Err(vec!["None of the report files could be loaded".to_string()]);
        }
        let metrics = extract_from_reports(&reports);
        ingest::validate_metrics(&metrics)?;
        return Ok(metrics);
    }

    let mut map = serde_json::Map::new();
    for (field, value) in ingest::validation::METRIC_FIELDS.iter().zip([
        args.demand_ratio,
        args.revenue,
        args.price_ad_ratio,
        args.organic_percent,
    ]) {
        if let Some(v) = value.and_then(serde_json::Number::from_f64) {
            map.insert(field.to_string(), serde_json::Value::Number(v));
        } else if let Some(v) = value {
            map.insert(field.to_string(), serde_json::Value::String(v.to_string()));
        }
    }
    ingest::validate_metrics_map(&map)
}

fn run_rate(cli: &Cli, engine: &RatingEngine, args: &MetricArgs) -> i32 {
    let metrics = match resolve_metrics(args, cli.verbose) {
        Ok(m) => m,
        Err(errors) => {
            print_errors("Invalid metrics:", &errors);
            return EXIT_INPUT;
        }
    };

    let name = args.name.as_deref().or(args.sample.as_deref());
    let result = engine.calculate_rating(&metrics);
    let use_colors = output::should_use_colors();

    match cli.format {
        OutputFormat::Table => {
            if cli.verbose || !args.file.is_empty() {
                println!("Metrics:");
                println!("{}", output::format_metrics(&metrics));
                println!();
            }
            println!("{}", output::format_rating_detail(name, &result, use_colors));
            println!();
            let recommendations = niche_rater::rating::get_recommendations(&result);
            println!(
                "{}",
                output::format_recommendations(&recommendations, use_colors)
            );
        }
        OutputFormat::Json => {
            let report = output::RatingReport::new(name, &metrics, &result);
            match output::format_json(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("{:#}", e);
                    return EXIT_INPUT;
                }
            }
        }
        OutputFormat::Tsv => {
            let rankings = engine.compare_niches(&[niche_rater::rating::NicheInput {
                name: name.map(str::to_string),
                metrics,
            }]);
            println!("{}", output::format_tsv(&rankings));
        }
    }

    EXIT_SUCCESS
}

fn run_compare(
    cli: &Cli,
    engine: &RatingEngine,
    config: &Config,
    niches_path: Option<&PathBuf>,
    sample: bool,
) -> i32 {
    let niches = if sample {
        samples::comparison_sample()
    } else {
        let entries = match niches_path {
            Some(path) => match config::load_niches(path) {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("{:#}", e);
                    return EXIT_INPUT;
                }
            },
            None => config.niches.clone(),
        };

        if entries.is_empty() {
            eprintln!("No niches to compare.");
            eprintln!("Add niches to ~/.config/niche-rater/config.yaml:");
            eprintln!("  niches:");
            eprintln!("    - name: Hair masks");
            eprintln!("      metrics: {{ demand_ratio: 8.5, revenue: 3500000, price_ad_ratio: 35, organic_percent: 70 }}");
            eprintln!("or try `niche-rater compare --sample`.");
            return EXIT_CONFIG;
        }

        match config::validate_niches(&entries) {
            Ok(niches) => niches,
            Err(errors) => {
                print_errors("Invalid niches:", &errors);
                return EXIT_INPUT;
            }
        }
    };

    let start = Instant::now();
    let rankings = engine.compare_niches(&niches);
    if cli.verbose {
        eprintln!("Rated {} niches in {:?}", rankings.len(), start.elapsed());
    }

    match cli.format {
        OutputFormat::Table => {
            let use_colors = output::should_use_colors();
            if cli.verbose {
                for ranking in &rankings {
                    println!(
                        "{}",
                        output::format_rating_detail(
                            Some(ranking.name.as_str()),
                            &ranking.details,
                            use_colors,
                        )
                    );
                    println!();
                }
            } else {
                println!("{}", output::format_comparison_table(&rankings, use_colors));
            }
        }
        OutputFormat::Json => match output::format_json(&rankings) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{:#}", e);
                return EXIT_INPUT;
            }
        },
        OutputFormat::Tsv => println!("{}", output::format_tsv(&rankings)),
    }

    EXIT_SUCCESS
}

fn run_extract(cli: &Cli, files: &[PathBuf]) -> i32 {
    let reports = load_reports(files, cli.verbose);
    if reports.is_empty() {
        eprintln!("None of the report files could be loaded.");
        return EXIT_INPUT;
    }

    let metrics = extract_from_reports(&reports);
    let validation = ingest::validate_metrics(&metrics);

    match cli.format {
        OutputFormat::Json => {
            let summaries: Vec<_> = reports.iter().map(|(s, _)| s).collect();
            let value = serde_json::json!({
                "files": summaries,
                "metrics": metrics,
                "errors": validation.as_ref().err().cloned().unwrap_or_default(),
            });
            match output::format_json(&value) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("{:#}", e);
                    return EXIT_INPUT;
                }
            }
        }
        OutputFormat::Table | OutputFormat::Tsv => {
            let use_colors = output::should_use_colors();
            for (summary, _) in &reports {
                println!("{}", output::format_file_summary(summary, use_colors));
                println!();
            }
            println!("Extracted metrics:");
            println!("{}", output::format_metrics(&metrics));
        }
    }

    match validation {
        Ok(()) => EXIT_SUCCESS,
        Err(errors) => {
            print_errors("Extracted metrics are invalid:", &errors);
            EXIT_INPUT
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Some(Commands::Init { ref path }) = cli.command {
        let path = path.clone().or_else(|| cli.config.as_ref().map(PathBuf::from));
        if let Err(e) = config::run_init_wizard(path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let engine = match build_engine(&cli, &config) {
        Ok(engine) => engine,
        Err(errors) => {
            print_errors("Config errors:", &errors);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        let w = engine.weights();
        let t = engine.thresholds();
        eprintln!(
            "Weights: demand {}%, revenue {}%, ads {}%, organic {}%",
            w.demand, w.revenue, w.ads, w.organic
        );
        eprintln!(
            "Thresholds: min revenue {}, min demand ratio {}",
            t.min_revenue, t.min_demand_ratio
        );
    }

    // Keep machine-readable stdout contiguous; warnings follow it
    if cli.format != OutputFormat::Table {
        niche_rater::diagnostics::hold();
    }

    if let Some(warning) = ingest::weights_sum_warning(engine.weights()) {
        warn_user!("{}", warning);
    }

    let code = match cli.command_or_default() {
        Commands::Rate(args) => run_rate(&cli, &engine, &args),
        Commands::Extract { files } => run_extract(&cli, &files),
        Commands::Compare { niches, sample } => {
            run_compare(&cli, &engine, &config, niches.as_ref(), sample)
        }
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    for warning in niche_rater::diagnostics::release() {
        eprintln!("Warning: {}", warning);
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_compares_configured_niches() {
        let cli = Cli::parse_from(["niche-rater", "-w", "demand=40"]);
        assert_eq!(
            cli.command_or_default(),
            Commands::Compare {
                niches: None,
                sample: false,
            }
        );
    }

    #[test]
    fn test_explicit_subcommand_kept() {
        let cli = Cli::parse_from(["niche-rater", "rate", "--sample", "good"]);
        match cli.command_or_default() {
            Commands::Rate(args) => assert_eq!(args.sample.as_deref(), Some("good")),
            other => panic!("expected rate, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides_layer_on_config() {
        let config: Config = serde_saphyr::from_str("weights: { demand: 40 }").unwrap();
        let cli = Cli::parse_from(["niche-rater", "-w", "ads=35", "--min-revenue", "2000000"]);
        let engine = build_engine(&cli, &config).unwrap();
        assert_eq!(engine.weights().demand, 40.0);
        assert_eq!(engine.weights().ads, 35.0);
        assert_eq!(engine.thresholds().min_revenue, 2_000_000.0);
    }

    #[test]
    fn test_bad_weight_override_reported() {
        let cli = Cli::parse_from(["niche-rater", "-w", "speed=10", "-w", "demand=150"]);
        let errors = build_engine(&cli, &Config::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("--weight speed=10"));
        assert!(errors[1].contains("weights.demand"));
    }
}
