use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::{get_config_path, save_config, Config};
use crate::ingest::{validate_config, weights_sum_warning};
use crate::rating::{Thresholds, ThresholdsUpdate, Weights, WeightsUpdate};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the input parses as a number inside `range`.
fn prompt_number(
    message: &str,
    default: f64,
    range: std::ops::RangeInclusive<f64>,
) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.replace(' ', "").parse::<f64>() {
            Ok(v) if range.contains(&v) => return Ok(v),
            Ok(_) => println!(
                "  Invalid: must be between {} and {}. Try again.",
                range.start(),
                range.end()
            ),
            Err(_) => println!("  Invalid: not a number. Try again."),
        }
    }
}

/// Only keep values that differ from the defaults, so the file stays minimal.
fn changed(value: f64, default: f64) -> Option<f64> {
    if value == default {
        None
    } else {
        Some(value)
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Niche Rater Configuration Wizard");
    println!("================================");
    println!();

    // 1. Weights
    let defaults = Weights::default();
    println!("Each metric contributes a percentage of the final rating. Weights should add up to 100.");
    let weights = loop {
        let weights = Weights {
            demand: prompt_number("Demand/supply ratio weight", defaults.demand, 0.0..=100.0)?,
            revenue: prompt_number("Category revenue weight", defaults.revenue, 0.0..=100.0)?,
            ads: prompt_number("Ad efficiency weight", defaults.ads, 0.0..=100.0)?,
            organic: prompt_number("Organic share weight", defaults.organic, 0.0..=100.0)?,
        };
        match weights_sum_warning(&weights) {
            None => break weights,
            Some(warning) => {
                println!("  {}", warning);
                if prompt_yes_no("Keep these weights anyway?", false)? {
                    break weights;
                }
            }
        }
    };

    // 2. Thresholds
    println!();
    println!("Below these floors a metric scores zero.");
    let default_thresholds = Thresholds::default();
    let thresholds = loop {
        let thresholds = Thresholds {
            min_revenue: prompt_number(
                "Minimum monthly category revenue",
                default_thresholds.min_revenue,
                0.0..=f64::MAX,
            )?,
            min_demand_ratio: prompt_number(
                "Minimum demand/supply ratio",
                default_thresholds.min_demand_ratio,
                0.0..=f64::MAX,
            )?,
        };
        match validate_config(&weights, &thresholds) {
            Ok(()) => break thresholds,
            Err(errors) => {
                for error in errors {
                    println!("  Invalid: {}", error);
                }
            }
        }
    };

    // 3. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        weights: WeightsUpdate {
            demand: changed(weights.demand, defaults.demand),
            revenue: changed(weights.revenue, defaults.revenue),
            ads: changed(weights.ads, defaults.ads),
            organic: changed(weights.organic, defaults.organic),
        },
        thresholds: ThresholdsUpdate {
            min_revenue: changed(thresholds.min_revenue, default_thresholds.min_revenue),
            min_demand_ratio: changed(
                thresholds.min_demand_ratio,
                default_thresholds.min_demand_ratio,
            ),
        },
        niches: Vec::new(),
    };
    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Add niches under `niches:` in that file to compare them with `niche-rater compare`.");

    Ok(())
}
