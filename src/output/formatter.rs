use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::ingest::FileSummary;
use crate::rating::{
    interpret_rating, NicheRanking, NicheStatus, RatingResult, RawMetrics, Recommendation,
    RecommendationKind,
};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a money-like amount in compact notation (3.5M, 800k, 950)
pub fn format_amount(value: f64) -> String {
    let formatted = if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    };

    // Trim trailing .0 (e.g., "1.0M" -> "1M")
    formatted.replace(".0M", "M").replace(".0k", "k")
}

fn colored_status(status: NicheStatus, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match status {
        NicheStatus::Excellent => text.green().bold().to_string(),
        NicheStatus::Good => text.yellow().bold().to_string(),
        NicheStatus::Average => text.magenta().bold().to_string(),
        NicheStatus::Poor => text.red().bold().to_string(),
    }
}

/// Format a rating result with its breakdown (multi-line)
pub fn format_rating_detail(name: Option<&str>, result: &RatingResult, use_colors: bool) -> String {
    let status = interpret_rating(result.final_rating);
    let b = &result.breakdown;
    let w = &result.weights_used;
    let t = &result.thresholds_used;

    let mut lines = Vec::new();
    if let Some(name) = name {
        lines.push(if use_colors {
            name.bold().to_string()
        } else {
            name.to_string()
        });
    }

    let rating = format!("{:.1} / 100", result.final_rating);
    lines.push(format!(
        "  Rating: {}  {}",
        colored_status(status, &rating, use_colors),
        colored_status(status, status.label(), use_colors)
    ));
    lines.push(format!("  {}", status.description()));
    lines.push(String::new());

    for (label, score, weight) in [
        ("Demand", b.demand, w.demand),
        ("Revenue", b.revenue, w.revenue),
        ("Ad efficiency", b.ad_efficiency, w.ads),
        ("Organic", b.organic, w.organic),
    ] {
        lines.push(format!(
            "  {:<14}{:>6.1}  (weight {}%)",
            format!("{}:", label),
            score,
            weight
        ));
    }

    let thresholds = format!(
        "  Thresholds: min revenue {}, min demand ratio {}",
        format_amount(t.min_revenue),
        t.min_demand_ratio
    );
    lines.push(if use_colors {
        thresholds.dimmed().to_string()
    } else {
        thresholds
    });

    lines.join("\n")
}

/// Format the metrics a rating was computed from
pub fn format_metrics(metrics: &RawMetrics) -> String {
    format!(
        "  Demand ratio: {:.2}\n  Revenue: {}\n  Price/bid ratio: {:.2}\n  Organic: {:.1}%",
        metrics.demand_ratio,
        format_amount(metrics.revenue),
        metrics.price_ad_ratio,
        metrics.organic_percent
    )
}

/// Format recommendations, one entry per message with its action underneath
pub fn format_recommendations(recommendations: &[Recommendation], use_colors: bool) -> String {
    if recommendations.is_empty() {
        return "No recommendations.".to_string();
    }

    recommendations
        .iter()
        .map(|rec| {
            let marker = match rec.kind {
                RecommendationKind::Warning => "[!]",
                RecommendationKind::Success => "[+]",
                RecommendationKind::Info => "[i]",
            };
            let marker = if use_colors {
                match rec.kind {
                    RecommendationKind::Warning => marker.yellow().to_string(),
                    RecommendationKind::Success => marker.green().to_string(),
                    RecommendationKind::Info => marker.cyan().to_string(),
                }
            } else {
                marker.to_string()
            };
            format!("{} {}\n    -> {}", marker, rec.text, rec.action)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked niches as a table with columns: Index, Rating, Status, Name
/// No headers
/// Index column: 3 chars (fits "99."), right-aligned
/// Rating column is right-aligned, 5 chars wide (fits "100.0")
/// Status column is 15 chars wide (fits "Excellent niche")
pub fn format_comparison_table(rankings: &[NicheRanking], use_colors: bool) -> String {
    if rankings.is_empty() {
        return "No niches to compare.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let rating_width = 5;
    let status_width = 15;
    let separator = "  ";

    rankings
        .iter()
        .enumerate()
        .map(|(idx, ranking)| {
            let index_str = format!("{:>2}.", idx + 1);
            let rating_str = format!("{:>width$.1}", ranking.rating, width = rating_width);
            let status = interpret_rating(ranking.rating);
            let status_str = format!("{:<width$}", status.label(), width = status_width);

            let fixed_width = index_width + 1 + rating_width + status_width + separator.len() * 2;
            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&ranking.name, width - fixed_width)
                } else {
                    truncate_name(&ranking.name, 20)
                }
            } else {
                ranking.name.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    rating_str.bold(),
                    separator,
                    colored_status(status, &status_str, true),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, rating_str, separator, status_str, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked niches as tab-separated values for scripting
/// Columns: rating, status, name, demand, revenue, ad_efficiency, organic
/// (no headers, no colors)
pub fn format_tsv(rankings: &[NicheRanking]) -> String {
    if rankings.is_empty() {
        return String::new();
    }

    rankings
        .iter()
        .map(|ranking| {
            let b = &ranking.details.breakdown;
            format!(
                "{:.1}\t{}\t{}\t{:.1}\t{:.1}\t{:.1}\t{:.1}",
                ranking.rating,
                interpret_rating(ranking.rating).label(),
                ranking.name,
                b.demand,
                b.revenue,
                b.ad_efficiency,
                b.organic
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a loaded report summary (verbose `extract` output)
pub fn format_file_summary(summary: &FileSummary, use_colors: bool) -> String {
    let name = if use_colors {
        summary.name.bold().to_string()
    } else {
        summary.name.clone()
    };
    let mut out = format!(
        "{}\n  Kind: {}\n  Size: {} bytes\n  Rows: {}, columns: {}",
        name,
        summary.kind.label(),
        summary.size,
        summary.rows,
        summary.columns
    );
    for row in &summary.preview {
        out.push_str("\n    ");
        out.push_str(&row.join(" | "));
    }
    out
}
