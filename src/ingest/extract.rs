use serde::Serialize;
use std::collections::HashSet;

use super::detect::ReportKind;
use super::table::{parse_number, Table};
use crate::rating::RawMetrics;

const PRODUCT_KEYWORDS: &[&str] = &["товар", "product"];
const REVENUE_KEYWORDS: &[&str] = &["выручка", "revenue"];
const SALES_KEYWORDS: &[&str] = &["продаж", "sales"];
const BID_KEYWORDS: &[&str] = &["ставка", "bid"];
const PRICE_KEYWORDS: &[&str] = &["цена", "price"];
const ORGANIC_KEYWORDS: &[&str] = &["без рекламы", "organic"];
const BRAND_COLUMNS: &[&str] = &["Brand", "Бренд"];

/// Search positions at or above this count as top results.
const TOP_POSITIONS: f64 = 100.0;
/// Rows considered when measuring the organic share of top results.
const TOP_ROWS: usize = 101;

/// Revenue is scaled down by this before it is used as a demand proxy.
const DEMAND_REVENUE_SCALE: f64 = 1_000_000.0;
const DEMAND_PER_PRODUCTS: f64 = 1000.0;

/// Sum of a column, or `None` when any non-blank cell is not a number.
fn numeric_sum(table: &Table, index: usize) -> Option<f64> {
    let mut sum = 0.0;
    for cell in table.column(index) {
        if cell.trim().is_empty() {
            continue;
        }
        sum += parse_number(cell)?;
    }
    Some(sum)
}

/// Column total for an aggregate. A column with any non-numeric cell counts
/// as 0 as a whole, and its header is recorded in `zeroed`.
fn column_total(table: &Table, index: usize, zeroed: &mut Vec<String>) -> f64 {
    numeric_sum(table, index).unwrap_or_else(|| {
        zeroed.push(table.headers[index].clone());
        0.0
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Totals from a niche selection report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NicheSelectionMetrics {
    pub total_products: Option<f64>,
    pub total_revenue: Option<f64>,
    pub total_sales: Option<f64>,
    /// Matched columns that were counted as 0 because of non-numeric cells
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zeroed_columns: Vec<String>,
}

/// Sum the product, revenue and sales columns. When several headers match
/// the same keyword, the last one wins.
pub fn process_niche_selection(table: &Table) -> NicheSelectionMetrics {
    let mut metrics = NicheSelectionMetrics::default();
    let zeroed = &mut metrics.zeroed_columns;
    for index in table.columns_matching(PRODUCT_KEYWORDS) {
        metrics.total_products = Some(column_total(table, index, zeroed));
    }
    for index in table.columns_matching(REVENUE_KEYWORDS) {
        metrics.total_revenue = Some(column_total(table, index, zeroed));
    }
    for index in table.columns_matching(SALES_KEYWORDS) {
        metrics.total_sales = Some(column_total(table, index, zeroed));
    }
    metrics
}

/// Price, bid and organic figures from an SEO search results export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeoMetrics {
    pub avg_ad_rate: Option<f64>,
    pub median_ad_rate: Option<f64>,
    pub avg_price: Option<f64>,
    pub median_price: Option<f64>,
    pub price_ad_ratio: Option<f64>,
    pub organic_percent: Option<f64>,
}

pub fn process_seo_results(table: &Table) -> SeoMetrics {
    let mut metrics = SeoMetrics::default();

    if let Some(&index) = table.columns_matching(BID_KEYWORDS).first() {
        let bids = table.numeric_column(index);
        metrics.avg_ad_rate = Some(mean(&bids).unwrap_or(0.0));
        metrics.median_ad_rate = Some(median(&bids).unwrap_or(0.0));
    }

    if let Some(&index) = table.columns_matching(PRICE_KEYWORDS).first() {
        let prices = table.numeric_column(index);
        metrics.avg_price = Some(mean(&prices).unwrap_or(0.0));
        metrics.median_price = Some(median(&prices).unwrap_or(0.0));
    }

    if let (Some(price), Some(rate)) = (metrics.avg_price, metrics.avg_ad_rate) {
        if rate > 0.0 {
            metrics.price_ad_ratio = Some(price / rate);
        }
    }

    if let Some(&index) = table.columns_matching(ORGANIC_KEYWORDS).first() {
        let top_rows = table.row_count().min(TOP_ROWS);
        let organic_in_top = table
            .numeric_cells(index)
            .into_iter()
            .filter(|(row, position)| *row < TOP_ROWS && *position <= TOP_POSITIONS)
            .count();
        metrics.organic_percent = Some(if top_rows == 0 {
            0.0
        } else {
            organic_in_top as f64 / top_rows as f64 * 100.0
        });
    }

    metrics
}

/// Brand competition figures from a brands report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BrandsMetrics {
    pub total_brands: Option<usize>,
    pub category_sales: Option<f64>,
    pub category_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zeroed_columns: Vec<String>,
}

pub fn process_brands_report(table: &Table) -> BrandsMetrics {
    let mut metrics = BrandsMetrics::default();

    if let Some(index) = BRAND_COLUMNS.iter().find_map(|name| table.column_index(name)) {
        let brands: HashSet<&str> = table
            .column(index)
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .collect();
        metrics.total_brands = Some(brands.len());
    }

    if let Some(&index) = table.columns_matching(SALES_KEYWORDS).first() {
        metrics.category_sales = Some(column_total(table, index, &mut metrics.zeroed_columns));
    }

    if let Some(&index) = table.columns_matching(REVENUE_KEYWORDS).first() {
        metrics.category_revenue = Some(column_total(table, index, &mut metrics.zeroed_columns));
    }

    metrics
}

fn warn_zeroed(kind: ReportKind, columns: &[String]) {
    for column in columns {
        crate::warn_user!(
            "Column '{}' of the {} has non-numeric cells and counts as 0",
            column,
            kind.label()
        );
    }
}

/// Combine loaded reports into rating input.
///
/// Best effort: every field starts at zero and only the reports that carry
/// it fill it in. Reports are applied in order, so a later report of the
/// same kind overrides an earlier one. A brands report only supplies revenue
/// when no niche selection report did.
pub fn extract_metrics(reports: &[(ReportKind, &Table)]) -> RawMetrics {
    let mut combined = RawMetrics::default();

    for (kind, table) in reports {
        match kind {
            ReportKind::NicheSelection => {
                let niche = process_niche_selection(table);
                warn_zeroed(*kind, &niche.zeroed_columns);
                let revenue = niche.total_revenue.unwrap_or(0.0);
                if let Some(products) = niche.total_products.filter(|p| *p > 0.0) {
                    // Revenue stands in for search demand, which the report lacks
                    combined.demand_ratio =
                        revenue / DEMAND_REVENUE_SCALE / products * DEMAND_PER_PRODUCTS;
                }
                combined.revenue = revenue;
            }
            ReportKind::SeoResults => {
                let seo = process_seo_results(table);
                combined.price_ad_ratio = seo.price_ad_ratio.unwrap_or(0.0);
                combined.organic_percent = seo.organic_percent.unwrap_or(0.0);
            }
            ReportKind::BrandsReport => {
                if combined.revenue == 0.0 {
                    let brands = process_brands_report(table);
                    warn_zeroed(*kind, &brands.zeroed_columns);
                    combined.revenue = brands.category_revenue.unwrap_or(0.0);
                }
            }
            ReportKind::SellersReport | ReportKind::ProductsReport | ReportKind::Unknown => {}
        }
    }

    combined
}
