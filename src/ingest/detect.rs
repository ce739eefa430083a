use serde::Serialize;

/// Kind of marketplace analytics report, guessed from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    NicheSelection,
    SeoResults,
    BrandsReport,
    SellersReport,
    ProductsReport,
    Unknown,
}

/// Keywords per kind, checked in this order. First hit wins.
const KEYWORDS: &[(ReportKind, &[&str])] = &[
    (ReportKind::NicheSelection, &["выбор ниши", "niche", "ниша"]),
    (
        ReportKind::SeoResults,
        &["seo", "результаты поиска", "search results"],
    ),
    (
        ReportKind::BrandsReport,
        &["бренд", "brand", "отчет по брендам"],
    ),
    (
        ReportKind::SellersReport,
        &["продавец", "seller", "отчет по продавцам"],
    ),
    (
        ReportKind::ProductsReport,
        &["товар", "product", "похожие товары"],
    ),
];

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::NicheSelection => "niche selection",
            ReportKind::SeoResults => "SEO results",
            ReportKind::BrandsReport => "brands report",
            ReportKind::SellersReport => "sellers report",
            ReportKind::ProductsReport => "products report",
            ReportKind::Unknown => "unknown",
        }
    }

    /// Whether metrics are extracted from this kind of report.
    pub fn feeds_rating(&self) -> bool {
        matches!(
            self,
            ReportKind::NicheSelection | ReportKind::SeoResults | ReportKind::BrandsReport
        )
    }
}

/// Guess the report kind from a file name by keyword.
pub fn detect_report_kind(filename: &str) -> ReportKind {
    let lower = filename.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ReportKind::Unknown)
}

/// Tips for preparing a report of the given kind.
pub fn processing_tips(kind: ReportKind) -> &'static [&'static str] {
    match kind {
        ReportKind::NicheSelection => &[
            "Make sure the file contains the number of products in the category",
            "Check that category revenue is present",
            "Use data for the last month so the rating is current",
        ],
        ReportKind::SeoResults => &[
            "The file should contain advertising bids",
            "Make sure product prices are present",
            "Check the organic (non-advertised) position data",
        ],
        ReportKind::BrandsReport => &[
            "The file should cover every brand in the category",
            "Check that sales and revenue columns are present",
            "Make sure the data is up to date",
        ],
        _ => &[
            "Rename the file to include a keyword such as 'niche', 'SEO' or 'brand'",
            "Export the report as .xlsx or .csv",
            "Check the data layout of the file",
        ],
    }
}

/// One warning for a report whose kind could not be detected, tips included.
pub fn unrecognized_report_message(name: &str) -> String {
    let mut message = format!("Could not tell what kind of report {} is", name);
    for tip in processing_tips(ReportKind::Unknown) {
        message.push_str("\n  - ");
        message.push_str(tip);
    }
    message
}
