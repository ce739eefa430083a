use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::detect::{detect_report_kind, ReportKind};

/// Delimiters tried in order when sniffing a delimited text export.
const DELIMITERS: [u8; 3] = [b';', b',', b'\t'];
const TEXT_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];
const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];
const PREVIEW_ROWS: usize = 5;

/// A report loaded into memory: a header row and string cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Indices of columns whose lowercased header contains any keyword.
    pub fn columns_matching(&self, keywords: &[&str]) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                let lower = h.to_lowercase();
                keywords.iter().any(|k| lower.contains(k))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the column whose header equals `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Raw cells of a column, skipping short rows.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(index).map(String::as_str))
    }

    /// Numeric cells of a column. Blank and non-numeric cells are skipped.
    pub fn numeric_column(&self, index: usize) -> Vec<f64> {
        self.column(index).filter_map(parse_number).collect()
    }

    /// Numeric cells keyed by row position, for checks that need the row index.
    pub fn numeric_cells(&self, index: usize) -> Vec<(usize, f64)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.get(index).and_then(|c| parse_number(c)).map(|v| (i, v)))
            .collect()
    }
}

/// Parse a spreadsheet number: spaces and NBSP are thousands separators,
/// a lone comma is a decimal separator. When both `.` and `,` appear, the one
/// that comes last is the decimal separator.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(_), None) => cleaned.replacen(',', ".", 1),
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replacen(',', ".", 1),
        _ => cleaned.replace(',', ""),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_with_delimiter(content: &str, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Invalid row")?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}

/// Parse delimited text, sniffing the delimiter.
///
/// Delimiters are tried in order (`;`, `,`, tab) and the first one that
/// splits the header into more than one column wins. If none does, `;` is
/// used.
pub fn parse_table(content: &str) -> Result<Table> {
    let content = content.trim_start_matches('\u{feff}');
    for delimiter in DELIMITERS {
        if let Ok(table) = parse_with_delimiter(content, delimiter) {
            if table.column_count() > 1 {
                return Ok(table);
            }
        }
    }
    parse_with_delimiter(content, DELIMITERS[0])
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Read the first worksheet of a spreadsheet. The first row is the header.
fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.with_context(|| format!("Failed to read {}", path.display()))?,
        None => bail!("Workbook has no worksheets: {}", path.display()),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|c| cell_text(c).trim().to_string()).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(Table { headers, rows })
}

/// Read a report from disk: an Excel workbook or delimited text.
pub fn read_table(path: &Path) -> Result<Table> {
    match extension(path) {
        Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) => read_workbook(path),
        Some(ext) if TEXT_EXTENSIONS.contains(&ext.as_str()) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_table(&content).with_context(|| format!("Failed to parse {}", path.display()))
        }
        _ => bail!(
            "Unsupported file format: {} (expected .xlsx, .xls or .csv)",
            path.display()
        ),
    }
}

/// Summary of an uploaded report.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub size: u64,
    pub kind: ReportKind,
    pub rows: usize,
    pub columns: usize,
    pub preview: Vec<Vec<String>>,
}

/// Load a report and describe it. Returns the table alongside the summary so
/// callers can go on to extract metrics without reading the file twice.
pub fn analyze_file(path: &Path) -> Result<(FileSummary, Table)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    let table = read_table(path)?;

    let summary = FileSummary {
        kind: detect_report_kind(&name),
        name,
        size,
        rows: table.row_count(),
        columns: table.column_count(),
        preview: table.rows.iter().take(PREVIEW_ROWS).cloned().collect(),
    };
    Ok((summary, table))
}
