use std::collections::BTreeSet;
use std::path::Path;

use crate::error::LoadError;
use crate::models::{Columns, RawCell, Record};
use crate::query::CategoryFilter;

/// Header row plus body rows, as read from a source file.
type RawTable = (Vec<String>, Vec<Vec<RawCell>>);

static EMPTY: RawCell = RawCell::Empty;

/// How to read a cost source file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Worksheet to read; the first sheet when `None`.
    pub sheet: Option<String>,
    /// Field delimiter for CSV sources.
    pub delimiter: u8,
    pub columns: Columns,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            delimiter: b',',
            columns: Columns::default(),
        }
    }
}

/// Cleaned, read-only set of cost records.
///
/// Every retained record carries a finite numeric value; rows whose value
/// cell fails coercion are dropped while loading and only counted.
#[derive(Debug, Clone)]
pub struct CostDataset {
    headers: Vec<String>,
    records: Vec<Record>,
    groups: Vec<String>,
    raw_rows: usize,
}

impl CostDataset {
    /// Load and clean a spreadsheet (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) or CSV file.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::SourceNotFound(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let (headers, rows) = match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
                read_workbook(path, options.sheet.as_deref())?
            }
            "csv" => read_csv(path, options.delimiter)?,
            "" => return Err(LoadError::Parse("file has no extension".to_string())),
            other => {
                return Err(LoadError::Parse(format!(
                    "unsupported file extension: .{other}"
                )))
            }
        };

        let dataset = Self::from_rows(headers, rows, &options.columns)?;
        log::debug!(
            "loaded {}: {} rows read, {} kept, {} dropped, {} planning groups",
            path.display(),
            dataset.raw_rows,
            dataset.len(),
            dataset.dropped(),
            dataset.groups.len()
        );
        Ok(dataset)
    }

    /// Build a dataset from in-memory rows, applying the same cleaning as `load`.
    /// Rows with no non-empty cell are skipped and not counted.
    pub fn from_rows(
        headers: Vec<String>,
        rows: Vec<Vec<RawCell>>,
        columns: &Columns,
    ) -> Result<Self, LoadError> {
        let group_idx = column_index(&headers, &columns.planning_group)?;
        let super_idx = column_index(&headers, &columns.superintendence)?;
        let value_idx = column_index(&headers, &columns.value)?;

        let mut records = Vec::with_capacity(rows.len());
        let mut raw_rows = 0usize;
        for row in rows {
            if row.iter().all(|c| *c == RawCell::Empty) {
                continue;
            }
            raw_rows += 1;

            let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY);
            let Some(value) = coerce_value(cell(value_idx)) else {
                continue;
            };
            let mut cells: Vec<String> = row.iter().map(RawCell::display).collect();
            cells.resize(headers.len().max(cells.len()), String::new());

            records.push(Record {
                planning_group: cell(group_idx).display(),
                superintendence: cell(super_idx).display(),
                value,
                cells,
            });
        }

        let groups: BTreeSet<&str> = records.iter().map(|r| r.planning_group.as_str()).collect();
        let groups = groups.into_iter().map(str::to_string).collect();

        Ok(Self {
            headers,
            records,
            groups,
            raw_rows,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Distinct planning groups in lexical order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-blank data rows read from the source, before cleaning.
    pub fn raw_rows(&self) -> usize {
        self.raw_rows
    }

    /// Rows dropped because their value was not numeric.
    pub fn dropped(&self) -> usize {
        self.raw_rows - self.records.len()
    }

    /// Selector options: the "all" sentinel followed by every planning group.
    pub fn filter_options(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(self.groups.iter().cloned().map(CategoryFilter::Group))
            .collect()
    }
}

fn column_index(headers: &[String], name: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| LoadError::Parse(format!("missing required column '{name}'")))
}

/// Numeric coercion for the value column. `None` means the row is dropped.
fn coerce_value(cell: &RawCell) -> Option<f64> {
    let v = match cell {
        RawCell::Number(n) => *n,
        RawCell::Text(s) => s.trim().parse::<f64>().ok()?,
        RawCell::Empty | RawCell::Bool(_) | RawCell::Other(_) => return None,
    };
    v.is_finite().then_some(v)
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

fn from_data(data: &calamine::Data) -> RawCell {
    use calamine::Data;
    match data {
        Data::Empty => RawCell::Empty,
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Bool(*b),
        other => RawCell::Other(other.to_string()),
    }
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable, LoadError> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| LoadError::Parse(format!("failed to open workbook: {e}")))?;

    let range = match sheet {
        Some(name) => workbook
            .worksheet_range(name)
            .map_err(|e| LoadError::Parse(format!("failed to read sheet '{name}': {e}")))?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoadError::Parse("workbook has no sheets".to_string()))?
            .map_err(|e| LoadError::Parse(format!("failed to read first sheet: {e}")))?,
    };

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or_else(|| LoadError::Parse("sheet is empty".to_string()))?
        .iter()
        .map(|d| from_data(d).display())
        .collect();
    let body = rows.map(|row| row.iter().map(from_data).collect()).collect();
    Ok((headers, body))
}

fn read_csv(path: &Path, delimiter: u8) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path)
        .map_err(|e| LoadError::Parse(format!("failed to open CSV: {e}")))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(std::io::BufReader::new(file));

    let headers = rdr
        .headers()
        .map_err(|e| LoadError::Parse(format!("failed to read CSV header: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut body = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| LoadError::Parse(format!("malformed CSV: {e}")))?;
        body.push(
            record
                .iter()
                .map(|f| {
                    if f.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(f.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok((headers, body))
}
