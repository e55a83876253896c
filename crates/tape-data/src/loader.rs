//! Observation CSV loader (deterministic).
//!
//! Required columns:
//! - `symbol`
//! - `logical_time`
//! - `price_micros`
//!
//! Blank lines and `#` comments are skipped. Output order is
//! `(logical_time ASC, symbol ASC)`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tape_events::Observation;

/// Loader errors are small, explicit, and test-friendly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    EmptyInput,
    MissingHeader(&'static str),
    ParseInt { column: String, value: String },
    BadRow { line: usize, reason: String },
    Io(String),
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e.to_string())
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::EmptyInput => write!(f, "empty input"),
            LoadError::MissingHeader(h) => write!(f, "missing header: {}", h),
            LoadError::ParseInt { column, value } => {
                write!(f, "failed to parse int in column {}: {}", column, value)
            }
            LoadError::BadRow { line, reason } => write!(f, "bad row at line {}: {}", line, reason),
            LoadError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

/// Load observations from a CSV file on disk.
///
/// IO is explicit; parsing and sorting are deterministic.
pub fn load_csv_file(path: impl AsRef<Path>) -> Result<Vec<Observation>, LoadError> {
    let s = fs::read_to_string(path)?;
    parse_csv_observations(&s)
}

/// Parse observations from CSV content (pure, deterministic).
pub fn parse_csv_observations(csv: &str) -> Result<Vec<Observation>, LoadError> {
    let mut lines = csv.lines();

    let header_line = lines.next().ok_or(LoadError::EmptyInput)?;
    // Normalize header: trim whitespace and strip UTF-8 BOM if present.
    let header_line = header_line.trim().trim_start_matches('\u{feff}');
    if header_line.is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let headers: Vec<String> = split_csv_line(header_line);

    let mut idx: BTreeMap<String, usize> = BTreeMap::new();
    for (i, h) in headers.iter().enumerate() {
        idx.insert(h.clone(), i);
    }

    let col_symbol = find_required(&idx, "symbol")?;
    let col_time = find_required(&idx, "logical_time")?;
    let col_price = find_required(&idx, "price_micros")?;

    let mut out: Vec<Observation> = Vec::new();

    for (line_idx0, raw) in lines.enumerate() {
        let line_no = line_idx0 + 2; // 1-based, counting header as line 1

        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let fields = split_csv_line(raw);
        let get = |col: usize| -> Result<&str, LoadError> {
            fields
                .get(col)
                .map(|s| s.as_str())
                .ok_or_else(|| LoadError::BadRow {
                    line: line_no,
                    reason: format!("missing column index {col}"),
                })
        };

        let symbol = get(col_symbol)?.to_string();
        if symbol.is_empty() {
            return Err(LoadError::BadRow {
                line: line_no,
                reason: "symbol is empty".to_string(),
            });
        }

        let logical_time = parse_i64(get(col_time)?, "logical_time")?;
        if logical_time < 0 {
            return Err(LoadError::BadRow {
                line: line_no,
                reason: format!("negative logical_time: {logical_time}"),
            });
        }

        let price_micros = parse_i64(get(col_price)?, "price_micros")?;
        if price_micros <= 0 {
            return Err(LoadError::BadRow {
                line: line_no,
                reason: format!("non-positive price_micros: {price_micros}"),
            });
        }

        out.push(Observation {
            logical_time,
            symbol,
            price_micros,
        });
    }

    // Deterministic ordering: (logical_time ASC, symbol ASC)
    out.sort_by(|a, b| {
        a.logical_time
            .cmp(&b.logical_time)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    Ok(out)
}

fn find_required(idx: &BTreeMap<String, usize>, name: &'static str) -> Result<usize, LoadError> {
    idx.get(name).copied().ok_or(LoadError::MissingHeader(name))
}

fn parse_i64(s: &str, col: &str) -> Result<i64, LoadError> {
    let t = s.trim();
    t.parse::<i64>().map_err(|_| LoadError::ParseInt {
        column: col.to_string(),
        value: t.to_string(),
    })
}

/// Minimal CSV splitting (no quoting support).
fn split_csv_line(line: &str) -> Vec<String> {
    line.split(',').map(|s| s.trim().to_string()).collect()
}
