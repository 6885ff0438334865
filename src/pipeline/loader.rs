//! Dataset loader for spreadsheet, CSV and Parquet files

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use tracing::{debug, info};

use super::error::{EdaError, Result};

/// Extensions read through the spreadsheet reader
const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Load a dataset, dispatching on the file extension.
///
/// Spreadsheets read `sheet` (or the first sheet); the first row is the
/// header. CSV and Parquet go through polars' lazy readers.
pub fn load_dataset(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    if !path.exists() {
        return Err(EdaError::load(path, "file not found"));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|e| EdaError::load(path, format!("failed to read CSV: {}", e)))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .and_then(|lf| lf.collect())
            .map_err(|e| EdaError::load(path, format!("failed to read Parquet: {}", e)))?,
        ext if SPREADSHEET_EXTENSIONS.contains(&ext) => load_spreadsheet(path, sheet)?,
        _ => {
            return Err(EdaError::load(
                path,
                format!(
                    "unsupported file format '{}'; supported formats: xlsx, xls, ods, csv, parquet",
                    extension
                ),
            ))
        }
    };

    if df.width() == 0 {
        return Err(EdaError::load(path, "no columns found"));
    }

    info!(rows = df.height(), columns = df.width(), path = %path.display(), "dataset loaded");
    Ok(df)
}

fn load_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| EdaError::load(path, e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| EdaError::load(path, "workbook has no sheets"))?,
    };
    debug!(sheet = %sheet_name, "reading worksheet");

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| EdaError::load(path, format!("sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| EdaError::load(path, format!("sheet '{}' is empty", sheet_name)))?;
    let body: Vec<&[Data]> = rows.collect();

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(header.len());
    for (idx, cell) in header.iter().enumerate() {
        let name = cell_text(cell)
            .ok_or_else(|| EdaError::load(path, format!("header cell {} is empty", idx + 1)))?;
        if !seen.insert(name.clone()) {
            return Err(EdaError::load(path, format!("duplicate column '{}'", name)));
        }
        let cells: Vec<&Data> = body.iter().map(|row| row.get(idx).unwrap_or(&Data::Empty)).collect();
        columns.push(build_column(&name, &cells));
    }

    DataFrame::new(columns).map_err(|e| EdaError::load(path, e.to_string()))
}

/// Numeric value of a cell, if it holds one.
fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        _ => None,
    }
}

/// Text of a non-empty cell.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Float64 when every non-empty cell is numeric, otherwise String.
fn build_column(name: &str, cells: &[&Data]) -> Column {
    let all_numeric = cells
        .iter()
        .filter(|c| cell_text(c).is_some())
        .all(|c| cell_number(c).is_some());

    if all_numeric {
        let values: Vec<Option<f64>> = cells.iter().map(|c| cell_number(c)).collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells.iter().map(|c| cell_text(c)).collect();
        Column::new(name.into(), values)
    }
}

/// Estimated in-memory size of the table in megabytes
pub fn estimated_memory_mb(df: &DataFrame) -> f64 {
    df.estimated_size() as f64 / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_column_numeric() {
        let cells = [Data::Int(3), Data::Empty, Data::Float(2.5)];
        let refs: Vec<&Data> = cells.iter().collect();
        let column = build_column("Age", &refs);
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn test_build_column_mixed_becomes_text() {
        let cells = [
            Data::String("Sales".to_string()),
            Data::Int(7),
            Data::String("  ".to_string()),
        ];
        let refs: Vec<&Data> = cells.iter().collect();
        let column = build_column("Department", &refs);
        assert_eq!(column.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = column.str().unwrap().iter().collect();
        assert_eq!(values, vec![Some("Sales"), Some("7"), None]);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{}").unwrap();
        let err = load_dataset(&path, None).unwrap_err();
        assert!(err.to_string().contains("unsupported file format"));
    }
}
