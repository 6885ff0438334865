//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io;
use std::path::PathBuf;

use attrition_eda::report::{Plot, PlotSink};
use polars::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use tempfile::TempDir;

pub const DEPARTMENTS: [&str; 4] = ["Finance", "HR", "IT", "Sales"];

/// Synthetic HR table with the seven input columns.
///
/// - `Engagement_Score`: 1-10, about 10% null
/// - `Tenure_Months`: 0-120, a handful of zeros
/// - `Salary`: 30k-120k with a few extreme values on both ends
/// - `Resigned`: more likely for low engagement and short tenure
pub fn create_hr_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut age = Vec::with_capacity(rows);
    let mut tenure = Vec::with_capacity(rows);
    let mut salary = Vec::with_capacity(rows);
    let mut engagement = Vec::with_capacity(rows);
    let mut department = Vec::with_capacity(rows);
    let mut gender = Vec::with_capacity(rows);
    let mut resigned = Vec::with_capacity(rows);

    for i in 0..rows {
        let months = if i % 97 == 0 { 0.0 } else { rng.gen_range(1..=120) as f64 };
        let score = rng.gen_range(1..=10) as f64;
        let base = 30_000.0 + rng.gen::<f64>() * 90_000.0;
        let pay = match i % 151 {
            0 => 900_000.0,
            75 => 1_000.0,
            _ => base,
        };

        let mut p_resign = 0.15;
        if score < 5.0 {
            p_resign += 0.35;
        }
        if months < 24.0 {
            p_resign += 0.2;
        }

        age.push(rng.gen_range(22..=60) as f64);
        tenure.push(Some(months));
        salary.push(Some(pay));
        engagement.push(if rng.gen::<f64>() < 0.1 { None } else { Some(score) });
        department.push(DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())]);
        gender.push(if rng.gen::<bool>() { "Male" } else { "Female" });
        resigned.push(if rng.gen::<f64>() < p_resign { "Yes" } else { "No" });
    }

    df! {
        "Age" => age,
        "Tenure_Months" => tenure,
        "Salary" => salary,
        "Engagement_Score" => engagement,
        "Department" => department,
        "Gender" => gender,
        "Resigned" => resigned,
    }
    .unwrap()
}

/// Replace a column of `df` with all-null floats.
pub fn null_out(df: &mut DataFrame, column: &str) {
    let nulls: Vec<Option<f64>> = vec![None; df.height()];
    df.with_column(Column::new(column.into(), nulls)).unwrap();
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("hr.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("hr.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// A cell written by `create_temp_workbook`
#[derive(Debug, Clone, Copy)]
pub enum SheetCell {
    Num(f64),
    Text(&'static str),
    Empty,
}

/// Create a temporary `hr.xlsx` with one worksheet per `(name, rows)`
pub fn create_temp_workbook(sheets: &[(&str, Vec<Vec<SheetCell>>)]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let xlsx_path = temp_dir.path().join("hr.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    SheetCell::Num(v) => {
                        worksheet.write_number(r as u32, c as u16, *v).unwrap();
                    }
                    SheetCell::Text(t) => {
                        worksheet.write_string(r as u32, c as u16, *t).unwrap();
                    }
                    SheetCell::Empty => {}
                }
            }
        }
    }
    workbook.save(&xlsx_path).unwrap();

    (temp_dir, xlsx_path)
}

/// Sink that keeps the title of every plot it receives
#[derive(Default)]
pub struct RecordingSink {
    pub titles: Vec<String>,
}

impl PlotSink for RecordingSink {
    fn render(&mut self, plot: Plot<'_>) -> io::Result<()> {
        self.titles.push(plot.title());
        Ok(())
    }
}

/// Sink whose output device is gone
pub struct BrokenSink;

impl PlotSink for BrokenSink {
    fn render(&mut self, _plot: Plot<'_>) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

pub fn floats(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .iter()
        .collect()
}

pub fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect()
}
