//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small examination table with hand-picked values.
///
/// Ten subjects, every required column present plus `id`, `age`, `gender`.
pub fn create_examination_dataframe() -> DataFrame {
    df! {
        "id" => [0i64, 1, 2, 3, 4, 5, 6, 7, 8, 9],
        "age" => [18393i64, 20228, 18857, 17623, 17474, 21914, 22113, 22584, 17668, 19834],
        "gender" => [2i64, 1, 1, 2, 1, 1, 1, 2, 1, 1],
        "height" => [168i64, 156, 165, 169, 156, 151, 157, 178, 158, 164],
        "weight" => [62.0f64, 85.0, 64.0, 82.0, 56.0, 67.0, 93.0, 95.0, 71.0, 68.0],
        "ap_hi" => [110i64, 140, 130, 150, 100, 120, 130, 130, 110, 110],
        "ap_lo" => [80i64, 90, 70, 100, 60, 80, 80, 90, 70, 60],
        "cholesterol" => [1i64, 3, 3, 1, 1, 2, 3, 3, 1, 1],
        "gluc" => [1i64, 1, 1, 1, 1, 2, 1, 3, 1, 1],
        "smoke" => [0i64, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        "alco" => [0i64, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        "active" => [1i64, 1, 0, 1, 0, 0, 1, 1, 1, 0],
        "cardio" => [0i64, 1, 1, 1, 0, 0, 0, 1, 0, 0],
    }
    .unwrap()
}

/// Create a synthetic examination table with realistic value ranges.
///
/// About 5% of rows have `ap_lo > ap_hi` so the plausibility filter has work to do.
pub fn create_random_examination_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut height = Vec::with_capacity(rows);
    let mut weight = Vec::with_capacity(rows);
    let mut ap_hi = Vec::with_capacity(rows);
    let mut ap_lo = Vec::with_capacity(rows);
    let mut cholesterol = Vec::with_capacity(rows);
    let mut gluc = Vec::with_capacity(rows);
    let mut smoke = Vec::with_capacity(rows);
    let mut alco = Vec::with_capacity(rows);
    let mut active = Vec::with_capacity(rows);
    let mut cardio = Vec::with_capacity(rows);
    let mut age = Vec::with_capacity(rows);

    for _ in 0..rows {
        let h: i64 = rng.gen_range(145..200);
        height.push(h);
        weight.push(rng.gen_range(45.0f64..120.0).round());
        let hi: i64 = rng.gen_range(95..180);
        ap_hi.push(hi);
        ap_lo.push(if rng.gen_bool(0.05) {
            hi + rng.gen_range(1..40)
        } else {
            hi - rng.gen_range(20..50)
        });
        cholesterol.push(rng.gen_range(1i64..=3));
        gluc.push(rng.gen_range(1i64..=3));
        smoke.push(rng.gen_bool(0.1) as i64);
        alco.push(rng.gen_bool(0.05) as i64);
        active.push(rng.gen_bool(0.8) as i64);
        cardio.push(rng.gen_bool(0.5) as i64);
        age.push(rng.gen_range(14_000i64..24_000));
    }

    DataFrame::new(vec![
        Column::new("id".into(), (0..rows as i64).collect::<Vec<_>>()),
        Column::new("age".into(), age),
        Column::new("height".into(), height),
        Column::new("weight".into(), weight),
        Column::new("ap_hi".into(), ap_hi),
        Column::new("ap_lo".into(), ap_lo),
        Column::new("cholesterol".into(), cholesterol),
        Column::new("gluc".into(), gluc),
        Column::new("smoke".into(), smoke),
        Column::new("alco".into(), alco),
        Column::new("active".into(), active),
        Column::new("cardio".into(), cardio),
    ])
    .unwrap()
}

/// Create a temporary directory holding the table as `medical_examination.csv`
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("medical_examination.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("medical_examination.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Read an integer column as plain values (nulls fail the test)
pub fn int_values(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

/// Read a numeric column as floats (nulls fail the test)
pub fn float_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a file starts with the PNG signature
pub fn assert_png(path: &std::path::Path) {
    let bytes = std::fs::read(path).unwrap();
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "{} is not a PNG file",
        path.display()
    );
}
