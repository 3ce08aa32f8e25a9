//! Unit tests for correlation matrix and triangle mask

use cardioviz::pipeline::{
    correlation_matrix, correlation_matrix_with, derive_features, filter_plausible,
    FilterBounds, PipelineError, TriangleMask, MATRIX_METHOD_COLUMN_THRESHOLD,
};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[path = "common/mod.rs"]
mod common;

const TOLERANCE: f64 = 1e-9;

fn create_correlation_test_dataframe() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0], // b = 2a
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0], // Perfectly negative
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0], // Unrelated
        "label" => ["x", "y", "x", "y", "x", "y", "x", "y", "x", "y"], // Not numeric
    }
    .unwrap()
}

#[test]
fn test_only_numeric_columns_in_table_order() {
    let df = create_correlation_test_dataframe();

    let matrix = correlation_matrix(&df).unwrap();

    assert_eq!(matrix.columns, vec!["a", "b", "c", "d"]);
    assert_eq!(matrix.values.nrows(), 4);
    assert_eq!(matrix.values.ncols(), 4);
}

#[test]
fn test_known_coefficients() {
    let df = create_correlation_test_dataframe();

    let matrix = correlation_matrix(&df).unwrap();

    assert!((matrix.by_name("a", "b").unwrap() - 1.0).abs() < TOLERANCE);
    assert!((matrix.by_name("a", "c").unwrap() + 1.0).abs() < TOLERANCE);
    assert!(matrix.by_name("a", "d").unwrap().abs() < 0.5);
}

#[test]
fn test_symmetric_with_unit_diagonal() {
    let df = derive_features(common::create_random_examination_dataframe(1_500, 21)).unwrap();
    let filtered = filter_plausible(&df, &FilterBounds::default()).unwrap();

    let matrix = correlation_matrix(&filtered.table).unwrap();

    for i in 0..matrix.len() {
        assert!((matrix.get(i, i) - 1.0).abs() < TOLERANCE, "diagonal {}", i);
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i), "asymmetric at ({}, {})", i, j);
            assert!(matrix.get(i, j).abs() <= 1.0);
        }
    }
}

#[test]
fn test_pairwise_and_matrix_methods_agree() {
    let df = derive_features(common::create_random_examination_dataframe(1_000, 8)).unwrap();

    let pairwise = correlation_matrix_with(&df, false).unwrap();
    let fast = correlation_matrix_with(&df, true).unwrap();

    assert_eq!(pairwise.columns, fast.columns);
    for i in 0..pairwise.len() {
        for j in 0..pairwise.len() {
            assert!(
                (pairwise.get(i, j) - fast.get(i, j)).abs() < 1e-9,
                "methods differ at ({}, {}): {} vs {}",
                i,
                j,
                pairwise.get(i, j),
                fast.get(i, j)
            );
        }
    }
}

#[test]
fn test_matrix_method_with_nulls_matches_pairwise() {
    let df = df! {
        "a" => [Some(1.0f64), Some(2.0), Some(3.0), Some(4.0), Some(5.0), None],
        "b" => [Some(2.0f64), Some(4.0), Some(6.0), Some(8.0), Some(10.0), Some(100.0)],
    }
    .unwrap();

    let pairwise = correlation_matrix_with(&df, false).unwrap();
    let fast = correlation_matrix_with(&df, true).unwrap();

    assert!((pairwise.by_name("a", "b").unwrap() - 1.0).abs() < TOLERANCE);
    assert!((fast.by_name("a", "b").unwrap() - 1.0).abs() < TOLERANCE);
}

/// Derived examination table widened with noise columns, every `null_every`-th
/// noise value missing (0 keeps them complete)
fn create_wide_dataframe(rows: usize, extra: usize, null_every: usize) -> DataFrame {
    let mut df = derive_features(common::create_random_examination_dataframe(rows, 5)).unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    for k in 0..extra {
        let values: Vec<Option<f64>> = (0..rows)
            .map(|i| {
                let v = rng.gen::<f64>();
                (null_every == 0 || i % null_every != k).then_some(v)
            })
            .collect();
        df.with_column(Column::new(format!("noise_{}", k).into(), values))
            .unwrap();
    }

    df
}

#[test]
fn test_wide_table_symmetric_with_unit_diagonal() {
    for null_every in [0, 7] {
        let df = create_wide_dataframe(800, 4, null_every);
        let matrix = correlation_matrix(&df).unwrap();
        let pairwise = correlation_matrix_with(&df, false).unwrap();

        assert!(matrix.len() >= MATRIX_METHOD_COLUMN_THRESHOLD);
        for i in 0..matrix.len() {
            assert!((matrix.get(i, i) - 1.0).abs() < TOLERANCE, "diagonal {}", i);
            for j in 0..matrix.len() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i), "asymmetric at ({}, {})", i, j);
                assert!(
                    (matrix.get(i, j) - pairwise.get(i, j)).abs() < 1e-9,
                    "differs from pairwise at ({}, {}) with null_every = {}",
                    i,
                    j,
                    null_every
                );
            }
        }
    }
}

#[test]
fn test_constant_column_is_nan() {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0],
        "constant" => [5.0f64, 5.0, 5.0, 5.0],
        "b" => [4.0f64, 3.0, 1.0, 2.0],
    }
    .unwrap();

    for use_matrix in [false, true] {
        let matrix = correlation_matrix_with(&df, use_matrix).unwrap();

        assert!(matrix.by_name("a", "constant").unwrap().is_nan());
        assert!(matrix.by_name("constant", "constant").unwrap().is_nan());
        assert!(!matrix.by_name("a", "b").unwrap().is_nan());
    }
}

#[test]
fn test_lower_pairs_sorted_and_skip_nan() {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "b" => [1.0f64, 2.0, 3.0, 4.0, 6.0],
        "constant" => [1.0f64, 1.0, 1.0, 1.0, 1.0],
        "c" => [2.0f64, 1.0, 4.0, 3.0, 5.0],
    }
    .unwrap();

    let matrix = correlation_matrix(&df).unwrap();
    let pairs = matrix.lower_pairs();

    // 4 columns -> 6 lower cells, 3 of them involve the constant column
    assert_eq!(pairs.len(), 3);
    assert!(pairs
        .windows(2)
        .all(|w| w[0].correlation.abs() >= w[1].correlation.abs()));
    assert_eq!((pairs[0].feature1.as_str(), pairs[0].feature2.as_str()), ("b", "a"));
}

#[test]
fn test_insufficient_columns() {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0],
        "label" => ["x", "y", "z"],
    }
    .unwrap();

    let err = correlation_matrix(&df).unwrap_err();

    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::InsufficientColumns { found: 1 })
    );
}

#[test]
fn test_mask_covers_upper_triangle_with_diagonal() {
    let mask = TriangleMask::upper(5);
    let rows = mask.to_rows();

    assert_eq!(mask.size(), 5);
    assert_eq!(rows.len(), 5);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), 5);
        for (j, &masked) in row.iter().enumerate() {
            assert_eq!(masked, j >= i, "mask[{}][{}]", i, j);
        }
    }

    let visible = rows.iter().flatten().filter(|m| !**m).count();
    assert_eq!(visible, 5 * 4 / 2);
}
