//! Long-form reshaping and category counting for the bar chart

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::loader::require_columns;

/// Column that splits the chart into facets
pub const CARDIO: &str = "cardio";

/// Categorical indicators, in long-form emission order
pub const CATEGORICAL_VARIABLES: [&str; 6] =
    ["cholesterol", "gluc", "smoke", "alco", "active", "overweight"];

/// One grouped bar: how many subjects share a (cardio, variable, value) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub cardio: i32,
    pub variable: String,
    pub value: i32,
    pub total: i64,
}

/// Read a column as `Int32`, keeping nulls
fn int_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Int32)
        .with_context(|| format!("Column '{}' is not numeric", name))?;

    Ok(column.i32()?.into_iter().collect())
}

/// Reshape to long form: one `(cardio, variable, value)` row per subject and variable.
///
/// Rows are emitted variable by variable, so the result has exactly
/// `6 * df.height()` rows.
pub fn to_long_form(df: &DataFrame) -> Result<DataFrame> {
    let mut required = vec![CARDIO];
    required.extend_from_slice(&CATEGORICAL_VARIABLES);
    require_columns(df, &required)?;

    let cardio = int_column(df, CARDIO)?;
    let n = df.height();

    let mut long: Option<DataFrame> = None;
    for variable in CATEGORICAL_VARIABLES {
        let block = DataFrame::new(vec![
            Column::new(CARDIO.into(), cardio.clone()),
            Column::new("variable".into(), vec![variable; n]),
            Column::new("value".into(), int_column(df, variable)?),
        ])?;

        long = Some(match long {
            Some(acc) => acc.vstack(&block)?,
            None => block,
        });
    }

    // CATEGORICAL_VARIABLES is non-empty
    long.context("No categorical variables to reshape")
}

/// Group the long form by `(cardio, variable, value)` and count rows into `total`.
///
/// Null keys are dropped before grouping. The result is sorted ascending by
/// the key, with `variable` compared as text.
pub fn count_categories(df: &DataFrame) -> Result<DataFrame> {
    let long = to_long_form(df)?;

    long.lazy()
        .filter(col(CARDIO).is_not_null().and(col("value").is_not_null()))
        .group_by([col(CARDIO), col("variable"), col("value")])
        .agg([len().cast(DataType::Int64).alias("total")])
        .sort(
            [CARDIO, "variable", "value"],
            SortMultipleOptions::default(),
        )
        .collect()
        .context("Failed to count categorical values")
}

/// Typed view of [`count_categories`]
pub fn category_counts(df: &DataFrame) -> Result<Vec<CategoryCount>> {
    let counts = count_categories(df)?;

    let cardio = counts.column(CARDIO)?.i32()?;
    let variable = counts.column("variable")?.str()?;
    let value = counts.column("value")?.i32()?;
    let total = counts.column("total")?.i64()?;

    let rows = cardio
        .into_iter()
        .zip(variable.into_iter())
        .zip(value.into_iter())
        .zip(total.into_iter())
        .filter_map(|(((c, name), v), t)| {
            Some(CategoryCount {
                cardio: c?,
                variable: name?.to_string(),
                value: v?,
                total: t?,
            })
        })
        .collect();

    Ok(rows)
}
