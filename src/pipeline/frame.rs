//! Column access helpers over the shared DataFrame

use polars::prelude::*;

use super::error::{EdaError, PolarsResultExt, Result, Step};

/// Fail with a schema error naming the first column that is absent.
pub fn require_columns(df: &DataFrame, step: Step, columns: &[&str]) -> Result<()> {
    let present: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    for column in columns {
        if !present.contains(column) {
            return Err(EdaError::Schema {
                step,
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn column<'a>(df: &'a DataFrame, step: Step, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| EdaError::Schema {
        step,
        column: name.to_string(),
    })
}

/// Read a column as nullable floats, casting numeric types to Float64.
pub fn float_values(df: &DataFrame, step: Step, name: &str) -> Result<Vec<Option<f64>>> {
    let col = column(df, step, name)?;
    let float_col = col.cast(&DataType::Float64).in_step(step, name)?;
    let values = float_col.f64().in_step(step, name)?;
    Ok(values.iter().collect())
}

/// Read a column as nullable strings.
pub fn string_values(df: &DataFrame, step: Step, name: &str) -> Result<Vec<Option<String>>> {
    let col = column(df, step, name)?;
    let string_col = col.cast(&DataType::String).in_step(step, name)?;
    let values = string_col.str().in_step(step, name)?;
    Ok(values.iter().map(|v| v.map(|s| s.to_string())).collect())
}

/// Append (or replace) a float column.
pub fn put_floats(df: &mut DataFrame, step: Step, name: &str, values: Vec<Option<f64>>) -> Result<()> {
    df.with_column(Column::new(name.into(), values))
        .in_step(step, name)?;
    Ok(())
}

/// Append (or replace) an integer flag column.
pub fn put_ints(df: &mut DataFrame, step: Step, name: &str, values: Vec<Option<i32>>) -> Result<()> {
    df.with_column(Column::new(name.into(), values))
        .in_step(step, name)?;
    Ok(())
}

/// Append (or replace) a string column.
pub fn put_strings(
    df: &mut DataFrame,
    step: Step,
    name: &str,
    values: Vec<Option<&str>>,
) -> Result<()> {
    df.with_column(Column::new(name.into(), values))
        .in_step(step, name)?;
    Ok(())
}

/// Non-null values in row order.
pub fn non_null(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().filter_map(|v| *v).filter(|v| !v.is_nan()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_columns_names_missing() {
        let df = df! {
            "Salary" => [1.0f64, 2.0],
        }
        .unwrap();

        assert!(require_columns(&df, Step::Load, &["Salary"]).is_ok());
        let err = require_columns(&df, Step::Load, &["Salary", "Age"]).unwrap_err();
        assert_eq!(err.columns(), vec!["Age"]);
    }

    #[test]
    fn test_float_values_casts_integers() {
        let df = df! {
            "n" => [Some(1i32), None, Some(3)],
        }
        .unwrap();
        let values = float_values(&df, Step::Profile, "n").unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_put_floats_appends_column() {
        let mut df = df! {
            "a" => [1.0f64, 2.0],
        }
        .unwrap();
        put_floats(&mut df, Step::Outliers, "b", vec![Some(0.5), None]).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("b").unwrap().null_count(), 1);
    }
}
