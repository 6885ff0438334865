//! Tests for percentile capping

use attrition_eda::pipeline::columns;
use attrition_eda::pipeline::outliers::{apply_caps, percentile_caps, treat_outliers};
use attrition_eda::pipeline::{EdaError, Step};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_capped_values_within_percentiles() {
    let mut df = common::create_hr_dataframe(1000, 21);
    let caps = treat_outliers(&mut df, 0.01, 0.99).unwrap();
    assert_eq!(caps.len(), 2);

    let (_, salary_caps) = caps.iter().find(|(c, _)| c == columns::SALARY_CAPPED).unwrap();
    for value in common::floats(&df, columns::SALARY_CAPPED).into_iter().flatten() {
        assert!(value >= salary_caps.lower && value <= salary_caps.upper);
    }
    // Extreme salaries were pulled in
    assert!(salary_caps.upper < 900_000.0);
    assert!(salary_caps.lower > 1_000.0);
}

#[test]
fn test_values_inside_caps_unchanged() {
    let mut df = common::create_hr_dataframe(300, 22);
    treat_outliers(&mut df, 0.01, 0.99).unwrap();
    let caps = percentile_caps(&df, columns::TENURE_MONTHS, 0.01, 0.99).unwrap();

    let original = common::floats(&df, columns::TENURE_MONTHS);
    let capped = common::floats(&df, columns::TENURE_CAPPED);
    for (o, c) in original.iter().zip(&capped) {
        match (o, c) {
            (Some(o), Some(c)) if *o >= caps.lower && *o <= caps.upper => assert_eq!(o, c),
            (Some(_), Some(_)) => {}
            (None, None) => {}
            _ => panic!("null pattern changed"),
        }
    }
}

#[test]
fn test_capping_is_idempotent() {
    let mut df = common::create_hr_dataframe(300, 23);
    let caps = percentile_caps(&df, columns::SALARY, 0.01, 0.99).unwrap();
    apply_caps(&mut df, columns::SALARY, &caps, columns::SALARY_CAPPED).unwrap();
    let first = common::floats(&df, columns::SALARY_CAPPED);

    let changed = apply_caps(&mut df, columns::SALARY_CAPPED, &caps, columns::SALARY_CAPPED).unwrap();
    assert_eq!(changed, 0);
    assert_eq!(common::floats(&df, columns::SALARY_CAPPED), first);
}

#[test]
fn test_all_null_source_fails() {
    let mut df = common::create_hr_dataframe(20, 24);
    common::null_out(&mut df, columns::SALARY);

    let err = treat_outliers(&mut df, 0.01, 0.99).unwrap_err();
    assert!(matches!(err, EdaError::StatisticalPrecondition { .. }));
    assert_eq!(err.step(), Step::Outliers);
    assert_eq!(err.columns(), vec![columns::SALARY.to_string()]);
}
