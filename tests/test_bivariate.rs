//! Tests for relationships between pairs of columns

use attrition_eda::pipeline::bivariate::{analyze_bivariate, chi_square_test, group_means};
use attrition_eda::pipeline::correlation::correlation_matrix;
use attrition_eda::pipeline::{columns, EdaConfig, EdaError};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_full_report_on_realistic_data() {
    let df = common::create_hr_dataframe(600, 31);
    let report = analyze_bivariate(&df, &EdaConfig::default());
    assert!(report.failures.is_empty(), "{:?}", report.failures);

    let gender = report.gender_attrition.as_ref().unwrap();
    assert_eq!(gender.column_labels, vec!["No", "Yes"]);
    for row in gender.row_percentages() {
        let sum: f64 = row.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    let ttest = report.engagement_ttest.as_ref().unwrap();
    assert!((0.0..=1.0).contains(&ttest.p_value));
    // Low engagement drives resignations in the fixture
    assert!(ttest.mean_a < ttest.mean_b);

    let chi = report.department_chi_square.as_ref().unwrap();
    assert_eq!(chi.degrees_of_freedom, 3);
    assert!(!chi.yates_corrected);

    let boxes = report.salary_by_department.as_ref().unwrap();
    let labels: Vec<&str> = boxes.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, common::DEPARTMENTS.to_vec());
}

#[test]
fn test_correlation_matrix_symmetric_unit_diagonal() {
    let df = common::create_hr_dataframe(300, 32);
    let matrix = correlation_matrix(&df, &EdaConfig::default().correlation_columns).unwrap();
    for a in &matrix.columns {
        assert!((matrix.get(a, a).unwrap() - 1.0).abs() < 1e-12);
        for b in &matrix.columns {
            let r = matrix.get(a, b).unwrap();
            assert!((r - matrix.get(b, a).unwrap()).abs() < 1e-12);
            assert!((-1.0..=1.0).contains(&r));
        }
    }
}

#[test]
fn test_group_means_one_row_per_department() {
    let df = common::create_hr_dataframe(200, 33);
    let means = group_means(&df, columns::DEPARTMENT, &EdaConfig::default().group_mean_columns).unwrap();
    assert_eq!(means.rows.len(), 4);
    for (_, values) in &means.rows {
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| v.is_some()));
    }
}

#[test]
fn test_two_by_two_table_uses_yates() {
    let df = common::create_hr_dataframe(200, 34);
    let chi = chi_square_test(&df, columns::GENDER, columns::RESIGNED).unwrap();
    assert_eq!(chi.degrees_of_freedom, 1);
    assert!(chi.yates_corrected);
}

#[test]
fn test_missing_column_is_reported_not_fatal() {
    let df = common::create_hr_dataframe(100, 35).drop(columns::GENDER).unwrap();
    let report = analyze_bivariate(&df, &EdaConfig::default());
    assert!(report.gender_attrition.is_none());
    assert!(report.salary_tenure.is_some());
    assert!(report
        .failures
        .iter()
        .any(|e| matches!(e, EdaError::Schema { column, .. } if column == columns::GENDER)));
}
