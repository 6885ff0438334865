//! Console tables for the report steps

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use polars::prelude::*;

use crate::pipeline::bivariate::{BivariateReport, GroupMeans};
use crate::pipeline::correlation::CorrelationMatrix;
use crate::pipeline::crosstab::CrossTab;
use crate::pipeline::iv::{IvAnalysis, IvStrength};
use crate::pipeline::outliers::QuantileCaps;
use crate::pipeline::profile::DatasetProfile;
use crate::pipeline::ranking::FeatureRanking;
use crate::pipeline::stats::NumericSummary;
use crate::pipeline::univariate::{CategoricalUnivariate, NumericUnivariate};

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn num(value: f64) -> Cell {
    Cell::new(format!("{:.4}", value)).set_alignment(CellAlignment::Right)
}

fn opt(value: Option<f64>) -> Cell {
    match value {
        Some(v) => num(v),
        None => Cell::new("-").set_alignment(CellAlignment::Right),
    }
}

fn p_value(p: f64) -> Cell {
    let color = if p < 0.05 { Color::Green } else { Color::White };
    Cell::new(format!("{:.4e}", p)).fg(color)
}

/// Print a table indented under the step header.
pub fn print_table(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

pub fn schema_table(profile: &DatasetProfile) -> Table {
    let mut table = new_table(&["Column", "Kind", "Dtype", "Non-null"]);
    for column in &profile.columns {
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(column.kind),
            Cell::new(&column.dtype).fg(Color::DarkGrey),
            Cell::new(column.non_null),
        ]);
    }
    table
}

/// First rows of a frame, nulls shown as `null`.
pub fn sample_table(df: &DataFrame) -> Table {
    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    let header: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    let mut table = new_table(&header);
    for row in 0..df.height() {
        let cells: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|col| match col.get(row) {
                Ok(AnyValue::Null) | Err(_) => Cell::new("null").fg(Color::DarkGrey),
                Ok(AnyValue::String(s)) => Cell::new(s),
                Ok(value) => Cell::new(value),
            })
            .collect();
        table.add_row(cells);
    }
    table
}

pub fn describe_table(summaries: &[NumericSummary]) -> Table {
    let mut table = new_table(&["Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]);
    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.column),
            Cell::new(s.count),
            opt(s.mean),
            opt(s.std),
            opt(s.min),
            opt(s.q1),
            opt(s.median),
            opt(s.q3),
            opt(s.max),
        ]);
    }
    table
}

pub fn shape_table(results: &[NumericUnivariate]) -> Table {
    let mut table = new_table(&[
        "Column", "Range", "IQR", "Skewness", "Kurtosis", "W", "p-value", "n (SW)",
    ]);
    for r in results {
        let mut row = vec![
            Cell::new(&r.summary.column),
            num(r.range),
            num(r.iqr),
            num(r.skewness),
            num(r.excess_kurtosis),
        ];
        match &r.normality {
            Some(sw) => row.extend([num(sw.w), p_value(sw.p_value), Cell::new(sw.n)]),
            None => row.extend([opt(None), opt(None), opt(None)]),
        }
        table.add_row(row);
    }
    table
}

pub fn value_counts_table(counts: &CategoricalUnivariate) -> Table {
    let mut table = new_table(&[counts.column.as_str(), "Count", "%"]);
    for ((label, count), pct) in counts.counts.iter().zip(&counts.percentages) {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(count),
            Cell::new(format!("{:.2}", pct)),
        ]);
    }
    table
}

pub fn group_means_table(means: &GroupMeans) -> Table {
    let mut header = vec![means.key.as_str()];
    header.extend(means.value_columns.iter().map(|c| c.as_str()));
    let mut table = new_table(&header);
    for (label, values) in &means.rows {
        let mut row = vec![Cell::new(label)];
        row.extend(values.iter().map(|v| opt(*v)));
        table.add_row(row);
    }
    table
}

/// Row-normalized percentages of a cross-tab.
pub fn crosstab_table(tab: &CrossTab) -> Table {
    let row_header = tab.row_keys.join(" / ");
    let mut header = vec![row_header.as_str()];
    header.extend(tab.column_labels.iter().map(|c| c.as_str()));
    let mut table = new_table(&header);
    for (i, row) in tab.row_percentages().iter().enumerate() {
        let mut cells = vec![Cell::new(tab.row_label(i))];
        cells.extend(row.iter().map(|p| Cell::new(format!("{:.2}%", p))));
        table.add_row(cells);
    }
    table
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut header = vec![""];
    header.extend(matrix.columns.iter().map(|c| c.as_str()));
    let mut table = new_table(&header);
    for a in &matrix.columns {
        let mut row = vec![Cell::new(a).add_attribute(Attribute::Bold)];
        row.extend(matrix.columns.iter().map(|b| opt(matrix.get(a, b).filter(|r| !r.is_nan()))));
        table.add_row(row);
    }
    table
}

/// Point estimates and p-values of the bivariate tests that succeeded.
pub fn tests_table(report: &BivariateReport) -> Table {
    let mut table = new_table(&["Test", "Variables", "Statistic", "p-value", "Detail"]);
    if let Some(p) = &report.salary_tenure {
        table.add_row(vec![
            Cell::new("Pearson r"),
            Cell::new(format!("{} ~ {}", p.column_x, p.column_y)),
            num(p.r),
            p_value(p.p_value),
            Cell::new(format!("n = {}", p.n)),
        ]);
    }

    if let Some(t) = &report.engagement_ttest {
        table.add_row(vec![
            Cell::new("Student t"),
            Cell::new("Engagement_Score by Resigned"),
            num(t.statistic),
            p_value(t.p_value),
            Cell::new(format!(
                "means {:.3} / {:.3}, df = {}",
                t.mean_a, t.mean_b, t.degrees_of_freedom
            )),
        ]);
    }

    if let Some(c) = &report.department_chi_square {
        table.add_row(vec![
            Cell::new("Chi-square"),
            Cell::new("Department × Resigned"),
            num(c.statistic),
            p_value(c.p_value),
            Cell::new(format!(
                "df = {}{}",
                c.degrees_of_freedom,
                if c.yates_corrected { ", Yates" } else { "" }
            )),
        ]);
    }
    table
}

pub fn missing_table(ratios: &[(String, f64)]) -> Table {
    let mut table = new_table(&["Column", "Missing %"]);
    for (column, ratio) in ratios {
        let color = if *ratio > 0.0 { Color::Yellow } else { Color::White };
        table.add_row(vec![
            Cell::new(column),
            Cell::new(format!("{:.2}", ratio * 100.0)).fg(color),
        ]);
    }
    table
}

pub fn caps_table(caps: &[(String, QuantileCaps)]) -> Table {
    let mut table = new_table(&["Column", "Lower cap", "Upper cap"]);
    for (column, c) in caps {
        table.add_row(vec![Cell::new(column), num(c.lower), num(c.upper)]);
    }
    table
}

fn strength_color(strength: IvStrength) -> Color {
    match strength {
        IvStrength::Useless => Color::DarkGrey,
        IvStrength::Weak => Color::White,
        IvStrength::Medium => Color::Cyan,
        IvStrength::Strong => Color::Green,
        IvStrength::Suspicious => Color::Red,
    }
}

pub fn ranking_table(ranking: &FeatureRanking) -> Table {
    let mut table = new_table(&["#", "Feature", "Mutual info", "IV", "Strength", "Gini", "Bins"]);
    for (i, score) in ranking.scores.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&score.feature).add_attribute(Attribute::Bold),
            num(score.mutual_information),
            num(score.iv),
            Cell::new(score.iv_strength).fg(strength_color(score.iv_strength)),
            num(score.gini),
            Cell::new(score.bins),
        ]);
    }
    table
}

/// WoE bins of one feature, MISSING last.
pub fn woe_table(analysis: &IvAnalysis) -> Table {
    let mut table = new_table(&["Bin", "Count", "Events", "Event rate", "WoE", "IV"]);
    for bin in &analysis.bins {
        table.add_row(vec![
            Cell::new(format!("[{:.3}, {:.3})", bin.lower_bound, bin.upper_bound)),
            Cell::new(bin.count),
            Cell::new(bin.events),
            num(bin.event_rate),
            num(bin.woe),
            num(bin.iv_contribution),
        ]);
    }
    if let Some(missing) = &analysis.missing_bin {
        table.add_row(vec![
            Cell::new("MISSING").fg(Color::Yellow),
            Cell::new(missing.count),
            Cell::new(missing.events),
            num(missing.event_rate),
            num(missing.woe),
            num(missing.iv_contribution),
        ]);
    }
    table
}
