//! Summary tables derived from the consolidated rows.

use std::collections::{BTreeMap, BTreeSet};

use hospital_eda_core::ConsolidatedRecord;

use crate::stats::{mean, pearson, round2};

/// Numeric columns entering the correlation matrix, in matrix order.
pub const CORRELATION_COLUMNS: [&str; 3] = ["age", "length_of_stay", "treatment_cost"];

/// Number of diseases kept in the frequency ranking.
pub const TOP_DISEASES: usize = 10;

/// Count occurrences of each present value, most frequent first; ties are
/// ordered by label.
pub fn value_counts<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }
    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub fn top_diseases(rows: &[ConsolidatedRecord]) -> Vec<(String, u64)> {
    let mut ranked = value_counts(rows.iter().map(|row| row.disease.as_deref()));
    ranked.truncate(TOP_DISEASES);
    ranked
}

/// Gender counts ordered by label.
pub fn gender_counts(rows: &[ConsolidatedRecord]) -> Vec<(String, u64)> {
    let mut counts = value_counts(rows.iter().map(|row| row.gender.as_deref()));
    counts.sort_by(|a, b| a.0.cmp(&b.0));
    counts
}

/// Group a numeric column by a categorical one. Rows missing either value
/// are skipped; groups are ordered by label.
pub fn grouped_values(
    rows: &[ConsolidatedRecord],
    key: impl Fn(&ConsolidatedRecord) -> Option<&str>,
    value: impl Fn(&ConsolidatedRecord) -> Option<f64>,
) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let (Some(label), Some(value)) = (key(row), value(row)) {
            groups.entry(label.to_string()).or_default().push(value);
        }
    }
    groups
}

/// Row-normalized contingency table.
#[derive(Debug, Clone, PartialEq)]
pub struct Crosstab {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `proportions[i][j]` is the share of row `i` falling in column `j`.
    pub proportions: Vec<Vec<f64>>,
}

/// Cross-tabulate two categorical columns, normalizing each row to sum to 1.
/// Pairs with a missing side are excluded; labels are sorted.
pub fn crosstab_normalized<'a>(pairs: impl IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>) -> Crosstab {
    let mut counts: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    for pair in pairs {
        if let (Some(row), Some(column)) = pair {
            *counts.entry(row).or_default().entry(column).or_default() += 1;
            columns.insert(column);
        }
    }

    let column_labels: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let mut row_labels = Vec::with_capacity(counts.len());
    let mut proportions = Vec::with_capacity(counts.len());
    for (row, cells) in &counts {
        let total: u64 = cells.values().sum();
        row_labels.push(row.to_string());
        proportions.push(
            columns
                .iter()
                .map(|column| cells.get(column).copied().unwrap_or(0) as f64 / total as f64)
                .collect(),
        );
    }

    Crosstab {
        row_labels,
        column_labels,
        proportions,
    }
}

pub fn admission_type_vs_outcome(rows: &[ConsolidatedRecord]) -> Crosstab {
    crosstab_normalized(
        rows.iter()
            .map(|row| (row.admission_type.as_deref(), row.outcome.as_deref())),
    )
}

/// Square Pearson correlation matrix; NaN marks an undefined pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

fn numeric_column(row: &ConsolidatedRecord, column: &str) -> Option<f64> {
    match column {
        "age" => row.age.map(f64::from),
        "length_of_stay" => row.length_of_stay.map(|stay| stay as f64),
        "treatment_cost" => row.treatment_cost.map(|cost| cost as f64),
        _ => None,
    }
}

/// Correlate [`CORRELATION_COLUMNS`], each pair over the rows where both
/// values are present.
pub fn correlation_matrix(rows: &[ConsolidatedRecord]) -> CorrelationMatrix {
    let values = CORRELATION_COLUMNS
        .iter()
        .map(|a| {
            CORRELATION_COLUMNS
                .iter()
                .map(|b| {
                    let (xs, ys): (Vec<f64>, Vec<f64>) = rows
                        .iter()
                        .filter_map(|row| Some((numeric_column(row, a)?, numeric_column(row, b)?)))
                        .unzip();
                    pearson(&xs, &ys)
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: CORRELATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
        values,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentSummary {
    pub department: String,
    pub total_patients: u64,
    /// NaN when the department has no value to average.
    pub avg_length_of_stay: f64,
    pub avg_treatment_cost: f64,
}

/// Per-department counts and means, ordered by department name.
pub fn department_summary(rows: &[ConsolidatedRecord]) -> Vec<DepartmentSummary> {
    let mut groups: BTreeMap<&str, Vec<&ConsolidatedRecord>> = BTreeMap::new();
    for row in rows {
        if let Some(department) = row.department.as_deref() {
            groups.entry(department).or_default().push(row);
        }
    }

    groups
        .into_iter()
        .map(|(department, members)| {
            let stays: Vec<f64> = members
                .iter()
                .filter_map(|r| r.length_of_stay.map(|stay| stay as f64))
                .collect();
            let costs: Vec<f64> = members
                .iter()
                .filter_map(|r| r.treatment_cost.map(|c| c as f64))
                .collect();
            DepartmentSummary {
                department: department.to_string(),
                total_patients: members.iter().filter(|r| !r.patient_id.is_empty()).count() as u64,
                avg_length_of_stay: mean(&stays).map(round2).unwrap_or(f64::NAN),
                avg_treatment_cost: mean(&costs).map(round2).unwrap_or(f64::NAN),
            }
        })
        .collect()
}
