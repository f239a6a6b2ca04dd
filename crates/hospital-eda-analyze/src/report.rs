//! CSV exports of the summary tables.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hospital_eda_core::write_atomic;

use crate::errors::AnalyzeError;
use crate::tables::{CorrelationMatrix, Crosstab, DepartmentSummary};

pub const CROSSTAB_FILE_NAME: &str = "admission_type_vs_outcome.csv";
pub const CORRELATION_FILE_NAME: &str = "correlation_matrix.csv";
pub const DEPARTMENT_SUMMARY_FILE_NAME: &str = "department_summary.csv";

/// Render a float as plain decimal text. Integral values keep one decimal
/// place and NaN becomes an empty field.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn write_rows(path: &Path, rows: impl IntoIterator<Item = Vec<String>>) -> Result<(), AnalyzeError> {
    write_atomic(path, |file: &mut File| {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    })
}

pub fn write_crosstab_csv(path: &Path, row_header: &str, table: &Crosstab) -> Result<(), AnalyzeError> {
    let header: Vec<String> = std::iter::once(row_header.to_string())
        .chain(table.column_labels.iter().cloned())
        .collect();
    let body = table
        .row_labels
        .iter()
        .zip(&table.proportions)
        .map(|(label, cells)| {
            std::iter::once(label.clone())
                .chain(cells.iter().map(|v| format_float(*v)))
                .collect::<Vec<String>>()
        });
    write_rows(path, std::iter::once(header).chain(body))
}

pub fn write_correlation_csv(path: &Path, matrix: &CorrelationMatrix) -> Result<(), AnalyzeError> {
    let header: Vec<String> = std::iter::once(String::new())
        .chain(matrix.columns.iter().cloned())
        .collect();
    let body = matrix
        .columns
        .iter()
        .zip(&matrix.values)
        .map(|(label, cells)| {
            std::iter::once(label.clone())
                .chain(cells.iter().map(|v| format_float(*v)))
                .collect::<Vec<String>>()
        });
    write_rows(path, std::iter::once(header).chain(body))
}

pub fn write_department_summary_csv(
    path: &Path,
    summary: &[DepartmentSummary],
) -> Result<(), AnalyzeError> {
    let header: Vec<String> = [
        "department",
        "total_patients",
        "avg_length_of_stay",
        "avg_treatment_cost",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();
    let body = summary.iter().map(|entry| {
        vec![
            entry.department.clone(),
            entry.total_patients.to_string(),
            format_float(entry.avg_length_of_stay),
            format_float(entry.avg_treatment_cost),
        ]
    });
    write_rows(path, std::iter::once(header).chain(body))
}
