use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

use hospital_eda_core::{DATE_FORMAT, RawTable};

use crate::errors::CleanError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPatient {
    pub patient_id: String,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub city: Option<String>,
}

/// Admission row as stored on disk; dates are parsed separately so failures
/// can name the column. An empty date is missing, not malformed.
#[derive(Debug, Clone, Deserialize)]
struct AdmissionRecord {
    admission_id: String,
    patient_id: String,
    admission_date: String,
    discharge_date: String,
    department: Option<String>,
    admission_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAdmission {
    pub admission_id: String,
    pub patient_id: String,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub admission_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDiagnosis {
    pub diagnosis_id: Option<String>,
    pub admission_id: String,
    pub disease: Option<String>,
    pub severity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTreatment {
    pub treatment_id: Option<String>,
    pub admission_id: String,
    pub doctor_name: Option<String>,
    pub treatment_type: Option<String>,
    pub treatment_cost: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawOutcome {
    pub outcome_id: Option<String>,
    pub admission_id: String,
    pub outcome: Option<String>,
    pub follow_up_required: Option<String>,
}

/// The five raw tables as loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub patients: Vec<RawPatient>,
    pub admissions: Vec<ParsedAdmission>,
    pub diagnoses: Vec<RawDiagnosis>,
    pub treatments: Vec<RawTreatment>,
    pub outcomes: Vec<RawOutcome>,
}

impl RawTables {
    pub fn row_count(&self, table: RawTable) -> usize {
        match table {
            RawTable::Patients => self.patients.len(),
            RawTable::Admissions => self.admissions.len(),
            RawTable::Diagnosis => self.diagnoses.len(),
            RawTable::Treatments => self.treatments.len(),
            RawTable::Outcomes => self.outcomes.len(),
        }
    }
}

/// Load and type-check all five raw tables from `raw_dir`.
pub fn load_raw_tables(raw_dir: &Path) -> Result<RawTables, CleanError> {
    let patients = rows_only(read_table(raw_dir, RawTable::Patients)?);
    let admissions = read_table::<AdmissionRecord>(raw_dir, RawTable::Admissions)?
        .into_iter()
        .map(|(line, record)| parse_admission(line, record))
        .collect::<Result<Vec<_>, _>>()?;
    info!(event = "dates_parsed", rows = admissions.len(), "admission dates parsed");
    let diagnoses = rows_only(read_table(raw_dir, RawTable::Diagnosis)?);
    let treatments = rows_only(read_table(raw_dir, RawTable::Treatments)?);
    let outcomes = rows_only(read_table(raw_dir, RawTable::Outcomes)?);

    Ok(RawTables {
        patients,
        admissions,
        diagnoses,
        treatments,
        outcomes,
    })
}

/// Read one table, checking its header for the required columns first.
/// Each row comes back with its 1-based line number.
fn read_table<T: DeserializeOwned>(
    raw_dir: &Path,
    table: RawTable,
) -> Result<Vec<(u64, T)>, CleanError> {
    let path = raw_dir.join(table.file_name());
    let file = table.file_name();
    let mut reader = csv::Reader::from_path(&path).map_err(|source| CleanError::Read {
        path: path.clone(),
        source,
    })?;
    let headers = reader
        .headers()
        .map_err(|source| CleanError::Read {
            path: path.clone(),
            source,
        })?
        .clone();

    for column in table.columns() {
        if !headers.iter().any(|header| header == *column) {
            return Err(CleanError::MissingColumn {
                file,
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| malformed(&file, &err))?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        let row = record
            .deserialize::<T>(Some(&headers))
            .map_err(|err| CleanError::Malformed {
                file: file.clone(),
                line,
                message: err.to_string(),
            })?;
        rows.push((line, row));
    }

    info!(
        event = "dataset_loaded",
        table = table.name(),
        rows = rows.len(),
        path = %path.display(),
        "raw dataset loaded"
    );
    Ok(rows)
}

fn rows_only<T>(rows: Vec<(u64, T)>) -> Vec<T> {
    rows.into_iter().map(|(_, row)| row).collect()
}

fn malformed(file: &str, err: &csv::Error) -> CleanError {
    CleanError::Malformed {
        file: file.to_string(),
        line: err.position().map(|pos| pos.line()).unwrap_or(0),
        message: err.to_string(),
    }
}

fn parse_admission(line: u64, record: AdmissionRecord) -> Result<ParsedAdmission, CleanError> {
    let parse = |column: &str, value: &str| {
        if value.trim().is_empty() {
            return Ok(None);
        }
        parse_date(value).map(Some).ok_or_else(|| CleanError::InvalidDate {
            file: RawTable::Admissions.file_name(),
            line,
            column: column.to_string(),
            value: value.to_string(),
        })
    };
    Ok(ParsedAdmission {
        admission_date: parse("admission_date", &record.admission_date)?,
        discharge_date: parse("discharge_date", &record.discharge_date)?,
        admission_id: record.admission_id,
        patient_id: record.patient_id,
        department: record.department,
        admission_type: record.admission_type,
    })
}

/// Parse a calendar date, accepting a trailing time-of-day which is dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|timestamp| timestamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_with_optional_time() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 14);
        assert_eq!(parse_date("2026-02-14"), expected);
        assert_eq!(parse_date(" 2026-02-14 "), expected);
        assert_eq!(parse_date("2026-02-14 08:30:00"), expected);
        assert_eq!(parse_date("2026-02-14T08:30:00"), expected);
        assert_eq!(parse_date("14/02/2026"), None);
        assert_eq!(parse_date("2026-02-30"), None);
        assert_eq!(parse_date(""), None);
    }

    fn admission(admission_date: &str, discharge_date: &str) -> AdmissionRecord {
        AdmissionRecord {
            admission_id: "A00001".to_string(),
            patient_id: "P00001".to_string(),
            admission_date: admission_date.to_string(),
            discharge_date: discharge_date.to_string(),
            department: None,
            admission_type: None,
        }
    }

    #[test]
    fn blank_dates_are_missing_not_malformed() {
        let parsed = parse_admission(2, admission("2026-01-05", " ")).expect("blank date");
        assert_eq!(parsed.admission_date, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(parsed.discharge_date, None);

        let err = parse_admission(3, admission("05/01/2026", "")).expect_err("bad date");
        assert!(matches!(err, CleanError::InvalidDate { line: 3, ref column, .. } if column == "admission_date"));
    }
}
