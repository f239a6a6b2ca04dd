use std::collections::HashMap;

use hospital_eda_core::ConsolidatedRecord;

use crate::load::{ParsedAdmission, RawTables};

/// Left-join `right` onto `left`.
///
/// Every left row is kept. A left row with several matches is repeated once
/// per match, in the order the matches appear in `right`; a row without a
/// match passes through untouched.
pub fn left_join<R>(
    left: Vec<ConsolidatedRecord>,
    right: &[R],
    left_key: impl Fn(&ConsolidatedRecord) -> &str,
    right_key: impl Fn(&R) -> &str,
    apply: impl Fn(&mut ConsolidatedRecord, &R),
) -> Vec<ConsolidatedRecord> {
    let mut index: HashMap<&str, Vec<&R>> = HashMap::new();
    for row in right {
        index.entry(right_key(row)).or_default().push(row);
    }

    let mut joined = Vec::with_capacity(left.len());
    for row in left {
        match index.get(left_key(&row)) {
            Some(matches) => {
                for matched in matches {
                    let mut combined = row.clone();
                    apply(&mut combined, matched);
                    joined.push(combined);
                }
            }
            None => joined.push(row),
        }
    }
    joined
}

/// Admission rows with the derived `length_of_stay`, before any join.
pub fn admission_rows(admissions: &[ParsedAdmission]) -> Vec<ConsolidatedRecord> {
    admissions
        .iter()
        .map(|admission| {
            ConsolidatedRecord::from_admission(
                admission.admission_id.clone(),
                admission.patient_id.clone(),
                admission.admission_date,
                admission.discharge_date,
                admission.department.clone(),
                admission.admission_type.clone(),
            )
        })
        .collect()
}

/// admissions ⟕ patients ⟕ diagnosis ⟕ treatments ⟕ outcomes.
pub fn consolidate(tables: &RawTables) -> Vec<ConsolidatedRecord> {
    let rows = admission_rows(&tables.admissions);

    let rows = left_join(
        rows,
        &tables.patients,
        |row| row.patient_id.as_str(),
        |patient| patient.patient_id.as_str(),
        |row, patient| {
            row.name = patient.name.clone();
            row.age = patient.age;
            row.gender = patient.gender.clone();
            row.blood_group = patient.blood_group.clone();
            row.city = patient.city.clone();
        },
    );

    let rows = left_join(
        rows,
        &tables.diagnoses,
        |row| row.admission_id.as_str(),
        |diagnosis| diagnosis.admission_id.as_str(),
        |row, diagnosis| {
            row.diagnosis_id = diagnosis.diagnosis_id.clone();
            row.disease = diagnosis.disease.clone();
            row.severity = diagnosis.severity.clone();
        },
    );

    let rows = left_join(
        rows,
        &tables.treatments,
        |row| row.admission_id.as_str(),
        |treatment| treatment.admission_id.as_str(),
        |row, treatment| {
            row.treatment_id = treatment.treatment_id.clone();
            row.doctor_name = treatment.doctor_name.clone();
            row.treatment_type = treatment.treatment_type.clone();
            row.treatment_cost = treatment.treatment_cost;
        },
    );

    left_join(
        rows,
        &tables.outcomes,
        |row| row.admission_id.as_str(),
        |outcome| outcome.admission_id.as_str(),
        |row, outcome| {
            row.outcome_id = outcome.outcome_id.clone();
            row.outcome = outcome.outcome.clone();
            row.follow_up_required = outcome.follow_up_required.clone();
        },
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::load::{RawDiagnosis, RawPatient, RawTreatment};

    use super::*;

    fn admission(id: &str, patient: &str, stay: u64) -> ParsedAdmission {
        let admitted = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        ParsedAdmission {
            admission_id: id.to_string(),
            patient_id: patient.to_string(),
            admission_date: Some(admitted),
            discharge_date: Some(admitted + chrono::Days::new(stay)),
            department: Some("Neurology".to_string()),
            admission_type: Some("Planned".to_string()),
        }
    }

    fn diagnosis(id: &str, admission: &str, severity: Option<&str>) -> RawDiagnosis {
        RawDiagnosis {
            diagnosis_id: Some(id.to_string()),
            admission_id: admission.to_string(),
            disease: Some("Stroke".to_string()),
            severity: severity.map(str::to_string),
        }
    }

    #[test]
    fn unmatched_children_leave_fields_empty() {
        let tables = RawTables {
            admissions: vec![admission("A00001", "P00001", 4)],
            ..RawTables::default()
        };
        let rows = consolidate(&tables);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].length_of_stay, Some(4));
        assert_eq!(rows[0].name, None);
        assert_eq!(rows[0].severity, None);
        assert_eq!(rows[0].treatment_cost, None);
        assert_eq!(rows[0].outcome, None);
    }

    #[test]
    fn joins_follow_foreign_keys() {
        let tables = RawTables {
            patients: vec![RawPatient {
                patient_id: "P00002".to_string(),
                name: Some("Asha Rao".to_string()),
                age: Some(61),
                gender: Some("Female".to_string()),
                blood_group: Some("O+".to_string()),
                city: Some("Delhi".to_string()),
            }],
            admissions: vec![admission("A00001", "P00002", 2)],
            diagnoses: vec![diagnosis("D00001", "A00001", Some("Critical"))],
            treatments: vec![RawTreatment {
                treatment_id: Some("T00001".to_string()),
                admission_id: "A00001".to_string(),
                doctor_name: Some("Dr. Sen".to_string()),
                treatment_type: Some("Surgery".to_string()),
                treatment_cost: Some(125_000),
            }],
            ..RawTables::default()
        };
        let rows = consolidate(&tables);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.age, Some(61));
        assert_eq!(row.city.as_deref(), Some("Delhi"));
        assert_eq!(row.severity.as_deref(), Some("Critical"));
        assert_eq!(row.treatment_cost, Some(125_000));
        assert_eq!(row.outcome_id, None);
    }

    #[test]
    fn duplicate_child_keys_fan_out_rows() {
        let tables = RawTables {
            admissions: vec![
                admission("A00001", "P00001", 1),
                admission("A00002", "P00002", 3),
            ],
            diagnoses: vec![
                diagnosis("D00001", "A00001", Some("Mild")),
                diagnosis("D00002", "A00001", Some("Moderate")),
            ],
            ..RawTables::default()
        };
        let rows = consolidate(&tables);

        let ids: Vec<(&str, Option<&str>)> = rows
            .iter()
            .map(|row| (row.admission_id.as_str(), row.diagnosis_id.as_deref()))
            .collect();
        assert_eq!(
            ids,
            [
                ("A00001", Some("D00001")),
                ("A00001", Some("D00002")),
                ("A00002", None),
            ]
        );
    }
}
