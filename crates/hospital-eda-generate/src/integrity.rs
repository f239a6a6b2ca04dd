use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::GeneratedDataset;

/// A child row whose foreign key has no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanKey {
    pub table: String,
    pub row_id: String,
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub checked: u64,
    pub orphans: Vec<OrphanKey>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty()
    }

    fn check<'a>(
        &mut self,
        parents: &HashSet<&str>,
        table: &str,
        column: &str,
        rows: impl Iterator<Item = (&'a str, &'a str)>,
    ) {
        for (row_id, key) in rows {
            self.checked += 1;
            if !parents.contains(key) {
                self.orphans.push(OrphanKey {
                    table: table.to_string(),
                    row_id: row_id.to_string(),
                    column: column.to_string(),
                    value: key.to_string(),
                });
            }
        }
    }
}

/// Check every foreign key of the dataset against its parent table.
pub fn verify_integrity(dataset: &GeneratedDataset) -> IntegrityReport {
    let patient_ids: HashSet<&str> = dataset
        .patients
        .iter()
        .map(|patient| patient.patient_id.as_str())
        .collect();
    let admission_ids: HashSet<&str> = dataset
        .admissions
        .iter()
        .map(|admission| admission.admission_id.as_str())
        .collect();

    let mut report = IntegrityReport::default();
    report.check(
        &patient_ids,
        "admissions",
        "patient_id",
        dataset
            .admissions
            .iter()
            .map(|row| (row.admission_id.as_str(), row.patient_id.as_str())),
    );
    report.check(
        &admission_ids,
        "diagnosis",
        "admission_id",
        dataset
            .diagnoses
            .iter()
            .map(|row| (row.diagnosis_id.as_str(), row.admission_id.as_str())),
    );
    report.check(
        &admission_ids,
        "treatments",
        "admission_id",
        dataset
            .treatments
            .iter()
            .map(|row| (row.treatment_id.as_str(), row.admission_id.as_str())),
    );
    report.check(
        &admission_ids,
        "outcomes",
        "admission_id",
        dataset
            .outcomes
            .iter()
            .map(|row| (row.outcome_id.as_str(), row.admission_id.as_str())),
    );
    report
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use hospital_eda_core::{
        Admission, AdmissionType, BloodGroup, City, Department, Diagnosis, FollowUp, Gender,
        Outcome, OutcomeKind, Patient, Severity, Treatment, TreatmentType,
    };

    use super::*;
    use crate::errors::GenerationError;

    fn dataset() -> GeneratedDataset {
        let admitted = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        GeneratedDataset {
            patients: vec![Patient {
                patient_id: "P00001".to_string(),
                name: "Mira Shah".to_string(),
                age: 41,
                gender: Gender::Female,
                blood_group: BloodGroup::APositive,
                city: City::Guwahati,
            }],
            admissions: vec![
                Admission {
                    admission_id: "A00001".to_string(),
                    patient_id: "P00001".to_string(),
                    admission_date: admitted,
                    discharge_date: admitted + chrono::Days::new(3),
                    department: Department::Cardiology,
                    admission_type: AdmissionType::Planned,
                },
                Admission {
                    admission_id: "A00002".to_string(),
                    patient_id: "P00009".to_string(),
                    admission_date: admitted,
                    discharge_date: admitted + chrono::Days::new(1),
                    department: Department::Cardiology,
                    admission_type: AdmissionType::Emergency,
                },
            ],
            diagnoses: vec![Diagnosis {
                diagnosis_id: "D00001".to_string(),
                admission_id: "A00001".to_string(),
                disease: "Hypertension".to_string(),
                severity: Severity::Mild,
            }],
            treatments: vec![Treatment {
                treatment_id: "T00001".to_string(),
                admission_id: "A00042".to_string(),
                doctor_name: "Dr. Kapoor".to_string(),
                treatment_type: TreatmentType::Medication,
                treatment_cost: 8000,
            }],
            outcomes: vec![Outcome {
                outcome_id: "O00001".to_string(),
                admission_id: "A00002".to_string(),
                outcome: OutcomeKind::Recovered,
                follow_up_required: FollowUp::No,
            }],
        }
    }

    #[test]
    fn orphan_foreign_keys_are_reported() {
        let report = verify_integrity(&dataset());

        assert!(!report.is_clean());
        assert_eq!(report.checked, 5);
        assert_eq!(
            report.orphans,
            vec![
                OrphanKey {
                    table: "admissions".to_string(),
                    row_id: "A00002".to_string(),
                    column: "patient_id".to_string(),
                    value: "P00009".to_string(),
                },
                OrphanKey {
                    table: "treatments".to_string(),
                    row_id: "T00001".to_string(),
                    column: "admission_id".to_string(),
                    value: "A00042".to_string(),
                },
            ]
        );

        let err = GenerationError::Integrity(report);
        assert_eq!(err.to_string(), "generated dataset has 2 orphan foreign key(s)");
    }

    #[test]
    fn consistent_dataset_is_clean() {
        let mut dataset = dataset();
        dataset.admissions[1].patient_id = "P00001".to_string();
        dataset.treatments[0].admission_id = "A00001".to_string();

        let report = verify_integrity(&dataset);
        assert!(report.is_clean());
        assert_eq!(report.checked, 5);
    }
}
