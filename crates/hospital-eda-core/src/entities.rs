use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{
    AdmissionType, BloodGroup, City, Department, FollowUp, Gender, OutcomeKind, Severity,
    TreatmentType,
};

/// Format a sequential key such as `P00042`.
pub fn format_id(prefix: char, index: usize) -> String {
    format!("{prefix}{index:05}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub city: City,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub admission_id: String,
    pub patient_id: String,
    pub admission_date: NaiveDate,
    pub discharge_date: NaiveDate,
    pub department: Department,
    pub admission_type: AdmissionType,
}

impl Admission {
    /// Whole days between admission and discharge.
    pub fn length_of_stay(&self) -> i64 {
        (self.discharge_date - self.admission_date).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub diagnosis_id: String,
    pub admission_id: String,
    pub disease: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub treatment_id: String,
    pub admission_id: String,
    pub doctor_name: String,
    pub treatment_type: TreatmentType,
    pub treatment_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub outcome_id: String,
    pub admission_id: String,
    pub outcome: OutcomeKind,
    pub follow_up_required: FollowUp,
}

/// The five raw tables exchanged between the generator and the cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawTable {
    Patients,
    Admissions,
    Diagnosis,
    Treatments,
    Outcomes,
}

impl RawTable {
    /// Generation order: parents before children.
    pub const ALL: [RawTable; 5] = [
        RawTable::Patients,
        RawTable::Admissions,
        RawTable::Diagnosis,
        RawTable::Treatments,
        RawTable::Outcomes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RawTable::Patients => "patients",
            RawTable::Admissions => "admissions",
            RawTable::Diagnosis => "diagnosis",
            RawTable::Treatments => "treatments",
            RawTable::Outcomes => "outcomes",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }

    /// Header row, in file order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            RawTable::Patients => &["patient_id", "name", "age", "gender", "blood_group", "city"],
            RawTable::Admissions => &[
                "admission_id",
                "patient_id",
                "admission_date",
                "discharge_date",
                "department",
                "admission_type",
            ],
            RawTable::Diagnosis => &["diagnosis_id", "admission_id", "disease", "severity"],
            RawTable::Treatments => &[
                "treatment_id",
                "admission_id",
                "doctor_name",
                "treatment_type",
                "treatment_cost",
            ],
            RawTable::Outcomes => &[
                "outcome_id",
                "admission_id",
                "outcome",
                "follow_up_required",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_zero_padded() {
        assert_eq!(format_id('P', 1), "P00001");
        assert_eq!(format_id('A', 12345), "A12345");
    }

    #[test]
    fn length_of_stay_counts_whole_days() {
        let admission = Admission {
            admission_id: format_id('A', 1),
            patient_id: format_id('P', 1),
            admission_date: NaiveDate::from_ymd_opt(2025, 12, 28).unwrap(),
            discharge_date: NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
            department: Department::Neurology,
            admission_type: AdmissionType::Planned,
        };
        assert_eq!(admission.length_of_stay(), 12);
    }
}
