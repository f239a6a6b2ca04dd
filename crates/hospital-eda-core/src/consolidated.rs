use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// File name of the consolidated table inside the processed directory.
pub const CLEANED_FILE_NAME: &str = "hospital_patient_cleaned.csv";

/// Placeholder written for missing severity and outcome values.
pub const UNKNOWN: &str = "Unknown";

/// Header row of the consolidated table, in file order.
pub const CONSOLIDATED_COLUMNS: &[&str] = &[
    "admission_id",
    "patient_id",
    "admission_date",
    "discharge_date",
    "department",
    "admission_type",
    "length_of_stay",
    "name",
    "age",
    "gender",
    "blood_group",
    "city",
    "diagnosis_id",
    "disease",
    "severity",
    "treatment_id",
    "doctor_name",
    "treatment_type",
    "treatment_cost",
    "outcome_id",
    "outcome",
    "follow_up_required",
];

/// One row of the joined admissions ⟕ patients ⟕ diagnosis ⟕ treatments ⟕
/// outcomes table.
///
/// Admission ids are always present. An empty admission or discharge date
/// leaves `length_of_stay` missing, and columns contributed by the joined
/// tables are `None` when the left-join found no match. Categorical columns
/// stay as text so that the cleaner can write placeholders such as
/// [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub admission_id: String,
    pub patient_id: String,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub admission_type: Option<String>,
    pub length_of_stay: Option<i64>,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub city: Option<String>,
    pub diagnosis_id: Option<String>,
    pub disease: Option<String>,
    pub severity: Option<String>,
    pub treatment_id: Option<String>,
    pub doctor_name: Option<String>,
    pub treatment_type: Option<String>,
    pub treatment_cost: Option<i64>,
    pub outcome_id: Option<String>,
    pub outcome: Option<String>,
    pub follow_up_required: Option<String>,
}

impl ConsolidatedRecord {
    /// Start a row from admission columns; joined columns begin empty.
    pub fn from_admission(
        admission_id: String,
        patient_id: String,
        admission_date: Option<NaiveDate>,
        discharge_date: Option<NaiveDate>,
        department: Option<String>,
        admission_type: Option<String>,
    ) -> Self {
        Self {
            admission_id,
            patient_id,
            admission_date,
            discharge_date,
            department,
            admission_type,
            length_of_stay: admission_date
                .zip(discharge_date)
                .map(|(admitted, discharged)| (discharged - admitted).num_days()),
            name: None,
            age: None,
            gender: None,
            blood_group: None,
            city: None,
            diagnosis_id: None,
            disease: None,
            severity: None,
            treatment_id: None,
            doctor_name: None,
            treatment_type: None,
            treatment_cost: None,
            outcome_id: None,
            outcome: None,
            follow_up_required: None,
        }
    }
}
