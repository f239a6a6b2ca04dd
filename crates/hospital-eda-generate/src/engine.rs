use std::path::PathBuf;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};

use hospital_eda_core::{
    Admission, AdmissionType, BloodGroup, City, Department, Diagnosis, FollowUp, Gender, Outcome,
    OutcomeKind, Patient, RawTable, Severity, Treatment, TreatmentType, format_id,
    write_json_atomic,
};

use crate::errors::GenerationError;
use crate::integrity::verify_integrity;
use crate::model::{GenerateOptions, GeneratedDataset, GenerationReport, TableReport};
use crate::output::csv::write_table_csv;
use crate::sampling::{
    ADMISSION_WINDOW_DAYS, MAX_AGE, MAX_STAY_DAYS, MAX_TREATMENT_COST, MIN_AGE, MIN_STAY_DAYS,
    MIN_TREATMENT_COST, add_days, date_in_window, person_name, pick, pick_weighted,
};

pub const REPORT_FILE_NAME: &str = "generation_report.json";

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub out_dir: PathBuf,
    pub report: GenerationReport,
}

/// Entry point for generating the raw hospital tables.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let out_dir = self.options.out_dir.clone();
        std::fs::create_dir_all(&out_dir)?;

        info!(
            event = "generation_started",
            patients = self.options.num_patients,
            seed = self.options.seed,
            reference_date = %self.options.reference_date,
            out_dir = %out_dir.display(),
            "data generation started"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(self.options.seed);
        let dataset = generate_dataset(&self.options, &mut rng)?;

        let integrity = verify_integrity(&dataset);
        if !integrity.is_clean() {
            warn!(
                event = "integrity_failed",
                orphans = integrity.orphans.len(),
                "generated dataset has orphan foreign keys"
            );
            return Err(GenerationError::Integrity(integrity));
        }
        info!(
            event = "integrity_checked",
            foreign_keys = integrity.checked,
            "referential integrity verified"
        );

        let mut report = GenerationReport::new(&self.options);
        for table in RawTable::ALL {
            let table_report = match table {
                RawTable::Patients => write_table(&out_dir, table, &dataset.patients)?,
                RawTable::Admissions => write_table(&out_dir, table, &dataset.admissions)?,
                RawTable::Diagnosis => write_table(&out_dir, table, &dataset.diagnoses)?,
                RawTable::Treatments => write_table(&out_dir, table, &dataset.treatments)?,
                RawTable::Outcomes => write_table(&out_dir, table, &dataset.outcomes)?,
            };
            report.record_table(table_report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        write_json_atomic(&out_dir.join(REPORT_FILE_NAME), &report)?;

        info!(
            event = "generation_completed",
            tables = report.tables.len(),
            bytes_written = report.bytes_written,
            duration_ms = report.duration_ms,
            raw_dir = %out_dir.display(),
            "all hospital datasets generated"
        );

        Ok(GenerationResult { out_dir, report })
    }
}

fn write_table<T: Serialize>(
    out_dir: &std::path::Path,
    table: RawTable,
    rows: &[T],
) -> Result<TableReport, GenerationError> {
    let file = table.file_name();
    let path = out_dir.join(&file);
    let written = write_table_csv(&path, table.columns(), rows)?;
    info!(
        event = "table_written",
        table = table.name(),
        rows = rows.len(),
        bytes = written.bytes_written,
        path = %path.display(),
        "dataset written"
    );
    Ok(TableReport {
        table: table.name().to_string(),
        file,
        rows: rows.len() as u64,
        bytes_written: written.bytes_written,
        sha256: written.sha256,
    })
}

/// Build the five tables in parent-first order from `rng`.
///
/// Tables are generated one after another, each row drawing its fields in
/// column order, so the same seed always yields the same dataset.
pub fn generate_dataset<R: Rng + ?Sized>(
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<GeneratedDataset, GenerationError> {
    if options.num_patients == 0 {
        return Err(GenerationError::InvalidConfig(
            "patient count must be at least 1".to_string(),
        ));
    }
    for department in Department::ALL {
        options.catalog.diseases_for(*department)?;
    }

    let patients: Vec<Patient> = (1..=options.num_patients)
        .map(|index| Patient {
            patient_id: format_id('P', index),
            name: person_name(rng),
            age: rng.random_range(MIN_AGE..=MAX_AGE),
            gender: *pick(Gender::ALL, rng),
            blood_group: *pick(BloodGroup::ALL, rng),
            city: *pick(City::ALL, rng),
        })
        .collect();
    info!(event = "table_generated", table = "patients", rows = patients.len());

    let mut admissions = Vec::with_capacity(patients.len());
    for (index, patient) in patients.iter().enumerate() {
        let admission_date =
            date_in_window(options.reference_date, ADMISSION_WINDOW_DAYS, rng)?;
        let stay_days = rng.random_range(MIN_STAY_DAYS..=MAX_STAY_DAYS);
        admissions.push(Admission {
            admission_id: format_id('A', index + 1),
            patient_id: patient.patient_id.clone(),
            admission_date,
            discharge_date: add_days(admission_date, stay_days)?,
            department: *pick(Department::ALL, rng),
            admission_type: *pick(AdmissionType::ALL, rng),
        });
    }
    info!(event = "table_generated", table = "admissions", rows = admissions.len());

    let mut diagnoses = Vec::with_capacity(admissions.len());
    for (index, admission) in admissions.iter().enumerate() {
        let candidates = options.catalog.diseases_for(admission.department)?;
        diagnoses.push(Diagnosis {
            diagnosis_id: format_id('D', index + 1),
            admission_id: admission.admission_id.clone(),
            disease: pick(candidates, rng).clone(),
            severity: *pick(Severity::ALL, rng),
        });
    }
    info!(event = "table_generated", table = "diagnosis", rows = diagnoses.len());

    let treatments: Vec<Treatment> = admissions
        .iter()
        .enumerate()
        .map(|(index, admission)| Treatment {
            treatment_id: format_id('T', index + 1),
            admission_id: admission.admission_id.clone(),
            doctor_name: person_name(rng),
            treatment_type: *pick(TreatmentType::ALL, rng),
            treatment_cost: rng.random_range(MIN_TREATMENT_COST..=MAX_TREATMENT_COST),
        })
        .collect();
    info!(event = "table_generated", table = "treatments", rows = treatments.len());

    let mut outcomes = Vec::with_capacity(diagnoses.len());
    for (index, diagnosis) in diagnoses.iter().enumerate() {
        let outcome = *pick_weighted(OutcomeKind::ALL, OutcomeKind::WEIGHTS, rng)?;
        // The follow-up coin is only flipped for recovered patients.
        let follow_up_required = if outcome == OutcomeKind::Recovered && rng.random::<f64>() > 0.5
        {
            FollowUp::Yes
        } else {
            FollowUp::No
        };
        outcomes.push(Outcome {
            outcome_id: format_id('O', index + 1),
            admission_id: diagnosis.admission_id.clone(),
            outcome,
            follow_up_required,
        });
    }
    info!(event = "table_generated", table = "outcomes", rows = outcomes.len());

    Ok(GeneratedDataset {
        patients,
        admissions,
        diagnoses,
        treatments,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use hospital_eda_core::DiseaseCatalog;

    use super::*;

    fn options(num_patients: usize) -> GenerateOptions {
        GenerateOptions {
            num_patients,
            reference_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            ..GenerateOptions::default()
        }
    }

    fn dataset(num_patients: usize, seed: u64) -> GeneratedDataset {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_dataset(&options(num_patients), &mut rng).unwrap()
    }

    #[test]
    fn tables_are_one_to_one_with_patients() {
        let data = dataset(100, 42);
        for table in RawTable::ALL {
            assert_eq!(data.row_count(table), 100, "{}", table.name());
        }
        assert_eq!(data.patients[0].patient_id, "P00001");
        assert_eq!(data.admissions[99].admission_id, "A00100");
        assert_eq!(data.outcomes[99].outcome_id, "O00100");
    }

    #[test]
    fn same_seed_same_dataset() {
        assert_eq!(dataset(50, 7), dataset(50, 7));
        assert_ne!(dataset(50, 7), dataset(50, 8));
    }

    #[test]
    fn field_ranges_hold() {
        let data = dataset(500, 42);
        let earliest = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap();
        let latest = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        for patient in &data.patients {
            assert!((MIN_AGE..=MAX_AGE).contains(&patient.age));
        }
        for admission in &data.admissions {
            let stay = admission.length_of_stay();
            assert!((1..=20).contains(&stay), "stay {stay}");
            assert!(admission.admission_date >= earliest);
            assert!(admission.admission_date <= latest);
            assert!(admission.discharge_date >= admission.admission_date);
        }
        for treatment in &data.treatments {
            assert!((MIN_TREATMENT_COST..=MAX_TREATMENT_COST).contains(&treatment.treatment_cost));
        }
    }

    #[test]
    fn diseases_follow_department_catalog() {
        let data = dataset(300, 42);
        let catalog = DiseaseCatalog::default();
        for (admission, diagnosis) in data.admissions.iter().zip(&data.diagnoses) {
            assert_eq!(admission.admission_id, diagnosis.admission_id);
            let allowed = catalog.diseases_for(admission.department).unwrap();
            assert!(allowed.contains(&diagnosis.disease));
        }
    }

    #[test]
    fn follow_up_only_after_recovery() {
        let data = dataset(1000, 42);
        let mut recovered_follow_ups = 0;
        for outcome in &data.outcomes {
            if outcome.follow_up_required == FollowUp::Yes {
                assert_eq!(outcome.outcome, OutcomeKind::Recovered);
                recovered_follow_ups += 1;
            }
        }
        assert!(recovered_follow_ups > 0);
    }

    #[test]
    fn generated_dataset_has_no_orphans() {
        let report = verify_integrity(&dataset(200, 5));
        assert!(report.is_clean());
        assert_eq!(report.checked, 800);
    }

    #[test]
    fn zero_patients_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = generate_dataset(&options(0), &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidConfig(_)));
    }

    #[test]
    fn incomplete_catalog_is_fatal() {
        let mut entries = BTreeMap::new();
        entries.insert(Department::Cardiology, vec!["Hypertension".to_string()]);
        let options = GenerateOptions {
            catalog: DiseaseCatalog::new(entries),
            ..options(10)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = generate_dataset(&options, &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::Core(_)));
    }
}
