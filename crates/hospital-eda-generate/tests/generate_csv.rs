use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use hospital_eda_core::{Admission, Department, Diagnosis, Outcome, Patient, RawTable, Treatment};
use hospital_eda_generate::{GenerateOptions, GenerationEngine, GenerationReport};

fn options(out_dir: PathBuf) -> GenerateOptions {
    GenerateOptions {
        out_dir,
        num_patients: 100,
        seed: 42,
        reference_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        ..GenerateOptions::default()
    }
}

fn read_rows<T: serde::de::DeserializeOwned>(dir: &Path, table: RawTable) -> Vec<T> {
    let mut reader = csv::Reader::from_path(dir.join(table.file_name())).expect("open table");
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .expect("deserialize table")
}

#[test]
fn generate_is_byte_identical_for_same_seed() {
    let engine_a = GenerationEngine::new(options(temp_out_dir("run_a")));
    let engine_b = GenerationEngine::new(options(temp_out_dir("run_b")));
    let result_a = engine_a.run().expect("run generation A");
    let result_b = engine_b.run().expect("run generation B");

    for table in RawTable::ALL {
        let a = fs::read(result_a.out_dir.join(table.file_name())).expect("read A");
        let b = fs::read(result_b.out_dir.join(table.file_name())).expect("read B");
        assert_eq!(a, b, "{} should be deterministic", table.file_name());
    }

    let digests_a: Vec<&str> = result_a.report.tables.iter().map(|t| t.sha256.as_str()).collect();
    let digests_b: Vec<&str> = result_b.report.tables.iter().map(|t| t.sha256.as_str()).collect();
    assert_eq!(digests_a, digests_b);
}

#[test]
fn regenerating_in_place_overwrites_tables() {
    let out_dir = temp_out_dir("rerun");
    let engine = GenerationEngine::new(options(out_dir.clone()));
    let first = engine.run().expect("first run");
    let second = engine.run().expect("second run");

    let patients = fs::read_to_string(out_dir.join("patients.csv")).expect("read patients");
    assert_eq!(patients.lines().count(), 101);
    assert_eq!(first.report.tables[0].sha256, second.report.tables[0].sha256);
}

#[test]
fn generate_writes_expected_row_counts_and_report() {
    let out_dir = temp_out_dir("rows");
    let result = GenerationEngine::new(options(out_dir.clone()))
        .run()
        .expect("run generation");

    let report: GenerationReport = serde_json::from_str(
        &fs::read_to_string(out_dir.join("generation_report.json")).expect("read report"),
    )
    .expect("parse report");
    assert_eq!(report.tables.len(), 5);
    assert!(report.tables.iter().all(|table| table.rows == 100));
    assert_eq!(report.bytes_written, result.report.bytes_written);

    let header = fs::read_to_string(out_dir.join("admissions.csv"))
        .expect("read admissions")
        .lines()
        .next()
        .map(str::to_string)
        .expect("header");
    assert_eq!(header, RawTable::Admissions.columns().join(","));
}

#[test]
fn written_tables_keep_referential_integrity() {
    let out_dir = temp_out_dir("integrity");
    GenerationEngine::new(options(out_dir.clone()))
        .run()
        .expect("run generation");

    let patients: Vec<Patient> = read_rows(&out_dir, RawTable::Patients);
    let admissions: Vec<Admission> = read_rows(&out_dir, RawTable::Admissions);
    let diagnoses: Vec<Diagnosis> = read_rows(&out_dir, RawTable::Diagnosis);
    let treatments: Vec<Treatment> = read_rows(&out_dir, RawTable::Treatments);
    let outcomes: Vec<Outcome> = read_rows(&out_dir, RawTable::Outcomes);

    assert_eq!(patients.len(), 100);
    assert_eq!(admissions.len(), 100);

    let patient_ids: HashSet<&str> = patients.iter().map(|p| p.patient_id.as_str()).collect();
    let admission_ids: HashSet<&str> =
        admissions.iter().map(|a| a.admission_id.as_str()).collect();

    for admission in &admissions {
        assert!(patient_ids.contains(admission.patient_id.as_str()));
        assert!(admission.discharge_date >= admission.admission_date);
        assert!(Department::ALL.contains(&admission.department));
    }
    assert!(diagnoses.iter().all(|d| admission_ids.contains(d.admission_id.as_str())));
    assert!(treatments.iter().all(|t| admission_ids.contains(t.admission_id.as_str())));
    assert!(outcomes.iter().all(|o| admission_ids.contains(o.admission_id.as_str())));
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "hospital_eda_generate_{label}_{}",
        uuid::Uuid::new_v4()
    ));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}
