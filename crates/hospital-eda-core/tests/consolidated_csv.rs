use chrono::NaiveDate;
use hospital_eda_core::{CONSOLIDATED_COLUMNS, ConsolidatedRecord, RawTable};

fn record() -> ConsolidatedRecord {
    let mut record = ConsolidatedRecord::from_admission(
        "A00001".to_string(),
        "P00001".to_string(),
        NaiveDate::from_ymd_opt(2026, 3, 1),
        NaiveDate::from_ymd_opt(2026, 3, 4),
        Some("Cardiology".to_string()),
        Some("Emergency".to_string()),
    );
    record.age = Some(54);
    record.severity = Some("Mild".to_string());
    record
}

#[test]
fn serialized_header_matches_column_contract() {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(record()).expect("serialize record");
    let bytes = writer.into_inner().expect("flush writer");
    let text = String::from_utf8(bytes).expect("utf8");

    let header = text.lines().next().expect("header line");
    assert_eq!(header, CONSOLIDATED_COLUMNS.join(","));
}

#[test]
fn missing_values_serialize_as_empty_fields() {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(record()).expect("serialize record");
    let text = String::from_utf8(writer.into_inner().expect("flush")).expect("utf8");

    assert_eq!(
        text.trim_end(),
        "A00001,P00001,2026-03-01,2026-03-04,Cardiology,Emergency,3,,54,,,,,,Mild,,,,,,,"
    );
}

#[test]
fn consolidated_record_reads_back_empty_fields_as_none() {
    let data = format!(
        "{}\nA00002,P00002,2026-01-10,2026-01-12,Neurology,Planned,2,,,,,,,,,,,,,,,\n",
        CONSOLIDATED_COLUMNS.join(",")
    );
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let rows: Vec<ConsolidatedRecord> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("deserialize rows");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].length_of_stay, Some(2));
    assert_eq!(rows[0].severity, None);
    assert_eq!(rows[0].treatment_cost, None);
}

#[test]
fn raw_tables_are_ordered_parent_first() {
    let names: Vec<&str> = RawTable::ALL.iter().map(|table| table.name()).collect();
    assert_eq!(
        names,
        ["patients", "admissions", "diagnosis", "treatments", "outcomes"]
    );
    assert_eq!(RawTable::Admissions.columns()[1], "patient_id");
}

#[test]
fn empty_date_leaves_stay_missing() {
    let data = format!(
        "{}\nA00003,P00003,2026-01-10,,Neurology,Planned,,,,,,,,,,,,,,,,\n",
        CONSOLIDATED_COLUMNS.join(",")
    );
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let rows: Vec<ConsolidatedRecord> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("deserialize rows");

    assert_eq!(rows[0].discharge_date, None);
    assert_eq!(rows[0].length_of_stay, None);

    let rebuilt = ConsolidatedRecord::from_admission(
        "A00003".to_string(),
        "P00003".to_string(),
        NaiveDate::from_ymd_opt(2026, 1, 10),
        None,
        None,
        None,
    );
    assert_eq!(rebuilt.length_of_stay, None);
}
