use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use hospital_eda_core::{ConsolidatedRecord, UNKNOWN};

/// Counters for each cleaning rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStats {
    pub duplicates_removed: u64,
    pub severity_filled: u64,
    pub outcome_filled: u64,
    pub negative_stay_removed: u64,
    pub missing_stay_removed: u64,
}

/// Apply the cleaning rules in order: drop exact duplicates, fill missing
/// severity/outcome with `Unknown`, drop rows whose stay is negative or
/// missing.
///
/// Other missing columns are left as they are.
pub fn apply_cleaning_rules(
    rows: Vec<ConsolidatedRecord>,
) -> (Vec<ConsolidatedRecord>, RuleStats) {
    let mut stats = RuleStats::default();

    let (mut rows, duplicates) = drop_duplicates(rows);
    stats.duplicates_removed = duplicates;

    let (severity, outcome) = fill_unknown(&mut rows);
    stats.severity_filled = severity;
    stats.outcome_filled = outcome;

    let (rows, negative, missing) = drop_invalid_stays(rows);
    stats.negative_stay_removed = negative;
    stats.missing_stay_removed = missing;

    (rows, stats)
}

/// Keep the first occurrence of every distinct row.
pub fn drop_duplicates(rows: Vec<ConsolidatedRecord>) -> (Vec<ConsolidatedRecord>, u64) {
    let before = rows.len();
    let mut seen = HashSet::with_capacity(rows.len());
    let kept: Vec<ConsolidatedRecord> = rows
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();
    let removed = (before - kept.len()) as u64;
    (kept, removed)
}

pub fn fill_unknown(rows: &mut [ConsolidatedRecord]) -> (u64, u64) {
    let mut severity_filled = 0;
    let mut outcome_filled = 0;
    for row in rows.iter_mut() {
        if row.severity.is_none() {
            row.severity = Some(UNKNOWN.to_string());
            severity_filled += 1;
        }
        if row.outcome.is_none() {
            row.outcome = Some(UNKNOWN.to_string());
            outcome_filled += 1;
        }
    }
    (severity_filled, outcome_filled)
}

/// Keep rows with a stay of zero days or more. Returns the kept rows and the
/// number removed for a negative stay and for a missing one.
pub fn drop_invalid_stays(rows: Vec<ConsolidatedRecord>) -> (Vec<ConsolidatedRecord>, u64, u64) {
    let mut negative = 0;
    let mut missing = 0;
    let kept = rows
        .into_iter()
        .filter(|row| match row.length_of_stay {
            Some(stay) if stay >= 0 => true,
            Some(_) => {
                negative += 1;
                false
            }
            None => {
                missing += 1;
                false
            }
        })
        .collect();
    (kept, negative, missing)
}
