//! Field-level draws. Every helper takes the run's RNG explicitly so the order
//! of calls fully determines the output.

use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::name::en::Name;
use rand::Rng;

use crate::errors::GenerationError;

/// Width of the admission date window, in days before the reference date.
pub const ADMISSION_WINDOW_DAYS: u64 = 365;
pub const MIN_STAY_DAYS: u64 = 1;
pub const MAX_STAY_DAYS: u64 = 20;
pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 90;
pub const MIN_TREATMENT_COST: u32 = 5_000;
pub const MAX_TREATMENT_COST: u32 = 400_000;

/// Uniform choice from a non-empty slice.
pub fn pick<'a, T, R: Rng + ?Sized>(values: &'a [T], rng: &mut R) -> &'a T {
    &values[rng.random_range(0..values.len())]
}

/// Categorical draw with explicit weights aligned to `values`.
pub fn pick_weighted<'a, T, R: Rng + ?Sized>(
    values: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> Result<&'a T, GenerationError> {
    if values.is_empty() || values.len() != weights.len() {
        return Err(GenerationError::InvalidConfig(format!(
            "weighted draw needs one weight per value ({} values, {} weights)",
            values.len(),
            weights.len()
        )));
    }
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || weights.iter().any(|weight| *weight < 0.0) {
        return Err(GenerationError::InvalidConfig(
            "weights must be non-negative with a positive sum".to_string(),
        ));
    }

    let target = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (value, weight) in values.iter().zip(weights) {
        cumulative += weight;
        if target < cumulative {
            return Ok(value);
        }
    }
    // Rounding can leave `target` just above the last cumulative bound.
    Ok(&values[values.len() - 1])
}

/// Date drawn uniformly from `[reference - window_days, reference]`.
pub fn date_in_window<R: Rng + ?Sized>(
    reference: NaiveDate,
    window_days: u64,
    rng: &mut R,
) -> Result<NaiveDate, GenerationError> {
    let offset = rng.random_range(0..=window_days);
    reference.checked_sub_days(Days::new(offset)).ok_or_else(|| {
        GenerationError::InvalidConfig(format!(
            "reference date {reference} leaves no room for a {window_days}-day window"
        ))
    })
}

pub fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, GenerationError> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| {
        GenerationError::InvalidConfig(format!("{date} + {days} days is out of range"))
    })
}

pub fn person_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    Name().fake_with_rng(rng)
}
