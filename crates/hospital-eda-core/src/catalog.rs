use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declares a closed vocabulary whose labels are the exact strings written to
/// the flat files.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every value in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(value: &str) -> Result<Self> {
                match value {
                    $($label => Ok($name::$variant),)+
                    other => Err(Error::InvalidValue(format!(
                        "'{}' is not a valid {}",
                        other,
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

vocabulary! {
    /// Patient gender.
    Gender { Male => "Male", Female => "Female" }
}

vocabulary! {
    /// ABO/Rh blood group.
    BloodGroup {
        APositive => "A+",
        ANegative => "A-",
        BPositive => "B+",
        BNegative => "B-",
        OPositive => "O+",
        ONegative => "O-",
        AbPositive => "AB+",
        AbNegative => "AB-",
    }
}

vocabulary! {
    /// City of residence.
    City {
        Guwahati => "Guwahati",
        Silchar => "Silchar",
        Kolkata => "Kolkata",
        Delhi => "Delhi",
        Mumbai => "Mumbai",
        Bangalore => "Bangalore",
    }
}

vocabulary! {
    /// Admitting department.
    Department {
        Cardiology => "Cardiology",
        Neurology => "Neurology",
        Orthopedics => "Orthopedics",
        Gynecology => "Gynecology",
        GeneralMedicine => "General Medicine",
    }
}

vocabulary! {
    AdmissionType { Emergency => "Emergency", Planned => "Planned" }
}

vocabulary! {
    Severity { Mild => "Mild", Moderate => "Moderate", Critical => "Critical" }
}

vocabulary! {
    TreatmentType { Medication => "Medication", Surgery => "Surgery", IcuCare => "ICU Care" }
}

vocabulary! {
    /// Discharge outcome of an admission.
    OutcomeKind { Recovered => "Recovered", Referred => "Referred", Deceased => "Deceased" }
}

vocabulary! {
    FollowUp { Yes => "Yes", No => "No" }
}

impl OutcomeKind {
    /// Sampling weights aligned with [`OutcomeKind::ALL`].
    pub const WEIGHTS: &'static [f64] = &[0.75, 0.15, 0.10];
}

/// Department → candidate diseases lookup used by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseCatalog {
    entries: BTreeMap<Department, Vec<String>>,
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        let defaults: [(Department, [&str; 2]); 5] = [
            (Department::Cardiology, ["Heart Attack", "Hypertension"]),
            (Department::Neurology, ["Stroke", "Migraine"]),
            (Department::Orthopedics, ["Fracture", "Arthritis"]),
            (Department::Gynecology, ["Ovarian Cyst", "Pregnancy Complication"]),
            (Department::GeneralMedicine, ["Fever", "Diabetes"]),
        ];
        let entries = defaults
            .into_iter()
            .map(|(department, diseases)| {
                (
                    department,
                    diseases.iter().map(|name| name.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }
}

impl DiseaseCatalog {
    pub fn new(entries: BTreeMap<Department, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Start from the defaults and replace the lists named in `overrides`,
    /// keyed by department label (e.g. `"General Medicine"`).
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut catalog = Self::default();
        for (label, diseases) in overrides {
            let department = label.parse::<Department>().map_err(|_| {
                Error::InvalidConfig(format!("unknown department '{label}' in disease catalog"))
            })?;
            catalog.entries.insert(department, diseases.clone());
        }
        Ok(catalog)
    }

    /// Candidate diseases for `department`. A department with no (or an empty)
    /// entry is a configuration error.
    pub fn diseases_for(&self, department: Department) -> Result<&[String]> {
        match self.entries.get(&department) {
            Some(diseases) if !diseases.is_empty() => Ok(diseases),
            Some(_) => Err(Error::InvalidConfig(format!(
                "disease catalog entry for '{department}' is empty"
            ))),
            None => Err(Error::InvalidConfig(format!(
                "department '{department}' missing from disease catalog"
            ))),
        }
    }
}
