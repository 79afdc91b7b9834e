//! Feature record types for patient risk prediction.
//!
//! A [`FeatureRecord`] is the single-row table handed to the predictor. Its
//! twelve columns are fixed; choice columns only accept values from their
//! allowed sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declares a closed set of form choices.
///
/// The first variant listed is the initial selection.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $column:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every allowed value, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Model column this choice fills.
            pub const COLUMN: &'static str = $column;

            /// Label as shown in the form and sent to the model.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str() == s)
                    .ok_or_else(|| UnknownChoice {
                        column: $column,
                        value: s.to_string(),
                    })
            }
        }

        impl Choice for $name {
            fn options() -> &'static [Self] {
                Self::ALL
            }

            fn label(&self) -> &'static str {
                self.as_str()
            }
        }
    };
}

/// A value outside a choice column's allowed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not an allowed value for {column}")]
pub struct UnknownChoice {
    pub column: &'static str,
    pub value: String,
}

/// Common surface of the closed choice sets, used by the form to cycle
/// selections.
pub trait Choice: Copy + PartialEq + 'static {
    fn options() -> &'static [Self];

    fn label(&self) -> &'static str;

    /// The option after (or before) this one, wrapping around.
    fn cycled(self, forward: bool) -> Self {
        let options = Self::options();
        let index = options.iter().position(|o| *o == self).unwrap_or(0);
        let len = options.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        options[next]
    }
}

choice_enum! {
    Gender, "Gender" {
        Male => "Male",
        Female => "Female",
    }
}

choice_enum! {
    BloodType, "Blood Type" {
        BNegative => "B-",
        APositive => "A+",
        ANegative => "A-",
        OPositive => "O+",
        AbPositive => "AB+",
        AbNegative => "AB-",
        BPositive => "B+",
        ONegative => "O-",
    }
}

choice_enum! {
    MedicalCondition, "Medical Condition" {
        Cancer => "Cancer",
        Obesity => "Obesity",
        Diabetes => "Diabetes",
        Asthma => "Asthma",
        Hypertension => "Hypertension",
        Arthritis => "Arthritis",
    }
}

choice_enum! {
    /// Attending doctors known to the model.
    Doctor, "Doctor" {
        MatthewSmith => "Matthew Smith",
        SamanthaDavies => "Samantha Davies",
        TiffanyMitchell => "Tiffany Mitchell",
        DeborahSutton => "Deborah Sutton",
        MaryBartlett => "Mary Bartlett",
        AlecMay => "Alec May",
    }
}

choice_enum! {
    InsuranceProvider, "Insurance Provider" {
        BlueCross => "Blue Cross",
        Medicare => "Medicare",
        Aetna => "Aetna",
        UnitedHealthcare => "UnitedHealthcare",
        Cigna => "Cigna",
    }
}

choice_enum! {
    AdmissionType, "Admission Type" {
        Urgent => "Urgent",
        Emergency => "Emergency",
        Elective => "Elective",
    }
}

choice_enum! {
    Medication, "Medication" {
        Paracetamol => "Paracetamol",
        Ibuprofen => "Ibuprofen",
        Aspirin => "Aspirin",
        Penicillin => "Penicillin",
        Lipitor => "Lipitor",
    }
}

/// Format of the discharge date column (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Model column names, in row order.
pub const COLUMN_NAMES: [&str; 12] = [
    "Age",
    "Gender",
    "Blood Type",
    "Medical Condition",
    "Doctor",
    "Hospital",
    "Insurance Provider",
    "Billing Amount",
    "Room Number",
    "Admission Type",
    "Discharge Date",
    "Medication",
];

/// One patient's form input as passed to the predictor.
///
/// Text columns are carried verbatim; the predictor decides whether an empty
/// or malformed value is acceptable. Columns missing from serialized input
/// take their initial form values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRecord {
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Blood Type")]
    pub blood_type: BloodType,
    #[serde(rename = "Medical Condition")]
    pub medical_condition: MedicalCondition,
    #[serde(rename = "Doctor")]
    pub doctor: Doctor,
    #[serde(rename = "Hospital")]
    pub hospital: String,
    #[serde(rename = "Insurance Provider")]
    pub insurance_provider: InsuranceProvider,
    #[serde(rename = "Billing Amount")]
    pub billing_amount: String,
    #[serde(rename = "Room Number")]
    pub room_number: String,
    #[serde(rename = "Admission Type")]
    pub admission_type: AdmissionType,
    #[serde(rename = "Discharge Date")]
    pub discharge_date: String,
    #[serde(rename = "Medication")]
    pub medication: Medication,
}

impl FeatureRecord {
    /// The record as ordered `(column, value)` pairs.
    #[must_use]
    pub fn row(&self) -> [(&'static str, &str); 12] {
        [
            (COLUMN_NAMES[0], self.age.as_str()),
            (COLUMN_NAMES[1], self.gender.as_str()),
            (COLUMN_NAMES[2], self.blood_type.as_str()),
            (COLUMN_NAMES[3], self.medical_condition.as_str()),
            (COLUMN_NAMES[4], self.doctor.as_str()),
            (COLUMN_NAMES[5], self.hospital.as_str()),
            (COLUMN_NAMES[6], self.insurance_provider.as_str()),
            (COLUMN_NAMES[7], self.billing_amount.as_str()),
            (COLUMN_NAMES[8], self.room_number.as_str()),
            (COLUMN_NAMES[9], self.admission_type.as_str()),
            (COLUMN_NAMES[10], self.discharge_date.as_str()),
            (COLUMN_NAMES[11], self.medication.as_str()),
        ]
    }

    /// Look up a column value by its model column name.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&str> {
        self.row()
            .into_iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}
