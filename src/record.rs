//! Canonical record types shared across the pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Vehicle class code.
///
/// The fixed codes cover the two/three/four-wheeler classes the dashboard
/// reports on; anything else passes through as [`Category::Other`] carrying
/// the uppercased source value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    TwoWheeler,
    ThreeWheeler,
    FourWheeler,
    Other(String),
}

impl Category {
    pub fn code(&self) -> &str {
        match self {
            Category::TwoWheeler => "2W",
            Category::ThreeWheeler => "3W",
            Category::FourWheeler => "4W",
            Category::Other(code) => code,
        }
    }

    /// Inverse of [`Category::code`]. Unrecognized codes land in
    /// [`Category::Other`] unchanged; synonym matching lives in the
    /// normalizer, not here.
    pub fn from_code(code: &str) -> Self {
        match code {
            "2W" => Category::TwoWheeler,
            "3W" => Category::ThreeWheeler,
            "4W" => Category::FourWheeler,
            other => Category::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// CSV and JSON carry the display code, not the variant name.
impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Category::from_code(&code))
    }
}

/// A single normalized registration record. Immutable once built; every
/// derived structure is recomputed from scratch from slices of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub date: NaiveDate,
    pub category: Category,
    pub manufacturer: String,
    pub registrations: u64,
}

/// Which stage of the acquisition chain produced a batch of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Api,
    Scrape,
    Placeholder,
}
