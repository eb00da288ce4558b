//! Patient entity.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::serde_utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub u64);

impl PatientId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for PatientId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    id: PatientId,
    first_name: String,
    last_name: String,
    rut: String,
    birth_date: NaiveDate,
    #[serde(default, deserialize_with = "serde_utils::string_list::deserialize")]
    chronic_diseases: Vec<String>,
    #[serde(default, deserialize_with = "serde_utils::string_list::deserialize")]
    predispositions: Vec<String>,
}

impl Patient {
    #[must_use]
    pub fn new(
        id: impl Into<PatientId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        rut: impl Into<String>,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            rut: rut.into(),
            birth_date,
            chronic_diseases: Vec::new(),
            predispositions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_conditions(mut self, chronic_diseases: Vec<String>, predispositions: Vec<String>) -> Self {
        self.chronic_diseases = chronic_diseases;
        self.predispositions = predispositions;
        self
    }

    #[must_use]
    pub const fn id(&self) -> PatientId {
        self.id
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Returns the RUT as stored by the backend.
    #[must_use]
    pub fn rut(&self) -> &str {
        &self.rut
    }

    #[must_use]
    pub const fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    #[must_use]
    pub fn chronic_diseases(&self) -> &[String] {
        &self.chronic_diseases
    }

    #[must_use]
    pub fn predispositions(&self) -> &[String] {
        &self.predispositions
    }

    /// Returns the age in completed years on `today`, or `None` if the birth
    /// date lies after it.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        years_between(self.birth_date, today)
    }
}

/// Whole years elapsed from `from` to `to`.
#[must_use]
pub fn years_between(from: NaiveDate, to: NaiveDate) -> Option<u32> {
    if to < from {
        return None;
    }
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
