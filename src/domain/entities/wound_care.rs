//! Wound-care observation entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{PatientId, WoundId};
use crate::domain::serde_utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WoundCareId(pub u64);

impl From<u64> for WoundCareId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WoundCareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wound size in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WoundDimensions {
    #[serde(deserialize_with = "serde_utils::number_or_string::deserialize")]
    pub width: f64,
    #[serde(deserialize_with = "serde_utils::number_or_string::deserialize")]
    pub height: f64,
    #[serde(deserialize_with = "serde_utils::number_or_string::deserialize")]
    pub depth: f64,
}

impl WoundDimensions {
    /// Width times height.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Share of the wound bed covered by each tissue type, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TissueComposition {
    #[serde(
        rename = "granulation_tissue",
        deserialize_with = "serde_utils::number_or_string::deserialize"
    )]
    pub granulation: f64,
    #[serde(deserialize_with = "serde_utils::number_or_string::deserialize")]
    pub slough: f64,
    #[serde(
        rename = "necrotic_tissue",
        deserialize_with = "serde_utils::number_or_string::deserialize"
    )]
    pub necrotic: f64,
}

impl TissueComposition {
    /// Upper bound for the sum of the three percentages.
    pub const MAX_TOTAL: f64 = 100.0;

    #[must_use]
    pub fn total(&self) -> f64 {
        self.granulation + self.slough + self.necrotic
    }

    #[must_use]
    pub fn is_within_limit(&self) -> bool {
        self.total() <= Self::MAX_TOTAL
    }
}

/// A single observation of a wound's state and the treatment applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WoundCare {
    pub id: WoundCareId,
    pub wound: WoundId,
    #[serde(default)]
    pub patient: Option<PatientId>,
    #[serde(default)]
    pub care_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub dimensions: WoundDimensions,
    #[serde(flatten)]
    pub tissue: TissueComposition,
    #[serde(default)]
    pub borders: String,
    #[serde(default)]
    pub surrounding_skin: String,
    #[serde(default)]
    pub edema: String,
    #[serde(default)]
    pub exudate_amount: String,
    #[serde(default)]
    pub exudate_type: String,
    #[serde(default)]
    pub debridement: bool,
    #[serde(default, deserialize_with = "serde_utils::loose_string::deserialize")]
    pub primary_dressing: Option<String>,
    #[serde(default, deserialize_with = "serde_utils::loose_string::deserialize")]
    pub secondary_dressing: Option<String>,
    #[serde(default)]
    pub next_care_date: Option<NaiveDate>,
    #[serde(default)]
    pub care_notes: String,
    #[serde(default)]
    pub wound_pain: String,
    #[serde(default)]
    pub skin_protection: String,
    #[serde(default, rename = "wound_cleaning_solution")]
    pub cleaning_solution: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WoundCare {
    /// Date the observation refers to: the care date, else the creation day.
    #[must_use]
    pub fn observed_on(&self) -> Option<NaiveDate> {
        self.care_date
            .or_else(|| self.created_at.map(|at| at.date_naive()))
    }
}

/// Orders entries oldest first; entries without a date go last, ties by id.
pub fn sort_chronologically(entries: &mut [WoundCare]) {
    entries.sort_by(|a, b| match (a.observed_on(), b.observed_on()) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
}
