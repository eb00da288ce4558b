//! Wound entity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PatientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WoundId(pub u64);

impl WoundId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for WoundId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cause of a wound.
///
/// Serialized as the catalogue string the backend stores. Strings outside the
/// catalogue are kept in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WoundOrigin {
    PressureInjury,
    Surgical,
    Burn,
    Traumatic,
    VenousUlcer,
    ArterialUlcer,
    DiabeticFoot,
    Other(String),
}

impl WoundOrigin {
    /// Origins offered when recording a wound.
    pub const ALL: [Self; 7] = [
        Self::PressureInjury,
        Self::Surgical,
        Self::Burn,
        Self::Traumatic,
        Self::VenousUlcer,
        Self::ArterialUlcer,
        Self::DiabeticFoot,
    ];

    /// Returns the value stored by the backend.
    #[must_use]
    pub fn wire_value(&self) -> &str {
        match self {
            Self::PressureInjury => "Lesión por presión",
            Self::Surgical => "Herida quirúrgica",
            Self::Burn => "Quemadura",
            Self::Traumatic => "Herida traumática",
            Self::VenousUlcer => "Úlcera venosa",
            Self::ArterialUlcer => "Úlcera arterial",
            Self::DiabeticFoot => "Pie diabético",
            Self::Other(value) => value,
        }
    }

    /// Returns the label shown in the interface.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::PressureInjury => "Pressure injury",
            Self::Surgical => "Surgical wound",
            Self::Burn => "Burn",
            Self::Traumatic => "Traumatic wound",
            Self::VenousUlcer => "Venous ulcer",
            Self::ArterialUlcer => "Arterial ulcer",
            Self::DiabeticFoot => "Diabetic foot",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for WoundOrigin {
    fn from(value: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|origin| origin.wire_value() == value)
            .unwrap_or(Self::Other(value))
    }
}

impl From<WoundOrigin> for String {
    fn from(value: WoundOrigin) -> Self {
        match value {
            WoundOrigin::Other(value) => value,
            known => known.wire_value().to_string(),
        }
    }
}

impl std::fmt::Display for WoundOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Wound recorded for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wound {
    id: WoundId,
    patient: PatientId,
    #[serde(rename = "wound_location")]
    location: String,
    #[serde(rename = "wound_origin")]
    origin: WoundOrigin,
    #[serde(rename = "wound_origin_date")]
    origin_date: NaiveDate,
}

impl Wound {
    #[must_use]
    pub fn new(
        id: impl Into<WoundId>,
        patient: impl Into<PatientId>,
        location: impl Into<String>,
        origin: WoundOrigin,
        origin_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            patient: patient.into(),
            location: location.into(),
            origin,
            origin_date,
        }
    }

    #[must_use]
    pub const fn id(&self) -> WoundId {
        self.id
    }

    #[must_use]
    pub const fn patient(&self) -> PatientId {
        self.patient
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub const fn origin(&self) -> &WoundOrigin {
        &self.origin
    }

    #[must_use]
    pub const fn origin_date(&self) -> NaiveDate {
        self.origin_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wound() {
        let json = r#"{"id": 9, "patient": 4, "wound_location": "Tobillo derecho",
                       "wound_origin": "Pie diabético", "wound_origin_date": "2024-05-02"}"#;
        let wound: Wound = serde_json::from_str(json).unwrap();

        assert_eq!(wound.id(), WoundId(9));
        assert_eq!(wound.patient(), PatientId(4));
        assert_eq!(wound.origin(), &WoundOrigin::DiabeticFoot);
        assert_eq!(wound.origin().label(), "Diabetic foot");
    }

    #[test]
    fn test_unknown_origin_is_preserved() {
        let origin = WoundOrigin::from("no wound cause".to_string());
        assert_eq!(origin, WoundOrigin::Other("no wound cause".to_string()));
        assert_eq!(String::from(origin), "no wound cause");
    }

    #[test]
    fn test_origin_serializes_to_catalogue_value() {
        let json = serde_json::to_string(&WoundOrigin::VenousUlcer).unwrap();
        assert_eq!(json, "\"Úlcera venosa\"");
    }
}
