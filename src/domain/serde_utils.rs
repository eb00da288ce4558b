//! Serde helpers for the loosely typed fields the backend returns.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Deserializes a list of strings that the backend may store as a JSON list,
/// an empty object, or `null`.
pub mod string_list {
    use super::{Deserialize, Deserializer, Value};

    /// # Errors
    ///
    /// Returns an error if the value cannot be read as JSON.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Value::String(s) if !s.is_empty() => vec![s],
            _ => Vec::new(),
        })
    }
}

/// Deserializes an optional string that may arrive as an empty object.
pub mod loose_string {
    use super::{Deserialize, Deserializer, Value};

    /// # Errors
    ///
    /// Returns an error if the value cannot be read as JSON.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }
}

/// Deserializes an `f64` from a JSON number or a numeric string.
pub mod number_or_string {
    use super::{de, fmt, Deserializer, Visitor};

    /// # Errors
    ///
    /// Returns an error if the value is neither a number nor a numeric string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberVisitor;

        impl Visitor<'_> for NumberVisitor {
            type Value = f64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a numeric string")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(value)
            }

            #[allow(clippy::cast_precision_loss)]
            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(value as f64)
            }

            #[allow(clippy::cast_precision_loss)]
            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(value as f64)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.trim().parse::<f64>().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(with = "super::string_list", default)]
        list: Vec<String>,
        #[serde(with = "super::loose_string", default)]
        text: Option<String>,
        #[serde(with = "super::number_or_string")]
        size: f64,
    }

    #[test]
    fn test_list_accepts_array_and_empty_object() {
        let a: Sample = serde_json::from_str(r#"{"list": ["Obesidad"], "size": 1}"#).unwrap();
        assert_eq!(a.list, vec!["Obesidad".to_string()]);

        let b: Sample = serde_json::from_str(r#"{"list": {}, "size": 1}"#).unwrap();
        assert!(b.list.is_empty());

        let c: Sample = serde_json::from_str(r#"{"list": null, "size": 1}"#).unwrap();
        assert!(c.list.is_empty());
    }

    #[test]
    fn test_loose_string() {
        let a: Sample = serde_json::from_str(r#"{"text": {}, "size": 1}"#).unwrap();
        assert!(a.text.is_none());

        let b: Sample = serde_json::from_str(r#"{"text": "Gasas estériles", "size": 1}"#).unwrap();
        assert_eq!(b.text.as_deref(), Some("Gasas estériles"));
    }

    #[test]
    fn test_number_or_string() {
        let a: Sample = serde_json::from_str(r#"{"size": "2.50"}"#).unwrap();
        assert!((a.size - 2.5).abs() < f64::EPSILON);

        let b: Sample = serde_json::from_str(r#"{"size": 3}"#).unwrap();
        assert!((b.size - 3.0).abs() < f64::EPSILON);

        assert!(serde_json::from_str::<Sample>(r#"{"size": "wide"}"#).is_err());
    }
}
