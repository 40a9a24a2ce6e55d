//! Domain DTOs for the pet records API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently from the mock-server crate; integration tests catch schema
//! drift. Identifiers are kept in a canonical string form because a route
//! hands us `"7"` while the backend hands us `7`, and both must address the
//! same record.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Backend-assigned identifier of a persisted pet.
///
/// Numeric ids are canonicalized, so `PetId::from("007") == PetId::from(7)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PetId(String);

impl PetId {
    /// Integers and whole-valued numerals (`"7.0"`, `"7e0"`) canonicalize to
    /// the integer; anything else is kept as trimmed text.
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<i64>() {
            return Self(n.to_string());
        }
        match raw.parse::<f64>().ok().and_then(whole_number) {
            Some(n) => Self(n.to_string()),
            None => Self(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Loose equality against an id of unknown origin (route, query, FFI).
    pub fn matches(&self, other: &str) -> bool {
        *self == PetId::new(other)
    }
}

fn whole_number(v: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or beyond it overflows i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (v.is_finite() && v.fract() == 0.0 && v >= -LIMIT && v < LIMIT).then_some(v as i64)
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PetId {
    fn from(raw: &str) -> Self {
        PetId::new(raw)
    }
}

impl From<String> for PetId {
    fn from(raw: String) -> Self {
        PetId::new(&raw)
    }
}

impl From<i64> for PetId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for PetId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for PetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for PetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PetIdVisitor;

        impl Visitor<'_> for PetIdVisitor {
            type Value = PetId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a pet id as a number or string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PetId, E> {
                Ok(PetId::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PetId, E> {
                Ok(PetId::from(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<PetId, E> {
                whole_number(v)
                    .map(PetId::from)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Float(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PetId, E> {
                Ok(PetId::new(v))
            }
        }

        deserializer.deserialize_any(PetIdVisitor)
    }
}

/// The pet categories the form offers. Labels are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetType {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Fish,
    Other,
}

impl PetType {
    pub const ALL: [PetType; 6] = [
        PetType::Dog,
        PetType::Cat,
        PetType::Bird,
        PetType::Rabbit,
        PetType::Fish,
        PetType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PetType::Dog => "Dog",
            PetType::Cat => "Cat",
            PetType::Bird => "Bird",
            PetType::Rabbit => "Rabbit",
            PetType::Fish => "Fish",
            PetType::Other => "Other",
        }
    }
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PetType::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A persisted pet as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    pub id: PetId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub pet_type: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalized request body for create and update. Never carries an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub age: u32,
    pub breed: String,
    pub owner_name: String,
    pub image_url: String,
}

/// Locate a record in a fetched list by an id of unknown origin.
pub fn find_pet<'a>(records: &'a [PetRecord], id: &str) -> Option<&'a PetRecord> {
    records.iter().find(|pet| pet.id.matches(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_compare_loosely() {
        assert_eq!(PetId::from("7"), PetId::from(7i64));
        assert_eq!(PetId::from(" 007 "), PetId::from(7u64));
        assert!(PetId::from(7i64).matches("7"));
        assert!(!PetId::from(7i64).matches("17"));
        assert_eq!(PetId::from("abc-1").as_str(), "abc-1");
    }

    #[test]
    fn whole_float_route_ids_match_numeric_ids() {
        assert_eq!(PetId::from("7.0"), PetId::from(7i64));
        assert!(PetId::from(7i64).matches(" 7.00 "));
        assert!(PetId::from(1000i64).matches("1e3"));
        assert_eq!(PetId::from("7.5").as_str(), "7.5");
        assert_eq!(PetId::from("NaN").as_str(), "NaN");
        assert_eq!(PetId::from("inf").as_str(), "inf");
    }

    #[test]
    fn id_deserializes_from_number_or_string() {
        let a: PetId = serde_json::from_str("3").unwrap();
        let b: PetId = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "3");

        let c: PetId = serde_json::from_str("\"pet-x\"").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"pet-x\"");
        assert!(serde_json::from_str::<PetId>("1.5").is_err());
    }

    #[test]
    fn pet_type_parse_is_case_sensitive() {
        assert_eq!("Rabbit".parse::<PetType>(), Ok(PetType::Rabbit));
        assert!("rabbit".parse::<PetType>().is_err());
        assert_eq!(PetType::Fish.to_string(), "Fish");
    }

    #[test]
    fn record_deserializes_backend_shape() {
        let json = r#"{"id":4,"name":"Max","type":"Dog","age":3,"breed":null,"ownerName":"Max Smith","imageUrl":"/uploads/max.png"}"#;
        let pet: PetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(pet.id, PetId::from(4i64));
        assert_eq!(pet.pet_type, "Dog");
        assert_eq!(pet.breed, None);
        assert_eq!(pet.owner_name.as_deref(), Some("Max Smith"));
    }

    #[test]
    fn record_tolerates_missing_text_fields() {
        let pet: PetRecord = serde_json::from_str(r#"{"id":"9","name":null}"#).unwrap();
        assert_eq!(pet.name, "");
        assert_eq!(pet.pet_type, "");
        assert_eq!(pet.age, 0);
        assert!(pet.image_url.is_none());
    }

    #[test]
    fn payload_serializes_camel_case_without_id() {
        let payload = PetPayload {
            name: "Rex".into(),
            pet_type: "Dog".into(),
            age: 3,
            breed: String::new(),
            owner_name: String::new(),
            image_url: "x".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "Dog");
        assert_eq!(json["ownerName"], "");
        assert_eq!(json["imageUrl"], "x");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn find_pet_uses_loose_ids() {
        let records: Vec<PetRecord> = serde_json::from_str(
            r#"[{"id":1,"name":"A","type":"Cat","age":1},{"id":7,"name":"B","type":"Dog","age":2}]"#,
        )
        .unwrap();
        assert_eq!(find_pet(&records, "7").map(|p| p.name.as_str()), Some("B"));
        assert!(find_pet(&records, "8").is_none());
    }
}
