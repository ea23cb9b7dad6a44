//! Serde adapters for the wire format.
//!
//! `simpleMapsId` values routinely exceed 2^53, which JavaScript clients cannot
//! hold in a `number`. They are written as decimal strings and read from either
//! a string or a JSON integer.

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serializer};
use std::fmt;

/// `i64` carried as a decimal string on the wire.
pub mod big_int {
    use super::*;

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BigIntVisitor)
    }

    /// For optional input fields: absent or `null` both yield `None`.
    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<BigInt>::deserialize(deserializer)?.map(|v| v.0))
    }

    /// For patch fields: pair with `#[serde(default)]` so an absent field stays `None`
    /// while an explicit `null` becomes `Some(None)`.
    pub fn deserialize_double_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Some(Option::<BigInt>::deserialize(deserializer)?.map(|v| v.0)))
    }
}

/// Distinguishes an explicit `null` from an absent field. Use with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

struct BigInt(i64);

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BigIntVisitor).map(BigInt)
    }
}

struct BigIntVisitor;

impl<'de> Visitor<'de> for BigIntVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E>(self, v: i64) -> Result<i64, E>
    where
        E: de::Error,
    {
        Ok(v)
    }

    fn visit_u64<E>(self, v: u64) -> Result<i64, E>
    where
        E: de::Error,
    {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E>(self, v: &str) -> Result<i64, E>
    where
        E: de::Error,
    {
        v.trim()
            .parse::<i64>()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(with = "big_int")]
        id: i64,
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "big_int::deserialize_double_option")]
        id: Option<Option<i64>>,
        #[serde(default, deserialize_with = "double_option")]
        name: Option<Option<String>>,
    }

    #[test]
    fn test_big_int_serializes_as_string() {
        let json = serde_json::to_value(Wrapper {
            id: 9_007_199_254_740_993,
        })
        .unwrap();
        assert_eq!(json["id"], "9007199254740993");
    }

    #[test]
    fn test_big_int_accepts_number_and_string() {
        let from_number: Wrapper = serde_json::from_str(r#"{"id": 9007199254740993}"#).unwrap();
        let from_string: Wrapper = serde_json::from_str(r#"{"id": "9007199254740993"}"#).unwrap();
        assert_eq!(from_number.id, 9_007_199_254_740_993);
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_big_int_rejects_garbage() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"id": "twelve"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"id": 1.5}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"id": 18446744073709551615}"#).is_err());
    }

    #[test]
    fn test_double_option_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.id, None);
        assert_eq!(absent.name, None);

        let nulled: Patch = serde_json::from_str(r#"{"id": null, "name": null}"#).unwrap();
        assert_eq!(nulled.id, Some(None));
        assert_eq!(nulled.name, Some(None));

        let set: Patch = serde_json::from_str(r#"{"id": "42", "name": "Oslo"}"#).unwrap();
        assert_eq!(set.id, Some(Some(42)));
        assert_eq!(set.name, Some(Some("Oslo".to_string())));
    }
}
