//! Serde helpers for externally facing identifiers.
//!
//! 64-bit keys do not survive a round trip through JSON numbers in every
//! client, so they are written as decimal strings. Both strings and numbers
//! are accepted when reading.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_id<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            RawId::Number(n) => Ok(n),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid identifier: {}", s))),
        }
    }
}

/// `i64` serialized as a decimal string
pub mod id {
    use super::*;

    pub fn serialize<S>(id: &i64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer)?.into_id()
    }
}

/// `Option<i64>` serialized as a decimal string or null
pub mod option_id {
    use super::*;

    pub fn serialize<S>(id: &Option<i64>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.collect_str(id),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawId>::deserialize(deserializer)?
            .map(RawId::into_id)
            .transpose()
    }
}

/// `Vec<i64>` serialized as a list of decimal strings
pub mod id_list {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(ids: &[i64], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = s.serialize_seq(Some(ids.len()))?;
        for id in ids {
            seq.serialize_element(&id.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<RawId>::deserialize(deserializer)?
            .into_iter()
            .map(RawId::into_id)
            .collect()
    }
}
