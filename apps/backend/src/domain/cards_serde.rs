//! Serialization and deserialization for card ids (4-character code form)

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::CardId;

impl Serialize for CardId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CardId>()
            .map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}
