use serde::{Deserialize, Deserializer};

/// Deserialize an optional form field, trimming surrounding whitespace and
/// treating blank strings the same as an absent value.
pub fn deserialize_optional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
