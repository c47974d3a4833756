pub mod announcement;
pub mod auth;
pub mod community;
pub mod diagnosis;
pub mod diary;
pub mod plant;

use serde::{Deserialize, Deserializer};

/// Image URL lists are stored as JSON columns; depending on the endpoint they
/// arrive as an array, a JSON-encoded string, or null.
pub(crate) fn image_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(url) => Some(url),
                _ => None,
            })
            .collect(),
        Some(serde_json::Value::String(encoded)) => {
            serde_json::from_str(&encoded).unwrap_or_default()
        }
        _ => Vec::new(),
    })
}
