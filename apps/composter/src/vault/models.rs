//! Response shapes of the vault HTTP API.
//!
//! Fields are lenient on purpose: ids arrive as strings or numbers, and
//! `code`/`dependencies` keep their raw JSON so the normalizer can resolve
//! the legacy encodings in one place.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRef {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub dependencies: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ComponentRecord {
    pub fn category_name(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(|category| category.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ComponentsEnvelope {
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ComponentEnvelope {
    #[serde(default)]
    pub component: Option<ComponentRecord>,
}

/// Error body returned on non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(num)) => Some(num.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn component_record_accepts_numeric_ids_and_missing_fields() {
        let record: ComponentRecord = serde_json::from_value(json!({
            "id": 42,
            "title": "Button",
            "category": {"id": "c1", "name": "buttons"},
            "code": "export const Button = () => null;",
            "createdAt": "2025-01-02T03:04:05.000Z"
        }))
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.category_name(), Some("buttons"));
        assert!(record.dependencies.is_none());
    }

    #[test]
    fn envelopes_default_to_empty() {
        let components: ComponentsEnvelope = serde_json::from_value(json!({})).unwrap();
        assert!(components.components.is_empty());
        let component: ComponentEnvelope =
            serde_json::from_value(json!({"component": null})).unwrap();
        assert!(component.component.is_none());
    }
}
