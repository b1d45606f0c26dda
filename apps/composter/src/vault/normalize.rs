//! Uniform shape for stored component payloads.
//!
//! `code` is stored either as plain source or as a JSON object mapping file
//! paths to sources (older uploads store `{path: "src"}`, newer ones
//! `{path: {"code": "src"}}`). `dependencies` is absent, a JSON string, or an
//! object. Both ambiguities are resolved here once and never re-inspected.

use serde_json::{Map, Value};

use crate::vault::models::ComponentRecord;

pub const DEFAULT_FILE_PATH: &str = "Component.tsx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentCode {
    SingleFile(String),
    MultiFile(Vec<(String, String)>),
}

impl ComponentCode {
    /// Files in stored order; a single file sits under [`DEFAULT_FILE_PATH`].
    pub fn files(&self) -> Vec<(&str, &str)> {
        match self {
            ComponentCode::SingleFile(content) => vec![(DEFAULT_FILE_PATH, content.as_str())],
            ComponentCode::MultiFile(files) => files
                .iter()
                .map(|(path, content)| (path.as_str(), content.as_str()))
                .collect(),
        }
    }

    pub fn file_count(&self) -> usize {
        match self {
            ComponentCode::SingleFile(_) => 1,
            ComponentCode::MultiFile(files) => files.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedComponent {
    pub title: String,
    pub category: Option<String>,
    pub code: ComponentCode,
    /// Package name to version, in stored order.
    pub dependencies: Vec<(String, String)>,
    pub created_at: Option<String>,
}

pub fn normalize(record: &ComponentRecord) -> NormalizedComponent {
    NormalizedComponent {
        title: record.title.clone(),
        category: record.category_name().map(str::to_string),
        code: normalize_code(&record.code),
        dependencies: normalize_dependencies(record.dependencies.as_ref()),
        created_at: record.created_at.clone(),
    }
}

pub fn normalize_code(raw: &Value) -> ComponentCode {
    match raw {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) if !map.is_empty() => ComponentCode::MultiFile(files_from(&map)),
            _ => ComponentCode::SingleFile(text.clone()),
        },
        Value::Object(map) if !map.is_empty() => ComponentCode::MultiFile(files_from(map)),
        Value::Null => ComponentCode::SingleFile(String::new()),
        other => ComponentCode::SingleFile(other.to_string()),
    }
}

fn files_from(map: &Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .map(|(path, value)| (path.clone(), file_content(value)))
        .collect()
}

fn file_content(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(entry) => match entry.get("code") {
            Some(Value::String(code)) => code.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// Best effort: anything that is not a mapping yields an empty list.
pub fn normalize_dependencies(raw: Option<&Value>) -> Vec<(String, String)> {
    match raw {
        Some(Value::Object(map)) => dependency_pairs(map),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => dependency_pairs(&map),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn dependency_pairs(map: &Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .map(|(name, version)| {
            let version = match version {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (name.clone(), version)
        })
        .collect()
}
