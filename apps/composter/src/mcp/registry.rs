use serde::Serialize;
use serde_json::{Map, Value, json};

pub const SEARCH_COMPONENTS: &str = "search_components";
pub const LIST_CATEGORIES: &str = "list_categories";
pub const LIST_COMPONENTS: &str = "list_components";
pub const READ_COMPONENT: &str = "read_component";

struct ParamSpec {
    name: &'static str,
    description: &'static str,
}

struct ToolSpec {
    name: &'static str,
    description: &'static str,
    params: &'static [ParamSpec],
}

const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: SEARCH_COMPONENTS,
        description: "Search for React components in your Composter vault by title or category name. Returns matching components with IDs and categories.",
        params: &[ParamSpec {
            name: "query",
            description: "Search term for component title or category name",
        }],
    },
    ToolSpec {
        name: LIST_CATEGORIES,
        description: "List all categories in your Composter vault.",
        params: &[],
    },
    ToolSpec {
        name: LIST_COMPONENTS,
        description: "List all components in a specific category.",
        params: &[ParamSpec {
            name: "category",
            description: "The category name to list components from",
        }],
    },
    ToolSpec {
        name: READ_COMPONENT,
        description: "Read the full source code of a React component from your vault. Returns the code, category, dependencies, and creation date.",
        params: &[
            ParamSpec {
                name: "category",
                description: "The category name the component belongs to",
            },
            ParamSpec {
                name: "title",
                description: "The title/name of the component to read",
            },
        ],
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub fn descriptors() -> Vec<ToolDescriptor> {
    TOOLS
        .iter()
        .map(|tool| {
            let mut properties = Map::new();
            for param in tool.params {
                properties.insert(
                    param.name.to_string(),
                    json!({"type": "string", "description": param.description}),
                );
            }
            let required: Vec<&str> = tool.params.iter().map(|param| param.name).collect();
            ToolDescriptor {
                name: tool.name,
                description: tool.description,
                input_schema: json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }),
            }
        })
        .collect()
}

/// A validated invocation of one of the fixed vault tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    SearchComponents { query: String },
    ListCategories,
    ListComponents { category: String },
    ReadComponent { category: String, title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallError {
    UnknownTool(String),
    MissingArgument(&'static str),
}

impl ToolCall {
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, ToolCallError> {
        match name {
            SEARCH_COMPONENTS => Ok(ToolCall::SearchComponents {
                query: required(arguments, "query")?,
            }),
            LIST_CATEGORIES => Ok(ToolCall::ListCategories),
            LIST_COMPONENTS => Ok(ToolCall::ListComponents {
                category: required(arguments, "category")?,
            }),
            READ_COMPONENT => Ok(ToolCall::ReadComponent {
                category: required(arguments, "category")?,
                title: required(arguments, "title")?,
            }),
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::SearchComponents { .. } => SEARCH_COMPONENTS,
            ToolCall::ListCategories => LIST_CATEGORIES,
            ToolCall::ListComponents { .. } => LIST_COMPONENTS,
            ToolCall::ReadComponent { .. } => READ_COMPONENT,
        }
    }
}

fn required(arguments: &Value, name: &'static str) -> Result<String, ToolCallError> {
    arguments
        .get(name)
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ToolCallError::MissingArgument(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_declare_required_string_params() {
        let tools = descriptors();
        let names: Vec<_> = tools.iter().map(|tool| tool.name).collect();
        assert_eq!(
            names,
            vec![SEARCH_COMPONENTS, LIST_CATEGORIES, LIST_COMPONENTS, READ_COMPONENT]
        );
        let read = &tools[3].input_schema;
        assert_eq!(read["required"], json!(["category", "title"]));
        assert_eq!(read["properties"]["title"]["type"], json!("string"));
        assert_eq!(tools[1].input_schema["required"], json!([]));
    }

    #[test]
    fn parse_validates_arguments() {
        assert_eq!(
            ToolCall::parse(SEARCH_COMPONENTS, &json!({"query": " hero "})),
            Ok(ToolCall::SearchComponents {
                query: "hero".into()
            })
        );
        assert_eq!(
            ToolCall::parse(READ_COMPONENT, &json!({"category": "cards"})),
            Err(ToolCallError::MissingArgument("title"))
        );
        assert_eq!(
            ToolCall::parse(LIST_COMPONENTS, &json!({"category": "  "})),
            Err(ToolCallError::MissingArgument("category"))
        );
        assert_eq!(
            ToolCall::parse(LIST_COMPONENTS, &json!({"category": 3})),
            Err(ToolCallError::MissingArgument("category"))
        );
        assert_eq!(
            ToolCall::parse(LIST_CATEGORIES, &Value::Null),
            Ok(ToolCall::ListCategories)
        );
        assert_eq!(
            ToolCall::parse("delete_component", &json!({})),
            Err(ToolCallError::UnknownTool("delete_component".into()))
        );
    }
}
