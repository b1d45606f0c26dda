//! The four vault tools and the single place where failures become text.

use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::mcp::registry::{ToolCall, ToolCallError};
use crate::vault::{
    CategoryRef, ComponentRecord, NormalizedComponent, VaultClient, VaultError, normalize,
};

/// Text result of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    pub fn into_value(self) -> Value {
        json!({
            "content": [{"type": "text", "text": self.text}],
            "isError": self.is_error,
        })
    }
}

pub struct VaultTools {
    client: VaultClient,
}

impl VaultTools {
    pub fn new(client: VaultClient) -> Self {
        Self { client }
    }

    /// Validate and run one invocation. Only an unknown tool name is
    /// reported as `Err`; every other failure is rendered as text.
    pub async fn invoke(&self, name: &str, arguments: &Value) -> Result<ToolOutput, String> {
        let call = match ToolCall::parse(name, arguments) {
            Ok(call) => call,
            Err(ToolCallError::UnknownTool(name)) => return Err(format!("unknown tool '{name}'")),
            Err(ToolCallError::MissingArgument(param)) => {
                return Ok(ToolOutput::error(format!(
                    "Missing required argument '{param}'."
                )));
            }
        };
        Ok(self.run(call).await)
    }

    pub async fn run(&self, call: ToolCall) -> ToolOutput {
        tracing::debug!(target: "composter::mcp", tool = call.name(), "tool invoked");
        let outcome = match &call {
            ToolCall::SearchComponents { query } => self.search_components(query).await,
            ToolCall::ListCategories => self.list_categories().await,
            ToolCall::ListComponents { category } => self.list_components(category).await,
            ToolCall::ReadComponent { category, title } => {
                self.read_component(category, title).await
            }
        };
        match outcome {
            Ok(text) => ToolOutput::text(text),
            Err(err) => {
                if err.needs_login() {
                    tracing::error!(target: "composter::mcp", tool = call.name(), error = %err, "login required");
                } else {
                    tracing::warn!(target: "composter::mcp", tool = call.name(), error = %err, "tool failed");
                }
                let prefix = match call {
                    ToolCall::SearchComponents { .. } => "Error searching",
                    _ => "Error",
                };
                ToolOutput::error(format!("{prefix}: {err}"))
            }
        }
    }

    async fn search_components(&self, query: &str) -> Result<String, VaultError> {
        let components = self.client.search_components(query).await?;
        Ok(render_search(&components))
    }

    async fn list_categories(&self) -> Result<String, VaultError> {
        let categories = self.client.list_categories().await?;
        Ok(render_categories(&categories))
    }

    async fn list_components(&self, category: &str) -> Result<String, VaultError> {
        let components = match self.client.list_components(category).await {
            Err(VaultError::NotFound) => Vec::new(),
            other => other?,
        };
        Ok(render_component_list(category, &components))
    }

    async fn read_component(&self, category: &str, title: &str) -> Result<String, VaultError> {
        match self.client.find_component(category, title).await? {
            Some(record) => Ok(render_component(&normalize(&record), category)),
            None => Ok(format!(
                "Component \"{title}\" not found in category \"{category}\"."
            )),
        }
    }
}

pub fn render_search(components: &[ComponentRecord]) -> String {
    if components.is_empty() {
        return "No components found matching that query.".to_string();
    }
    let lines: Vec<String> = components
        .iter()
        .map(|component| {
            format!(
                "- **{}** (Category: {}) [ID: {}]",
                component.title,
                component.category_name().unwrap_or("unknown"),
                component.id.as_deref().unwrap_or("unknown"),
            )
        })
        .collect();
    format!(
        "Found {} component(s):\n\n{}",
        components.len(),
        lines.join("\n")
    )
}

pub fn render_categories(categories: &[CategoryRef]) -> String {
    if categories.is_empty() {
        return "No categories found. Create one with 'composter mkcat <name>'.".to_string();
    }
    let lines: Vec<String> = categories
        .iter()
        .map(|category| format!("- {}", category.name))
        .collect();
    format!("Your categories:\n\n{}", lines.join("\n"))
}

pub fn render_component_list(category: &str, components: &[ComponentRecord]) -> String {
    if components.is_empty() {
        return format!("No components found in category \"{category}\".");
    }
    let lines: Vec<String> = components
        .iter()
        .map(|component| {
            format!(
                "- **{}** (created: {})",
                component.title,
                display_date(component.created_at.as_deref())
            )
        })
        .collect();
    format!("Components in \"{category}\":\n\n{}", lines.join("\n"))
}

pub fn render_component(component: &NormalizedComponent, requested_category: &str) -> String {
    let category = component.category.as_deref().unwrap_or(requested_category);
    let mut out = format!(
        "# {}\n\n**Category:** {}\n**Created:** {}\n",
        component.title,
        category,
        display_date(component.created_at.as_deref())
    );

    if !component.dependencies.is_empty() {
        out.push_str("\n**Dependencies:**\n");
        for (name, version) in &component.dependencies {
            out.push_str(&format!("- {name}: {version}\n"));
        }
    }

    out.push_str("\n## Source Code\n");
    for (path, content) in component.code.files() {
        out.push_str(&format!(
            "\n### {path}\n```{}\n{content}\n```\n",
            fence_language(path)
        ));
    }
    out
}

fn display_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return "unknown".to_string();
    };
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|parsed| parsed.format(format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_else(|| raw.to_string())
}

fn fence_language(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("tsx") => "tsx",
        Some("ts") => "ts",
        Some("jsx") => "jsx",
        Some("js") | Some("mjs") | Some("cjs") => "js",
        Some("css") => "css",
        Some("scss") => "scss",
        Some("json") => "json",
        Some("html") => "html",
        Some("md") | Some("mdx") => "md",
        Some("vue") => "vue",
        Some("svelte") => "svelte",
        _ => "tsx",
    }
}
