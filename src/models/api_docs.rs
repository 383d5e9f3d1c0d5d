use serde::Deserialize;
use std::collections::BTreeMap;

/// Everything the documentation needs to know about one curl invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub cookies: BTreeMap<String, String>,
    pub body: Option<String>,
}

/// Result of interpreting a curl command: the request plus any flags that
/// were skipped along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub request: RequestDescriptor,
    pub warnings: Vec<String>,
}

/// Caller supplied labels for the generated block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocMeta {
    pub title: Option<String>,
    pub name: Option<String>,
    pub group: Option<String>,
    pub version: Option<String>,
}

impl DocMeta {
    pub fn title(&self) -> &str {
        non_empty(&self.title).unwrap_or("title")
    }

    pub fn name(&self) -> &str {
        non_empty(&self.name).unwrap_or("apiName")
    }

    pub fn group(&self) -> &str {
        non_empty(&self.group).unwrap_or("group")
    }

    pub fn version(&self) -> &str {
        non_empty(&self.version).unwrap_or("0.0.1")
    }
}

/// One full conversion request, as submitted by the form or the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub command: String,
    #[serde(default)]
    pub response: Option<String>,
}

impl DocRequest {
    pub fn meta(&self) -> DocMeta {
        DocMeta {
            title: self.title.clone(),
            name: self.name.clone(),
            group: self.group.clone(),
            version: self.version.clone(),
        }
    }

    pub fn response(&self) -> Option<&str> {
        non_empty(&self.response)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDoc {
    pub text: String,
    pub warnings: Vec<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
