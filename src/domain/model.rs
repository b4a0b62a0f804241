use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self(full_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contents of a repository's metadata file.
///
/// The source object is kept as-is, so every key, explicit `null`s and the
/// original key order survive serialization. The accessors read the fields
/// the listing needs; a `null` reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoMetadata(Map<String, Value>);

impl RepoMetadata {
    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Overwrites `key` in place, or appends it when absent.
    fn set_str_field(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn api_id(&self) -> Option<&str> {
        self.str_field("api_id")
    }

    pub fn name_pretty(&self) -> Option<&str> {
        self.str_field("name_pretty")
    }

    pub fn display_name(&self) -> &str {
        self.name_pretty().unwrap_or_default()
    }

    pub fn product_documentation(&self) -> Option<&str> {
        self.str_field("product_documentation")
    }

    pub fn client_documentation(&self) -> Option<&str> {
        self.str_field("client_documentation")
    }

    pub fn distribution_name(&self) -> Option<&str> {
        self.str_field("distribution_name")
    }

    pub fn repo(&self) -> Option<&str> {
        self.str_field("repo")
    }

    pub fn support_documentation(&self) -> Option<&str> {
        self.str_field("support_documentation")
    }

    pub fn requires_billing(&self) -> bool {
        self.0
            .get("requires_billing")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_name_pretty(&mut self, name: impl Into<String>) {
        self.set_str_field("name_pretty", name);
    }

    pub fn set_repo(&mut self, repo: impl Into<String>) {
        self.set_str_field("repo", repo);
    }

    pub fn set_support_documentation(&mut self, url: impl Into<String>) {
        self.set_str_field("support_documentation", url);
    }
}

/// A discovered repository together with its parsed metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoRecord {
    pub repo: RepoId,
    pub metadata: RepoMetadata,
}

impl RepoRecord {
    pub fn new(repo: RepoId, metadata: RepoMetadata) -> Self {
        Self { repo, metadata }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub libraries: Vec<RepoMetadata>,
    pub json_output: String,
    pub readme_output: String,
}
