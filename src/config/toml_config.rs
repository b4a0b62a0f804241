use crate::config::{
    validate_provider, DEFAULT_JSON_OUTPUT, DEFAULT_METADATA_FILE, DEFAULT_ORGANIZATION,
    DEFAULT_PER_PAGE, DEFAULT_README_OUTPUT, DEFAULT_ROOT_DIR, DEFAULT_TEMPLATE_PATH,
    DEFAULT_TOPIC,
};
use crate::core::github::DEFAULT_API_BASE;
use crate::core::readme::{DEFAULT_INSTALL_COMMAND, DEFAULT_PLACEHOLDER};
use crate::core::ConfigProvider;
use crate::utils::error::{ReadmeError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// File based configuration. Every key is optional and falls back to the
/// same default as the matching command line flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub github: GithubSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubSection {
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSection {
    pub organization: Option<String>,
    pub topic: Option<String>,
    pub metadata_file: Option<String>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub root: Option<String>,
    pub template: Option<String>,
    pub placeholder: Option<String>,
    pub json: Option<String>,
    pub readme: Option<String>,
    pub install_command: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReadmeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base(&self) -> &str {
        self.github.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    fn organization(&self) -> &str {
        self.search
            .organization
            .as_deref()
            .unwrap_or(DEFAULT_ORGANIZATION)
    }

    fn topic(&self) -> &str {
        self.search.topic.as_deref().unwrap_or(DEFAULT_TOPIC)
    }

    fn metadata_file(&self) -> &str {
        self.search
            .metadata_file
            .as_deref()
            .unwrap_or(DEFAULT_METADATA_FILE)
    }

    fn per_page(&self) -> u32 {
        self.search.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    fn root_dir(&self) -> &str {
        self.output.root.as_deref().unwrap_or(DEFAULT_ROOT_DIR)
    }

    fn template_path(&self) -> &str {
        self.output
            .template
            .as_deref()
            .unwrap_or(DEFAULT_TEMPLATE_PATH)
    }

    fn placeholder(&self) -> &str {
        self.output
            .placeholder
            .as_deref()
            .unwrap_or(DEFAULT_PLACEHOLDER)
    }

    fn json_output(&self) -> &str {
        self.output.json.as_deref().unwrap_or(DEFAULT_JSON_OUTPUT)
    }

    fn readme_output(&self) -> &str {
        self.output.readme.as_deref().unwrap_or(DEFAULT_README_OUTPUT)
    }

    fn install_command(&self) -> &str {
        self.output
            .install_command
            .as_deref()
            .unwrap_or(DEFAULT_INSTALL_COMMAND)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
