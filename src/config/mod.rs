pub mod cli;
pub mod toml_config;

use crate::core::github::DEFAULT_API_BASE;
use crate::core::readme::{DEFAULT_INSTALL_COMMAND, DEFAULT_PLACEHOLDER};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_search_term, validate_url,
    Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ORGANIZATION: &str = "googleapis";
pub const DEFAULT_TOPIC: &str = "nodejs";
pub const DEFAULT_METADATA_FILE: &str = ".repo-metadata.json";
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_ROOT_DIR: &str = ".";
pub const DEFAULT_TEMPLATE_PATH: &str = "bin/README.md.tpl";
pub const DEFAULT_JSON_OUTPUT: &str = "libraries.json";
pub const DEFAULT_README_OUTPUT: &str = "README.md";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "library-readme")]
#[command(about = "Generate a README listing of published client libraries")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of flags
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, default_value = DEFAULT_ORGANIZATION)]
    pub org: String,

    #[arg(long, default_value = DEFAULT_TOPIC)]
    pub topic: String,

    #[arg(long, default_value = DEFAULT_METADATA_FILE)]
    pub metadata_file: String,

    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    /// Directory the template and output paths are relative to
    #[arg(long, default_value = DEFAULT_ROOT_DIR)]
    pub root: String,

    #[arg(long, default_value = DEFAULT_TEMPLATE_PATH)]
    pub template: String,

    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    pub placeholder: String,

    #[arg(long, default_value = DEFAULT_JSON_OUTPUT)]
    pub json_output: String,

    #[arg(long, default_value = DEFAULT_README_OUTPUT)]
    pub readme_output: String,

    #[arg(long, default_value = DEFAULT_INSTALL_COMMAND)]
    pub install_command: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn organization(&self) -> &str {
        &self.org
    }

    fn topic(&self) -> &str {
        &self.topic
    }

    fn metadata_file(&self) -> &str {
        &self.metadata_file
    }

    fn per_page(&self) -> u32 {
        self.per_page
    }

    fn root_dir(&self) -> &str {
        &self.root
    }

    fn template_path(&self) -> &str {
        &self.template
    }

    fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn json_output(&self) -> &str {
        &self.json_output
    }

    fn readme_output(&self) -> &str {
        &self.readme_output
    }

    fn install_command(&self) -> &str {
        &self.install_command
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_url("api_base", config.api_base())?;
    validate_search_term("organization", config.organization())?;
    validate_search_term("topic", config.topic())?;
    validate_search_term("metadata_file", config.metadata_file())?;
    validate_range("per_page", config.per_page(), 1, 100)?;
    validate_path("root", config.root_dir())?;
    validate_path("template", config.template_path())?;
    validate_path("json_output", config.json_output())?;
    validate_path("readme_output", config.readme_output())?;
    validate_non_empty_string("placeholder", config.placeholder())?;
    validate_non_empty_string("install_command", config.install_command())?;
    Ok(())
}
