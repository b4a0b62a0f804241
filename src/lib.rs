pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use core::{
    etl::EtlEngine,
    github::{GithubClient, GithubSettings},
    pipeline::ReadmePipeline,
};
pub use utils::error::{ReadmeError, Result};
