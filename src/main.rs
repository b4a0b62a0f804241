use anyhow::Context;
use clap::Parser;
use library_readme::core::github::TOKEN_ENV_VAR;
use library_readme::core::ConfigProvider;
use library_readme::utils::{logger, validation};
use library_readme::utils::validation::Validate;
use library_readme::{
    CliConfig, EtlEngine, GithubClient, GithubSettings, LocalStorage, ReadmePipeline, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    let token = match validation::require_env(TOKEN_ENV_VAR) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Please set the {} environment variable", TOKEN_ENV_VAR);
            std::process::exit(1);
        }
    };

    let output_path = match cli.config.clone() {
        Some(path) => {
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load config file {}", path))?;
            run(config, token).await?
        }
        None => run(cli, token).await?,
    };

    println!("README written to {}", output_path);
    Ok(())
}

async fn run<C>(config: C, token: String) -> anyhow::Result<String>
where
    C: ConfigProvider + Validate + std::fmt::Debug + 'static,
{
    config.validate().context("invalid configuration")?;
    tracing::debug!("Config: {:?}", config);

    let settings = GithubSettings::new(config.api_base(), token);
    let github = GithubClient::new(settings)?;
    let storage = LocalStorage::new(config.root_dir());
    let pipeline = ReadmePipeline::new(storage, config, github);

    let engine = EtlEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => Ok(output_path),
        Err(e) => {
            tracing::error!("Generation failed: {}", e);
            Err(anyhow::Error::new(e))
        }
    }
}
