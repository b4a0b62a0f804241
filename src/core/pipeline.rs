use crate::core::github::{GithubClient, SearchQuery};
use crate::core::readme::{apply_template, render_rows, sort_libraries};
use crate::core::support_docs::{normalize_name, SupportProbe};
use crate::core::{ConfigProvider, Pipeline, RepoRecord, Storage, TransformResult};
use crate::utils::error::{ReadmeError, Result};

pub struct ReadmePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    github: GithubClient,
    probe: SupportProbe,
}

impl<S: Storage, C: ConfigProvider> ReadmePipeline<S, C> {
    pub fn new(storage: S, config: C, github: GithubClient) -> Self {
        Self {
            storage,
            config,
            github,
            probe: SupportProbe::default(),
        }
    }

    fn search_query(&self) -> SearchQuery {
        SearchQuery {
            organization: self.config.organization().to_string(),
            metadata_file: self.config.metadata_file().to_string(),
            topic: self.config.topic().to_string(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReadmePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RepoRecord>> {
        let repos = self
            .github
            .search_repositories(&self.search_query(), self.config.per_page())
            .await?;

        let mut records = Vec::new();
        for repo in &repos {
            match self
                .github
                .fetch_metadata(repo, self.config.metadata_file())
                .await?
            {
                Some(mut metadata) => {
                    tracing::info!("{}: found {}", repo, self.config.metadata_file());
                    if metadata.repo().is_none() {
                        metadata.set_repo(repo.as_str());
                    }
                    records.push(RepoRecord::new(repo.clone(), metadata));
                }
                None => {
                    tracing::info!("{}: {} not found", repo, self.config.metadata_file());
                }
            }
        }

        tracing::info!("Discovered {} repositories", repos.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<RepoRecord>) -> Result<TransformResult> {
        let mut libraries = Vec::new();

        for record in data {
            let mut metadata = record.metadata;

            if metadata.api_id().is_none() {
                tracing::debug!("{}: no api_id, skipping", record.repo);
                continue;
            }

            let name = metadata
                .name_pretty()
                .map(|name| normalize_name(name).to_string())
                .ok_or_else(|| ReadmeError::ProcessingError {
                    message: format!("{}: metadata has api_id but no name_pretty", record.repo),
                })?;
            metadata.set_name_pretty(name);

            if let Some(docs) = metadata.product_documentation().map(str::to_string) {
                let support = self.probe.resolve(metadata.display_name(), &docs).await?;
                metadata.set_support_documentation(support);
            }

            libraries.push(metadata);
        }

        sort_libraries(&mut libraries)?;

        let json_output = serde_json::to_string_pretty(&libraries)?;
        let rows = render_rows(&libraries, self.config.install_command());

        let template_bytes = self.storage.read_file(self.config.template_path()).await?;
        let template = String::from_utf8(template_bytes).map_err(|e| ReadmeError::ProcessingError {
            message: format!("Template {} is not valid UTF-8: {}", self.config.template_path(), e),
        })?;
        let readme_output = apply_template(&template, self.config.placeholder(), &rows)?;

        Ok(TransformResult {
            libraries,
            json_output,
            readme_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        tracing::debug!(
            "Writing {} libraries to {}",
            result.libraries.len(),
            self.config.json_output()
        );
        self.storage
            .write_file(self.config.json_output(), result.json_output.as_bytes())
            .await?;

        tracing::debug!("Writing README to {}", self.config.readme_output());
        self.storage
            .write_file(self.config.readme_output(), result.readme_output.as_bytes())
            .await?;

        Ok(format!("{}/{}", self.config.root_dir(), self.config.readme_output()))
    }
}
