use crate::domain::model::{RepoRecord, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn organization(&self) -> &str;
    fn topic(&self) -> &str;
    fn metadata_file(&self) -> &str;
    fn per_page(&self) -> u32;
    fn root_dir(&self) -> &str;
    fn template_path(&self) -> &str;
    fn placeholder(&self) -> &str;
    fn json_output(&self) -> &str;
    fn readme_output(&self) -> &str;
    fn install_command(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RepoRecord>>;
    async fn transform(&self, data: Vec<RepoRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
