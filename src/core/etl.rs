use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Discovering repositories and collecting metadata...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Collected metadata for {} repositories", records.len());

        tracing::info!("Generating library listing...");
        let result = self.pipeline.transform(records).await?;
        tracing::info!("Listing contains {} libraries", result.libraries.len());

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("README written to {}", output_path);

        Ok(output_path)
    }
}
