pub mod etl;
pub mod github;
pub mod pipeline;
pub mod readme;
pub mod support_docs;

pub use crate::domain::model::{RepoId, RepoMetadata, RepoRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
