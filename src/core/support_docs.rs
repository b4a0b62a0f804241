use crate::utils::error::Result;
use reqwest::{Client, StatusCode};
use url::Url;

pub const STACKDRIVER_SUPPORT_URL: &str = "https://cloud.google.com/stackdriver/docs/getting-support";

const NAME_PREFIXES: [&str; 2] = ["Google Cloud ", "Cloud "];
const SUPPORT_SUFFIX: &str = "docs/getting-support";

/// Strips one leading "Google Cloud " or "Cloud " from a product name.
pub fn normalize_name(name: &str) -> &str {
    NAME_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

pub fn is_stackdriver(name: &str) -> bool {
    name.trim().to_lowercase().starts_with("stackdriver")
}

/// Rewrites a product documentation URL into its "getting support" page,
/// replacing everything from the last `docs` path segment onward.
pub fn support_candidate(product_documentation: &str) -> Result<String> {
    let mut url = Url::parse(product_documentation)?;

    let trimmed = url.path().trim_end_matches('/').to_string();
    let mut path = format!("{}/", trimmed);

    if let Some(index) = path.rfind("/docs/") {
        path.truncate(index + 1);
        path.push_str(SUPPORT_SUFFIX);
    }

    url.set_path(&path);
    Ok(url.to_string())
}

/// Issues HEAD requests against derived documentation URLs.
#[derive(Debug, Clone, Default)]
pub struct SupportProbe {
    client: Client,
}

impl SupportProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `false` only for a 404. Every other status counts as existing.
    pub async fn exists(&self, url: &str) -> Result<bool> {
        let response = self.client.head(url).send().await?;
        tracing::debug!("HEAD {} -> {}", url, response.status());
        Ok(response.status() != StatusCode::NOT_FOUND)
    }

    /// Resolves the support documentation URL for a product.
    pub async fn resolve(&self, name_pretty: &str, product_documentation: &str) -> Result<String> {
        let candidate = support_candidate(product_documentation)?;

        if is_stackdriver(name_pretty) {
            return Ok(STACKDRIVER_SUPPORT_URL.to_string());
        }

        if self.exists(&candidate).await? {
            Ok(candidate)
        } else {
            tracing::debug!(
                "{} not found, falling back to {}",
                candidate,
                product_documentation
            );
            Ok(product_documentation.to_string())
        }
    }
}
