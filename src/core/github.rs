use crate::core::{RepoId, RepoMetadata};
use crate::utils::error::{ReadmeError, Result};
use base64::Engine;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::OnceLock;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Credential and endpoint for the hosting API, passed explicitly to the
/// client instead of living in process-wide state.
#[derive(Clone)]
pub struct GithubSettings {
    pub api_base: String,
    pub token: String,
}

impl GithubSettings {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for GithubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubSettings")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Repository search filter. Rendered as space separated search qualifiers.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub organization: String,
    pub metadata_file: String,
    pub topic: String,
}

impl SearchQuery {
    pub fn to_query_string(&self) -> String {
        format!(
            "org:{} is:public archived:false filename:{} topic:{}",
            self.organization, self.metadata_file, self.topic
        )
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
}

pub struct GithubClient {
    client: Client,
    settings: GithubSettings,
}

impl GithubClient {
    pub fn new(settings: GithubSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("library-readme/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, settings })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    /// Returns every repository matching `query`, following `next` links
    /// until the last page.
    pub async fn search_repositories(&self, query: &SearchQuery, per_page: u32) -> Result<Vec<RepoId>> {
        let q = query.to_query_string();
        let per_page = per_page.to_string();
        tracing::debug!("Searching repositories: {}", q);

        let mut request = self
            .client
            .get(self.api_url("/search/repositories"))
            .query(&[("q", q.as_str()), ("per_page", per_page.as_str())]);

        let mut seen = HashSet::new();
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let response = request
                .bearer_auth(&self.settings.token)
                .send()
                .await?
                .error_for_status()?;

            let next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_link);

            let body: SearchPage = response.json().await?;
            tracing::debug!("Search page {} returned {} items", page, body.items.len());

            for item in body.items {
                if seen.insert(item.full_name.clone()) {
                    repos.push(RepoId::new(item.full_name));
                }
            }

            match next {
                Some(url) => {
                    request = self.client.get(url);
                    page += 1;
                }
                None => break,
            }
        }

        Ok(repos)
    }

    /// Fetches and parses `metadata_file` from the default branch of `repo`.
    /// A missing file is `Ok(None)`.
    pub async fn fetch_metadata(&self, repo: &RepoId, metadata_file: &str) -> Result<Option<RepoMetadata>> {
        let url = self.api_url(&format!("/repos/{}/contents/{}", repo, metadata_file));
        tracing::debug!("Fetching metadata: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.settings.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ReadmeError::HttpStatusError {
                method: "GET".to_string(),
                url,
                status: status.as_u16(),
            });
        }

        let contents: ContentsResponse = response.json().await?;
        let metadata = decode_metadata(&contents.content)?;
        Ok(Some(metadata))
    }
}

/// Decodes the base64 `content` field of a contents response. The API wraps
/// the encoded text at 60 columns.
pub fn decode_metadata(encoded: &str) -> Result<RepoMetadata> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(compact)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<([^>]*)>\s*;\s*rel="([^"]*)""#).expect("link header pattern is valid")
    })
}

/// Extracts the `rel="next"` target from a `Link` header value.
pub fn next_link(header: &str) -> Option<String> {
    link_pattern()
        .captures_iter(header)
        .find(|caps| caps[2].split_whitespace().any(|rel| rel == "next"))
        .map(|caps| caps[1].to_string())
}
