use base64::Engine;
use clap::Parser;
use httpmock::prelude::*;
use httpmock::Method::HEAD;
use library_readme::{
    CliConfig, EtlEngine, GithubClient, GithubSettings, LocalStorage, ReadmeError, ReadmePipeline,
};
use tempfile::TempDir;

const TEMPLATE: &str = "# Libraries\n\n| Product | Docs | Install | Enable | Billing |\n|---|---|---|---|---|\n{{libraries}}\nfooter\n";

fn setup_root() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let bin_dir = temp_dir.path().join("bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    std::fs::write(bin_dir.join("README.md.tpl"), TEMPLATE).unwrap();
    temp_dir
}

fn engine_for(
    server: &MockServer,
    root: &TempDir,
) -> EtlEngine<ReadmePipeline<LocalStorage, CliConfig>> {
    let root_path = root.path().to_str().unwrap().to_string();
    let config = CliConfig::parse_from([
        "library-readme",
        "--api-base",
        server.base_url().as_str(),
        "--root",
        root_path.as_str(),
    ]);

    let github = GithubClient::new(GithubSettings::new(server.base_url(), "test-token")).unwrap();
    let storage = LocalStorage::new(root_path);
    EtlEngine::new(ReadmePipeline::new(storage, config, github))
}

fn contents_body(metadata: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "type": "file",
        "encoding": "base64",
        "content": base64::engine::general_purpose::STANDARD.encode(metadata.to_string())
    })
}

#[tokio::test]
async fn test_end_to_end_single_library() {
    let root = setup_root();
    let server = MockServer::start();

    let search = server.mock(|when, then| {
        when.method(GET).path("/search/repositories");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "total_count": 2,
                "items": [
                    {"full_name": "googleapis/nodejs-vision"},
                    {"full_name": "googleapis/nodejs-no-metadata"}
                ]
            }));
    });

    let product_docs = server.url("/vision/docs/");
    let metadata = serde_json::json!({
        "api_id": "x",
        "name_pretty": "Google Cloud Vision",
        "linkinator": null,
        "product_documentation": product_docs,
        "client_documentation": "...",
        "distribution_name": "pkg",
        "requires_billing": true
    });
    let vision = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/googleapis/nodejs-vision/contents/.repo-metadata.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(contents_body(&metadata));
    });
    let missing = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/googleapis/nodejs-no-metadata/contents/.repo-metadata.json");
        then.status(404);
    });
    let support_page = server.mock(|when, then| {
        when.method(HEAD).path("/vision/docs/getting-support");
        then.status(200);
    });

    let output_path = engine_for(&server, &root).run().await.unwrap();

    search.assert();
    vision.assert();
    missing.assert();
    support_page.assert();
    assert!(output_path.ends_with("README.md"));

    let json = std::fs::read_to_string(root.path().join("libraries.json")).unwrap();
    let libraries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(libraries.len(), 1);
    assert_eq!(libraries[0]["name_pretty"], "Vision");
    assert_eq!(libraries[0]["repo"], "googleapis/nodejs-vision");
    assert_eq!(
        libraries[0]["support_documentation"],
        server.url("/vision/docs/getting-support")
    );
    assert!(json.starts_with("[\n  {\n    \"api_id\": \"x\",\n    \"name_pretty\": \"Vision\",\n    \"linkinator\": null,\n"));
    let keys: Vec<&String> = libraries[0].as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        vec![
            "api_id",
            "name_pretty",
            "linkinator",
            "product_documentation",
            "client_documentation",
            "distribution_name",
            "requires_billing",
            "repo",
            "support_documentation"
        ]
    );

    let readme = std::fs::read_to_string(root.path().join("README.md")).unwrap();
    let rows: Vec<&str> = readme
        .lines()
        .filter(|line| line.starts_with("| ["))
        .collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        "| [Vision](https://github.com/googleapis/nodejs-vision) | [:notebook:](...) | `npm i pkg` | [enable](https://console.cloud.google.com/flows/enableapi?apiid=x) | :x: |"
    );
    assert!(readme.starts_with("# Libraries\n"));
    assert!(readme.ends_with("\nfooter\n"));
    assert!(!readme.contains("{{libraries}}"));
}

#[tokio::test]
async fn test_end_to_end_missing_support_page_falls_back() {
    let root = setup_root();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/search/repositories");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "items": [{"full_name": "googleapis/nodejs-translate"}]
            }));
    });

    let product_docs = server.url("/translate/docs/quickstart");
    let metadata = serde_json::json!({
        "api_id": "translate.googleapis.com",
        "name_pretty": "Cloud Translation",
        "product_documentation": product_docs.clone(),
        "requires_billing": false
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/googleapis/nodejs-translate/contents/.repo-metadata.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(contents_body(&metadata));
    });
    server.mock(|when, then| {
        when.method(HEAD).path("/translate/docs/getting-support");
        then.status(404);
    });

    engine_for(&server, &root).run().await.unwrap();

    let json = std::fs::read_to_string(root.path().join("libraries.json")).unwrap();
    let libraries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(libraries[0]["name_pretty"], "Translation");
    assert_eq!(libraries[0]["support_documentation"], product_docs);

    let readme = std::fs::read_to_string(root.path().join("README.md")).unwrap();
    assert!(readme.contains("| :white_check_mark: |"));
}

#[tokio::test]
async fn test_end_to_end_metadata_error_aborts_without_output() {
    let root = setup_root();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/search/repositories");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "items": [{"full_name": "googleapis/nodejs-broken"}]
            }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/googleapis/nodejs-broken/contents/.repo-metadata.json");
        then.status(502);
    });

    let result = engine_for(&server, &root).run().await;

    assert!(matches!(
        result,
        Err(ReadmeError::HttpStatusError { status: 502, .. })
    ));
    assert!(!root.path().join("libraries.json").exists());
    assert!(!root.path().join("README.md").exists());
}

#[tokio::test]
async fn test_end_to_end_discovery_error_aborts() {
    let root = setup_root();
    let server = MockServer::start();

    let search = server.mock(|when, then| {
        when.method(GET).path("/search/repositories");
        then.status(401);
    });

    let result = engine_for(&server, &root).run().await;

    search.assert();
    assert!(matches!(result, Err(ReadmeError::ApiError(_))));
    assert!(!root.path().join("README.md").exists());
}

#[tokio::test]
async fn test_end_to_end_empty_search_renders_empty_table() {
    let root = setup_root();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/search/repositories");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"total_count": 0, "items": []}));
    });

    engine_for(&server, &root).run().await.unwrap();

    let json = std::fs::read_to_string(root.path().join("libraries.json")).unwrap();
    assert_eq!(json, "[]");
    let readme = std::fs::read_to_string(root.path().join("README.md")).unwrap();
    assert_eq!(readme, TEMPLATE.replace("{{libraries}}", ""));
}
