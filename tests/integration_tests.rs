//! Integration tests using mock HTTP server
//!
//! Tests the full flow: config files → context defaults → name resolution →
//! paged API listings → rendered output

use erda_cli::api::{ErdaClient, Project};
use erda_cli::config::{
    find_project_config, load_project_config, save_project_config, ApplicationInfo, ConfigStore,
    GlobalConfig, ProjectInfo,
};
use erda_cli::context::{ContextSources, Defaults};
use erda_cli::http::HttpClientConfig;
use erda_cli::output::{OutputFormat, Printer};
use erda_cli::pagination::{collect_all, view_all, PagingState, PromptConfirm};
use erda_cli::resolve::{resolve_application, resolve_org, resolve_project, Selector};
use erda_cli::types::BackoffType;
use erda_cli::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Cursor;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn client_for(server: &MockServer) -> ErdaClient {
    ErdaClient::with_config(
        HttpClientConfig::builder()
            .base_url(server.uri())
            .max_retries(0)
            .no_rate_limit()
            .build(),
    )
    .unwrap()
}

/// Serves `count` projects named `project-N`, honoring `pageNo`/`pageSize`
fn project_listing(count: usize) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    move |req: &Request| {
        let param = |key: &str| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(0)
        };
        let (page_no, page_size) = (param("pageNo"), param("pageSize"));
        let start = (page_no.saturating_sub(1) * page_size).min(count);
        let end = (start + page_size).min(count);
        let list: Vec<_> = (start..end)
            .map(|i| json!({ "id": i + 1, "name": format!("project-{}", i + 1), "orgId": 1 }))
            .collect();
        ok(json!({ "list": list, "total": count }))
    }
}

// ============================================================================
// Paged Listing Integration Tests
// ============================================================================

#[tokio::test]
async fn test_collect_all_projects_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(header("Org-ID", "1"))
        .respond_with(project_listing(12))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let projects = collect_all(
        |page_no, page_size| client.list_projects_page(1, page_no, page_size),
        5,
    )
    .await
    .unwrap();

    assert_eq!(projects.len(), 12);
    let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=12).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_view_all_with_prompt_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(project_listing(9))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut printer = Printer::new(OutputFormat::Table, true, Vec::new());
    let mut prompt_out = Vec::new();
    let mut confirm = PromptConfirm::new(Cursor::new("y\nn\n"), &mut prompt_out);

    let shown = view_all(
        |page_no, page_size| client.list_projects_page(1, page_no, page_size),
        |items: &[Project], state: &PagingState| {
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|p| vec![state.page_no.to_string(), p.name.clone()])
                .collect();
            printer.page(items, &["Page", "Name"], &rows)
        },
        &mut confirm,
        "Continue to display project?",
        3,
        true,
    )
    .await
    .unwrap();

    assert_eq!(shown, 6);
    let out = String::from_utf8(printer.into_inner()).unwrap();
    assert!(out.contains("project-6"));
    assert!(!out.contains("project-7"));

    drop(confirm);
    let prompts = String::from_utf8(prompt_out).unwrap();
    assert_eq!(prompts.matches("Continue to display project?").count(), 2);
}

#[tokio::test]
async fn test_server_error_stops_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("pageNo", "1"))
        .respond_with(project_listing(6))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("pageNo", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = collect_all(
        |page_no, page_size| client.list_projects_page(1, page_no, page_size),
        3,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().starts_with("list: failed to request"));
}

#[tokio::test]
async fn test_retry_recovers_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(project_listing(2))
        .mount(&server)
        .await;

    let client = ErdaClient::with_config(
        HttpClientConfig::builder()
            .base_url(server.uri())
            .max_retries(2)
            .backoff(
                BackoffType::Constant,
                Duration::from_millis(10),
                Duration::from_millis(50),
            )
            .no_rate_limit()
            .build(),
    )
    .unwrap();

    let projects = client.list_projects(1).await.unwrap();
    assert_eq!(projects.len(), 2);
}

// ============================================================================
// Resolution Integration Tests
// ============================================================================

#[tokio::test]
async fn test_resolve_chain_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orgs/erda"))
        .respond_with(ok(json!({ "id": 1, "name": "erda" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(project_listing(4))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .and(query_param("projectId", "3"))
        .respond_with(ok(json!({
            "list": [{ "id": 30, "name": "api" }, { "id": 31, "name": "web" }],
            "total": 2
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let org = resolve_org(&client, &Selector::name("erda"), &Selector::default())
        .await
        .unwrap();
    let project = resolve_project(&client, org.id, &Selector::name("project-3"), &Selector::id(9))
        .await
        .unwrap();
    let app = resolve_application(
        &client,
        org.id,
        project.id,
        &Selector::default(),
        &Selector::name("web"),
    )
    .await
    .unwrap();

    assert_eq!(org.id, 1);
    assert_eq!(project.id, 3);
    assert_eq!(app.id, 31);
    assert_eq!(app.label(), "web");
}

#[tokio::test]
async fn test_resolve_unknown_project_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(project_listing(2))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = resolve_project(&client, 1, &Selector::name("ghost"), &Selector::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { ref kind, .. } if kind == "project"));
}

// ============================================================================
// Config Integration Tests
// ============================================================================

#[tokio::test]
async fn test_config_files_drive_defaults() {
    let home = tempdir().unwrap();
    let store = ConfigStore::new(home.path().join(".erda.d").join("config"));

    let mut global = GlobalConfig::new();
    global
        .set_platform("local", "https://erda.local/", Some("erda"))
        .unwrap();
    global.set_context("dev", "local").unwrap();
    global.use_context("dev").unwrap();
    store.save(&global).await.unwrap();

    let repo = home.path().join("work").join("demo");
    let app_dir = repo.join("web");
    std::fs::create_dir_all(&app_dir).unwrap();
    let info = ProjectInfo {
        server: "https://erda.local".into(),
        org: "erda".into(),
        org_id: 1,
        project: "demo".into(),
        project_id: 3,
        applications: vec![ApplicationInfo {
            application: "web".into(),
            application_id: 31,
        }],
        ..ProjectInfo::default()
    };
    save_project_config(&repo.join(".erda.d").join("config"), &info)
        .await
        .unwrap();

    let found = find_project_config(&app_dir, Some(store.path())).unwrap();
    let project = load_project_config(&found).unwrap();
    let global = store.load().unwrap();

    let defaults = Defaults::from_sources(ContextSources {
        host: None,
        global: Some(&global),
        project: Some(&project),
        working_dir: Some("web"),
    })
    .unwrap();

    assert_eq!(defaults.server, "https://erda.local");
    assert_eq!(defaults.org, Selector::name("erda"));
    assert_eq!(defaults.project, Selector::new(Some("demo".into()), Some(3)));
    assert_eq!(defaults.application, Selector::new(Some("web".into()), Some(31)));
}

#[test]
fn test_home_config_is_not_a_project_config() {
    let home = tempdir().unwrap();
    let global = home.path().join(".erda.d").join("config");
    std::fs::create_dir_all(global.parent().unwrap()).unwrap();
    std::fs::write(&global, "version: \"1.0\"\n").unwrap();

    let nested = home.path().join("src");
    std::fs::create_dir_all(&nested).unwrap();

    assert!(find_project_config(&nested, Some(global.as_path())).is_none());
}
