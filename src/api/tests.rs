//! Tests for the platform API client

use super::*;
use crate::error::Error;
use crate::http::HttpClientConfig;
use crate::resolve::Directory;
use crate::types::{ApplicationMode, BackoffType, ScopeType, Workspace};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> ErdaClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(0)
        .timeout(Duration::from_secs(5))
        .no_rate_limit()
        .build();
    ErdaClient::with_config(config).unwrap()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn project(id: u64, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "displayName": name.to_uppercase(), "orgId": 1 })
}

/// Serves `/api/projects` pages out of `names`, honouring `pageNo`/`pageSize`
fn project_pages(
    names: &'static [&'static str],
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    move |req: &Request| {
        let param = |key: &str| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(0)
        };
        let page_no = param("pageNo");
        let page_size = param("pageSize");
        let start = (page_no.saturating_sub(1) * page_size).min(names.len());
        let end = (start + page_size).min(names.len());
        let list: Vec<_> = names[start..end]
            .iter()
            .enumerate()
            .map(|(i, n)| project((start + i + 1) as u64, n))
            .collect();
        ok(json!({ "list": list, "total": names.len() }))
    }
}

// ============================================================================
// Envelope
// ============================================================================

#[tokio::test]
async fn test_get_org_decodes_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orgs/erda"))
        .respond_with(ok(json!({ "id": 1, "name": "erda", "displayName": "Erda" })))
        .mount(&server)
        .await;

    let org = client_for(&server).get_org("erda").await.unwrap();

    assert_eq!(org.id, 1);
    assert_eq!(org.display_name, "Erda");
}

#[tokio::test]
async fn test_get_org_rejects_empty_name() {
    let server = MockServer::start().await;

    let err = client_for(&server).get_org("").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "get organization detail: invalid required parameter organization"
    );
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "err": { "code": "NotFound", "msg": "project not found" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_project(1, 9).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "get project detail: failed to request, error code: NotFound, error message: project not found"
    );
}

#[tokio::test]
async fn test_error_field_alias_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/applications/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": "403", "msg": "no permission" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_application(1, 3).await.unwrap_err();

    assert!(err.to_string().ends_with("error code: 403, error message: no permission"));
}

#[tokio::test]
async fn test_undecodable_body_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orgs/erda"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_org("erda").await.unwrap_err();

    match err {
        Error::Api { operation, message } => {
            assert_eq!(operation, "get organization detail");
            assert!(message.starts_with("failed to unmarshal get organization detail response"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_failure_is_wrapped_with_operation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/projects/4"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = client_for(&server).delete_project(1, 4).await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("delete: failed to request, status-code: 403, content-type: text/plain"));
    assert!(message.ends_with("raw body: forbidden"));
}

// ============================================================================
// Projects
// ============================================================================

#[tokio::test]
async fn test_list_projects_page_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("joined", "true"))
        .and(query_param("orgId", "1"))
        .and(query_param("pageNo", "2"))
        .and(query_param("pageSize", "5"))
        .and(header("Org-ID", "1"))
        .respond_with(ok(json!({ "list": [project(6, "zeta")], "total": 6 })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server).list_projects_page(1, 2, 5).await.unwrap();

    assert_eq!(page.total, 6);
    assert_eq!(page.items[0].name, "zeta");
}

#[tokio::test]
async fn test_negative_total_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .respond_with(ok(json!({ "list": [], "total": -1 })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_applications_page(1, 2, 1, 20)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "list: critical: the number of applications is less than 0"
    );
}

#[tokio::test]
async fn test_null_list_is_an_empty_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ok(json!({ "list": null, "total": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let projects = client_for(&server).list_projects(1).await.unwrap();

    assert!(projects.is_empty());
}

#[tokio::test]
async fn test_list_projects_walks_every_page() {
    static NAMES: [&str; 45] = [
        "p01", "p02", "p03", "p04", "p05", "p06", "p07", "p08", "p09", "p10", "p11", "p12",
        "p13", "p14", "p15", "p16", "p17", "p18", "p19", "p20", "p21", "p22", "p23", "p24",
        "p25", "p26", "p27", "p28", "p29", "p30", "p31", "p32", "p33", "p34", "p35", "p36",
        "p37", "p38", "p39", "p40", "p41", "p42", "p43", "p44", "p45",
    ];
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("pageSize", "20"))
        .respond_with(project_pages(&NAMES))
        .expect(3)
        .mount(&server)
        .await;

    let projects = client_for(&server).list_projects(1).await.unwrap();

    assert_eq!(projects.len(), 45);
    assert_eq!(projects.first().map(|p| p.name.as_str()), Some("p01"));
    assert_eq!(projects.last().map(|p| p.id), Some(45));
}

#[tokio::test]
async fn test_project_id_by_name() {
    static NAMES: [&str; 3] = ["alpha", "beta", "gamma"];
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(project_pages(&NAMES))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert_eq!(client.project_id(1, "beta").await.unwrap(), 2);
    let err = client.project_id(1, "delta").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid project name delta, may not exist or has no permission"
    );
}

#[tokio::test]
async fn test_create_project_posts_devops_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .and(header("Org-ID", "1"))
        .and(body_partial_json(json!({
            "name": "demo",
            "displayName": "demo",
            "orgId": 1,
            "template": "DevOps"
        })))
        .respond_with(ok(json!(77)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/msp/tenant/project"))
        .and(body_partial_json(json!({ "id": "77", "type": "DOP" })))
        .respond_with(ok(json!({ "id": "77" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client.create_project(1, "demo", "").await.unwrap();
    let tenant = client.create_msp_project(id, "demo").await.unwrap();

    assert_eq!(id, 77);
    assert_eq!(tenant["id"], "77");
}

#[tokio::test]
async fn test_create_project_is_not_resent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .respond_with(ok(json!(42)))
        .expect(0)
        .mount(&server)
        .await;

    let client = ErdaClient::with_config(
        HttpClientConfig::builder()
            .base_url(server.uri())
            .max_retries(3)
            .backoff(
                BackoffType::Constant,
                Duration::from_millis(1),
                Duration::from_millis(5),
            )
            .no_rate_limit()
            .build(),
    )
    .unwrap();
    let err = client.create_project(1, "demo", "").await.unwrap_err();

    assert!(err.to_string().starts_with("create: failed to request, status-code: 503"));
}

// ============================================================================
// Applications
// ============================================================================

#[tokio::test]
async fn test_create_application_sends_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/applications"))
        .and(body_partial_json(json!({
            "name": "web",
            "mode": "LIBRARY",
            "projectId": 10
        })))
        .respond_with(ok(json!({
            "id": 100,
            "name": "web",
            "mode": "LIBRARY",
            "projectId": 10,
            "gitRepoNew": "git.example.com/erda/demo/web"
        })))
        .mount(&server)
        .await;

    let app = client_for(&server)
        .create_application(1, 10, "web", ApplicationMode::Library, "")
        .await
        .unwrap();

    assert_eq!(app.id, 100);
    assert_eq!(app.repo_url(), "https://git.example.com/erda/demo/web");
}

#[tokio::test]
async fn test_application_id_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .and(query_param("projectId", "10"))
        .respond_with(ok(json!({
            "list": [{ "id": 100, "name": "web" }, { "id": 101, "name": "api" }],
            "total": 2
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert_eq!(client.application_id(1, 10, "api").await.unwrap(), 101);
    assert!(matches!(
        client.application_id(1, 10, "worker").await,
        Err(Error::NotFound { .. })
    ));
}

// ============================================================================
// Members
// ============================================================================

#[tokio::test]
async fn test_list_members_repeats_roles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/members"))
        .and(query_param("scopeType", "project"))
        .and(query_param("scopeId", "10"))
        .respond_with(|req: &Request| {
            let roles: Vec<String> = req
                .url
                .query_pairs()
                .filter(|(k, _)| k == "roles")
                .map(|(_, v)| v.into_owned())
                .collect();
            ok(json!({
                "list": [{ "userId": "1", "nick": roles.join("+"), "roles": roles }],
                "total": 1
            }))
        })
        .mount(&server)
        .await;

    let roles = vec!["Owner".to_string(), "Lead".to_string()];
    let members = client_for(&server)
        .list_members(ScopeType::Project, 10, &roles)
        .await
        .unwrap();

    assert_eq!(members.len(), 1);
    assert_eq!(members[0].nick, "Owner+Lead");
}

#[tokio::test]
async fn test_member_with_null_roles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/members"))
        .respond_with(ok(json!({
            "list": [{ "userId": "3", "nick": "carol", "roles": null }],
            "total": 1
        })))
        .mount(&server)
        .await;

    let members = client_for(&server)
        .list_members(ScopeType::App, 100, &[])
        .await
        .unwrap();

    assert_eq!(members[0].nick, "carol");
    assert!(members[0].roles.is_empty());
}

#[tokio::test]
async fn test_owner_nicks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/members"))
        .and(query_param("scopeType", "app"))
        .and(query_param("roles", "Owner"))
        .respond_with(ok(json!({
            "list": [{ "nick": "alice" }, { "nick": "bob" }],
            "total": 2
        })))
        .mount(&server)
        .await;

    let nicks = client_for(&server)
        .owner_nicks(ScopeType::App, 100)
        .await
        .unwrap();

    assert_eq!(nicks, vec!["alice", "bob"]);
}

// ============================================================================
// Runtimes
// ============================================================================

#[tokio::test]
async fn test_list_runtimes_with_workspace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/runtimes"))
        .and(query_param("applicationId", "100"))
        .and(query_param("workspace", "PROD"))
        .respond_with(ok(json!([{
            "id": 5,
            "name": "master",
            "workspace": "PROD",
            "status": "Healthy",
            "createdAt": "2024-03-01T10:00:00Z"
        }])))
        .mount(&server)
        .await;

    let runtimes = client_for(&server)
        .list_runtimes(1, 100, Some(Workspace::Prod))
        .await
        .unwrap();

    assert_eq!(runtimes.len(), 1);
    assert_eq!(runtimes[0].status, "Healthy");
    assert!(runtimes[0].created_at.is_some());
}

#[tokio::test]
async fn test_list_runtimes_null_data_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/runtimes"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;

    let runtimes = client_for(&server).list_runtimes(1, 100, None).await.unwrap();

    assert!(runtimes.is_empty());
}

#[tokio::test]
async fn test_delete_runtime() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/runtimes/5"))
        .and(header("Org-ID", "1"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).delete_runtime(1, 5).await.unwrap();
}
