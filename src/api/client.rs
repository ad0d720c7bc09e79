//! Platform API client
//!
//! Thin typed layer over [`HttpClient`]: one method per endpoint, each
//! unwrapping the response envelope into either its data or an
//! [`Error::Api`] naming the failed operation.

use super::types::{
    Application, CreateApplicationRequest, CreateMspProjectRequest, CreateProjectRequest,
    Envelope, Member, Org, PagingList, Project, RawData, Runtime,
};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::pagination::{collect_all, Page, DEFAULT_COLLECT_PAGE_SIZE};
use crate::resolve::Directory;
use crate::types::{ApplicationMode, ScopeType, Workspace};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Client for the platform's REST API
#[derive(Debug)]
pub struct ErdaClient {
    http: HttpClient,
}

impl ErdaClient {
    /// Create a client talking to `server`
    pub fn new(server: impl Into<String>) -> Result<Self> {
        let config = HttpClientConfig::builder().base_url(server).build();
        Self::with_config(config)
    }

    /// Create a client from a full HTTP configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_config(config)?,
        })
    }

    // ========================================================================
    // Envelope handling
    // ========================================================================

    async fn envelope<T: DeserializeOwned>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<Envelope<T>> {
        let response = self
            .http
            .request(method, path, config)
            .await
            .map_err(|e| match e {
                Error::HttpStatus { .. } => Error::api(operation, format!("failed to request, {e}")),
                e => Error::api(operation, format!("failed to request ({e})")),
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::api(operation, format!("failed to read response ({e})")))?;

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            Error::api(
                operation,
                format!("failed to unmarshal {operation} response ({e})"),
            )
        })?;

        if !envelope.success {
            return Err(Error::api(
                operation,
                format!(
                    "failed to request, error code: {}, error message: {}",
                    envelope.err.code, envelope.err.msg
                ),
            ));
        }

        Ok(envelope)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.envelope(operation, method, path, config)
            .await?
            .data
            .ok_or_else(|| Error::api(operation, "response carries no data"))
    }

    async fn call_page<T: DeserializeOwned>(
        &self,
        operation: &str,
        resource: &str,
        path: &str,
        config: RequestConfig,
    ) -> Result<Page<T>> {
        let list: PagingList<T> = self.call(operation, Method::GET, path, config).await?;
        list.into_page().ok_or_else(|| {
            Error::api(
                operation,
                format!("critical: the number of {resource} is less than 0"),
            )
        })
    }

    // ========================================================================
    // Organizations
    // ========================================================================

    /// Fetch an organization by name or numeric ID
    pub async fn get_org(&self, name_or_id: &str) -> Result<Org> {
        if name_or_id.is_empty() {
            return Err(Error::api(
                "get organization detail",
                "invalid required parameter organization",
            ));
        }
        self.call(
            "get organization detail",
            Method::GET,
            &format!("/api/orgs/{name_or_id}"),
            RequestConfig::new(),
        )
        .await
    }

    // ========================================================================
    // Projects
    // ========================================================================

    /// Fetch one page of the projects the caller joined in an organization
    pub async fn list_projects_page(
        &self,
        org_id: u64,
        page_no: u32,
        page_size: u32,
    ) -> Result<Page<Project>> {
        let config = RequestConfig::new()
            .query("joined", true)
            .query("orgId", org_id)
            .query("pageNo", page_no)
            .query("pageSize", page_size)
            .org(org_id);
        self.call_page("list", "projects", "/api/projects", config)
            .await
    }

    /// Fetch every project the caller joined in an organization
    pub async fn list_projects(&self, org_id: u64) -> Result<Vec<Project>> {
        collect_all(
            |page_no, page_size| self.list_projects_page(org_id, page_no, page_size),
            DEFAULT_COLLECT_PAGE_SIZE,
        )
        .await
    }

    /// Fetch a project by ID
    pub async fn get_project(&self, org_id: u64, project_id: u64) -> Result<Project> {
        self.call(
            "get project detail",
            Method::GET,
            &format!("/api/projects/{project_id}"),
            RequestConfig::new().org(org_id),
        )
        .await
    }

    /// Find a project by exact name among the caller's projects
    pub async fn get_project_by_name(&self, org_id: u64, name: &str) -> Result<Project> {
        self.list_projects(org_id)
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::not_found("project", name))
    }

    /// Create a DevOps project, returning its ID
    pub async fn create_project(&self, org_id: u64, name: &str, desc: &str) -> Result<u64> {
        let request = CreateProjectRequest {
            name: name.to_string(),
            display_name: name.to_string(),
            desc: desc.to_string(),
            org_id,
            template: "DevOps".to_string(),
        };
        let id: u64 = self
            .call(
                "create",
                Method::POST,
                "/api/projects",
                RequestConfig::new()
                    .org(org_id)
                    .json(serde_json::to_value(&request)?)
                    .retries(0),
            )
            .await?;
        info!(org_id, project_id = id, name, "project created");
        Ok(id)
    }

    /// Register the monitoring tenant of a freshly created project
    pub async fn create_msp_project(&self, project_id: u64, name: &str) -> Result<RawData> {
        let request = CreateMspProjectRequest {
            id: project_id.to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            kind: "DOP".to_string(),
        };
        self.call(
            "create",
            Method::POST,
            "/api/msp/tenant/project",
            RequestConfig::new()
                .json(serde_json::to_value(&request)?)
                .retries(0),
        )
        .await
    }

    /// Delete a project
    pub async fn delete_project(&self, org_id: u64, project_id: u64) -> Result<()> {
        let _: Envelope<RawData> = self
            .envelope(
                "delete",
                Method::DELETE,
                &format!("/api/projects/{project_id}"),
                RequestConfig::new().org(org_id),
            )
            .await?;
        info!(org_id, project_id, "project deleted");
        Ok(())
    }

    // ========================================================================
    // Applications
    // ========================================================================

    /// Fetch one page of the applications of a project
    pub async fn list_applications_page(
        &self,
        org_id: u64,
        project_id: u64,
        page_no: u32,
        page_size: u32,
    ) -> Result<Page<Application>> {
        let config = RequestConfig::new()
            .query("projectId", project_id)
            .query("pageNo", page_no)
            .query("pageSize", page_size)
            .org(org_id);
        self.call_page("list", "applications", "/api/applications", config)
            .await
    }

    /// Fetch every application of a project
    pub async fn list_applications(&self, org_id: u64, project_id: u64) -> Result<Vec<Application>> {
        collect_all(
            |page_no, page_size| {
                self.list_applications_page(org_id, project_id, page_no, page_size)
            },
            DEFAULT_COLLECT_PAGE_SIZE,
        )
        .await
    }

    /// Fetch an application by ID
    pub async fn get_application(&self, org_id: u64, application_id: u64) -> Result<Application> {
        self.call(
            "get application detail",
            Method::GET,
            &format!("/api/applications/{application_id}"),
            RequestConfig::new().org(org_id),
        )
        .await
    }

    /// Create an application in a project
    pub async fn create_application(
        &self,
        org_id: u64,
        project_id: u64,
        name: &str,
        mode: ApplicationMode,
        desc: &str,
    ) -> Result<Application> {
        let request = CreateApplicationRequest {
            name: name.to_string(),
            display_name: name.to_string(),
            mode,
            desc: desc.to_string(),
            project_id,
        };
        self.call(
            "create",
            Method::POST,
            "/api/applications",
            RequestConfig::new()
                .org(org_id)
                .json(serde_json::to_value(&request)?)
                .retries(0),
        )
        .await
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// Fetch one page of the members of a scope, optionally filtered by role
    pub async fn list_members_page(
        &self,
        scope: ScopeType,
        scope_id: u64,
        roles: &[String],
        page_no: u32,
        page_size: u32,
    ) -> Result<Page<Member>> {
        let config = RequestConfig::new()
            .query("scopeId", scope_id)
            .query("scopeType", scope)
            .query("pageNo", page_no)
            .query("pageSize", page_size)
            .query_all("roles", roles);
        self.call_page("members", "members", "/api/members", config)
            .await
    }

    /// Fetch every member of a scope, optionally filtered by role
    pub async fn list_members(
        &self,
        scope: ScopeType,
        scope_id: u64,
        roles: &[String],
    ) -> Result<Vec<Member>> {
        collect_all(
            |page_no, page_size| self.list_members_page(scope, scope_id, roles, page_no, page_size),
            DEFAULT_COLLECT_PAGE_SIZE,
        )
        .await
    }

    /// Nicknames of the owners of a project or application
    pub async fn owner_nicks(&self, scope: ScopeType, scope_id: u64) -> Result<Vec<String>> {
        let roles = [scope.owner_role().to_string()];
        let members = self.list_members(scope, scope_id, &roles).await?;
        Ok(members.into_iter().map(|m| m.nick).collect())
    }

    // ========================================================================
    // Runtimes
    // ========================================================================

    /// Fetch the runtimes of an application, optionally in one workspace
    pub async fn list_runtimes(
        &self,
        org_id: u64,
        application_id: u64,
        workspace: Option<Workspace>,
    ) -> Result<Vec<Runtime>> {
        let mut config = RequestConfig::new()
            .query("applicationId", application_id)
            .org(org_id);
        if let Some(workspace) = workspace {
            config = config.query("workspace", workspace);
        }
        let runtimes: Vec<Runtime> = self
            .envelope("list runtimes", Method::GET, "/api/runtimes", config)
            .await?
            .data
            .unwrap_or_default();
        debug!(application_id, count = runtimes.len(), "listed runtimes");
        Ok(runtimes)
    }

    /// Delete a runtime
    pub async fn delete_runtime(&self, org_id: u64, runtime_id: u64) -> Result<()> {
        let _: Envelope<RawData> = self
            .envelope(
                "delete runtime",
                Method::DELETE,
                &format!("/api/runtimes/{runtime_id}"),
                RequestConfig::new().org(org_id),
            )
            .await?;
        info!(org_id, runtime_id, "runtime deleted");
        Ok(())
    }
}

#[async_trait]
impl Directory for ErdaClient {
    async fn org_id(&self, name: &str) -> Result<u64> {
        Ok(self.get_org(name).await?.id)
    }

    async fn project_id(&self, org_id: u64, name: &str) -> Result<u64> {
        Ok(self.get_project_by_name(org_id, name).await?.id)
    }

    async fn application_id(&self, org_id: u64, project_id: u64, name: &str) -> Result<u64> {
        self.list_applications(org_id, project_id)
            .await?
            .into_iter()
            .find(|a| a.name == name)
            .map(|a| a.id)
            .ok_or_else(|| Error::not_found("application", name))
    }
}
