//! Command context
//!
//! Everything a command handler needs besides its own flags: the API client,
//! the org/project/application defaults taken from config, and the output
//! settings. Built once per invocation and passed down explicitly.

use crate::api::ErdaClient;
use crate::config::{GlobalConfig, ProjectInfo};
use crate::error::{Error, Result};
use crate::resolve::{resolve_application, resolve_org, resolve_project, Resolved, Selector};
use tracing::debug;

/// Inputs the context defaults are derived from
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextSources<'a> {
    /// `--host` flag
    pub host: Option<&'a str>,
    /// Global config
    pub global: Option<&'a GlobalConfig>,
    /// Project config of the working copy, if any
    pub project: Option<&'a ProjectInfo>,
    /// Name of the working directory, matched against the project's
    /// applications
    pub working_dir: Option<&'a str>,
}

/// Server and resource defaults for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub server: String,
    pub org: Selector,
    pub project: Selector,
    pub application: Selector,
}

impl Defaults {
    /// Derive defaults, preferring flags over the current context's
    /// platform over the project config
    pub fn from_sources(sources: ContextSources<'_>) -> Result<Self> {
        let platform = sources.global.and_then(GlobalConfig::current_platform);
        let project = sources.project;

        let server = sources
            .host
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| platform.map(|p| p.server.clone()).filter(|s| !s.is_empty()))
            .or_else(|| project.map(|p| p.server.clone()).filter(|s| !s.is_empty()))
            .ok_or_else(|| {
                Error::config(
                    "No server configured, use --host or select a context with `config use-context`",
                )
            })?;

        let org = platform
            .and_then(|p| p.org_info.as_ref())
            .map(|o| Selector::new(Some(o.name.clone()), Some(o.id)))
            .filter(|s| !s.is_empty())
            .or_else(|| project.map(|p| Selector::new(Some(p.org.clone()), Some(p.org_id))))
            .unwrap_or_default();

        let project_selector = project
            .map(|p| Selector::new(Some(p.project.clone()), Some(p.project_id)))
            .unwrap_or_default();

        let application = match (project, sources.working_dir) {
            (Some(p), Some(dir)) => p
                .application(dir)
                .map(|a| Selector::new(Some(a.application.clone()), Some(a.application_id)))
                .unwrap_or_default(),
            _ => Selector::default(),
        };

        let defaults = Self {
            server: server.trim_end_matches('/').to_string(),
            org,
            project: project_selector,
            application,
        };
        debug!(?defaults, "command context defaults");
        Ok(defaults)
    }
}

/// Shared state handed to every command handler
#[derive(Debug)]
pub struct CommandContext {
    /// API client bound to the selected server
    pub client: ErdaClient,
    /// Server and resource defaults
    pub defaults: Defaults,
    /// Whether paged views may prompt between pages
    pub interactive: bool,
}

impl CommandContext {
    /// Create a context talking to `defaults.server`
    pub fn new(defaults: Defaults, interactive: bool) -> Result<Self> {
        let client = ErdaClient::new(defaults.server.clone())?;
        Ok(Self::with_client(client, defaults, interactive))
    }

    /// Create a context around an existing client
    pub fn with_client(client: ErdaClient, defaults: Defaults, interactive: bool) -> Self {
        Self {
            client,
            defaults,
            interactive,
        }
    }

    /// Resolve the organization
    pub async fn org(&self, explicit: &Selector) -> Result<Resolved> {
        resolve_org(&self.client, explicit, &self.defaults.org).await
    }

    /// Resolve a project within `org_id`
    pub async fn project(&self, org_id: u64, explicit: &Selector) -> Result<Resolved> {
        resolve_project(&self.client, org_id, explicit, &self.defaults.project).await
    }

    /// Resolve an application within a project
    pub async fn application(
        &self,
        org_id: u64,
        project_id: u64,
        explicit: &Selector,
    ) -> Result<Resolved> {
        resolve_application(
            &self.client,
            org_id,
            project_id,
            explicit,
            &self.defaults.application,
        )
        .await
    }

    /// Check if `project_id` is the project of the working copy
    pub fn is_current_project(&self, project_id: u64) -> bool {
        self.defaults.project.id == Some(project_id)
    }
}
