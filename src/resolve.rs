//! Name-or-ID resolution for organizations, projects and applications
//!
//! Commands accept a resource either by `--<kind>` name or `--<kind>-id`, and
//! fall back to the defaults of the current context. Precedence is fixed:
//!
//! 1. explicit name (looked up, any explicit ID is ignored)
//! 2. explicit ID
//! 3. context ID (with the context name, if any)
//! 4. context name (looked up)
//! 5. error

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use tracing::{debug, warn};

/// A resource given by name and/or numeric ID
///
/// Empty names and zero IDs count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub name: Option<String>,
    pub id: Option<u64>,
}

impl Selector {
    /// Build a selector, dropping empty names and zero IDs
    pub fn new(name: Option<String>, id: Option<u64>) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()),
            id: id.filter(|id| *id > 0),
        }
    }

    /// Selector with only a name
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()), None)
    }

    /// Selector with only an ID
    pub fn id(id: u64) -> Self {
        Self::new(None, Some(id))
    }

    /// Check if neither a name nor an ID is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.id.is_none()
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Name, when known without an extra lookup
    pub name: Option<String>,
    /// Resolved ID
    pub id: u64,
}

impl Resolved {
    /// Name if known, otherwise the ID rendered as text
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// Resolve one resource from explicit flags, context defaults and a
/// name-to-ID lookup
pub async fn resolve<F, Fut>(
    kind: &str,
    explicit: &Selector,
    context: &Selector,
    lookup: F,
) -> Result<Resolved>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<u64>>,
{
    if let Some(name) = &explicit.name {
        if explicit.id.is_some() {
            warn!("Both --{kind} and --{kind}-id are set, only the name set by --{kind} is used");
        }
        let id = lookup(name.clone()).await?;
        debug!(kind, name = %name, id, "resolved by explicit name");
        return Ok(Resolved {
            name: Some(name.clone()),
            id,
        });
    }

    if let Some(id) = explicit.id {
        let name = context
            .name
            .clone()
            .filter(|_| context.id == Some(id));
        return Ok(Resolved { name, id });
    }

    if let Some(id) = context.id {
        return Ok(Resolved {
            name: context.name.clone(),
            id,
        });
    }

    if let Some(name) = &context.name {
        let id = lookup(name.clone()).await?;
        debug!(kind, name = %name, id, "resolved by context name");
        return Ok(Resolved {
            name: Some(name.clone()),
            id,
        });
    }

    Err(Error::resolve(
        kind,
        format!("no {kind} selected, use --{kind} or --{kind}-id or set a default in the project config"),
    ))
}

/// Name-to-ID lookups backing resolution
#[async_trait]
pub trait Directory: Send + Sync {
    /// ID of an organization by name
    async fn org_id(&self, name: &str) -> Result<u64>;

    /// ID of a project by name within an organization
    async fn project_id(&self, org_id: u64, name: &str) -> Result<u64>;

    /// ID of an application by name within a project
    async fn application_id(&self, org_id: u64, project_id: u64, name: &str) -> Result<u64>;
}

/// Resolve an organization
pub async fn resolve_org<D: Directory + ?Sized>(
    directory: &D,
    explicit: &Selector,
    context: &Selector,
) -> Result<Resolved> {
    resolve("org", explicit, context, |name| async move {
        directory.org_id(&name).await
    })
    .await
}

/// Resolve a project within an organization
pub async fn resolve_project<D: Directory + ?Sized>(
    directory: &D,
    org_id: u64,
    explicit: &Selector,
    context: &Selector,
) -> Result<Resolved> {
    resolve("project", explicit, context, |name| async move {
        directory.project_id(org_id, &name).await
    })
    .await
}

/// Resolve an application within a project
pub async fn resolve_application<D: Directory + ?Sized>(
    directory: &D,
    org_id: u64,
    project_id: u64,
    explicit: &Selector,
    context: &Selector,
) -> Result<Resolved> {
    resolve("application", explicit, context, |name| async move {
        directory.application_id(org_id, project_id, &name).await
    })
    .await
}
