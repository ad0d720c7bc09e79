//! Wire types of the platform API
//!
//! Every endpoint answers with the same envelope:
//! `{"success": bool, "data": ..., "err": {"code": ..., "msg": ...}}`.
//! Listing endpoints put `{"list": [...], "total": n}` in `data`.

use crate::pagination::Page;
use crate::types::{ApplicationMode, JsonValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Envelope
// ============================================================================

/// Treat an explicit `null` like a missing field
///
/// The platform encodes empty slices as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body of a failed call
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub msg: String,
}

/// Response envelope shared by all endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, alias = "error")]
    pub err: ApiErrorBody,
}

/// `data` of a listing endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PagingList<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: i64,
}

impl<T> PagingList<T> {
    /// Convert into a [`Page`], or `None` when the server reports a
    /// negative total
    pub fn into_page(self) -> Option<Page<T>> {
        let total = u64::try_from(self.total).ok()?;
        Some(Page::new(self.list, total))
    }
}

// ============================================================================
// Resources
// ============================================================================

/// An organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Org {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub desc: String,
}

/// A project within an organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub desc: String,
    pub org_id: u64,
}

/// An application within a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Application {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub desc: String,
    pub mode: String,
    pub project_id: u64,
    pub project_name: String,
    pub git_repo: String,
    pub git_repo_new: String,
}

impl Application {
    /// Clone URL of the application's repository, always with a scheme
    pub fn repo_url(&self) -> String {
        let repo = if self.git_repo_new.is_empty() {
            &self.git_repo
        } else {
            &self.git_repo_new
        };
        if repo.starts_with("http://") || repo.starts_with("https://") {
            repo.clone()
        } else {
            format!("https://{repo}")
        }
    }
}

/// A member of an org, project or application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    pub user_id: String,
    pub name: String,
    pub nick: String,
    pub email: String,
    pub mobile: String,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

/// A deployed runtime of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runtime {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub workspace: String,
    #[serde(default)]
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /api/projects`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub display_name: String,
    pub desc: String,
    pub org_id: u64,
    pub template: String,
}

/// Body of `POST /api/msp/tenant/project`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMspProjectRequest {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Body of `POST /api/applications`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub name: String,
    pub display_name: String,
    pub mode: ApplicationMode,
    pub desc: String,
    pub project_id: u64,
}

/// Loosely-typed payload for endpoints whose data the CLI only echoes
pub type RawData = JsonValue;
