//! Common types used throughout the Erda CLI
//!
//! Small closed vocabularies of the platform (member scopes, deployment
//! workspaces, application modes) plus transport enums.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Member Scope
// ============================================================================

/// Resource a member list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    /// Organization members
    Org,
    /// Project members
    Project,
    /// Application members
    App,
}

impl ScopeType {
    /// Wire name used in the `scopeType` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Org => "org",
            Self::Project => "project",
            Self::App => "app",
        }
    }

    /// Role name of the owner within this scope
    pub fn owner_role(self) -> &'static str {
        match self {
            Self::Org => "Manager",
            Self::Project | Self::App => "Owner",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Workspace
// ============================================================================

/// Deployment environment of a runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Workspace {
    Dev,
    Test,
    Staging,
    Prod,
}

impl Workspace {
    /// All workspaces, in promotion order
    pub const ALL: [Workspace; 4] = [Self::Dev, Self::Test, Self::Staging, Self::Prod];

    /// Wire name (`DEV`, `TEST`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "DEV",
            Self::Test => "TEST",
            Self::Staging => "STAGING",
            Self::Prod => "PROD",
        }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workspace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == upper)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|w| w.as_str()).collect();
                Error::invalid_argument(format!(
                    "Invalid workspace {s}, should be one in [{}]",
                    valid.join(" ")
                ))
            })
    }
}

// ============================================================================
// Application Mode
// ============================================================================

/// Kind of application within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationMode {
    Library,
    #[default]
    Service,
    Bigdata,
    ProjectService,
}

impl ApplicationMode {
    /// All modes accepted on creation
    pub const ALL: [ApplicationMode; 4] = [
        Self::Library,
        Self::Service,
        Self::Bigdata,
        Self::ProjectService,
    ];

    /// Wire name (`LIBRARY`, `SERVICE`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Library => "LIBRARY",
            Self::Service => "SERVICE",
            Self::Bigdata => "BIGDATA",
            Self::ProjectService => "PROJECT_SERVICE",
        }
    }
}

impl fmt::Display for ApplicationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                Error::invalid_argument(format!(
                    "Invalid application mode {s}, available values: {}",
                    valid.join(", ")
                ))
            })
    }
}
