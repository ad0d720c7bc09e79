//! Configuration file types
//!
//! Both files are YAML. The global file lists platforms and named contexts
//! pointing at them; the project file pins the org, project and
//! applications a working copy belongs to.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// Global Config
// ============================================================================

/// Contents of the global config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Config version
    #[serde(default = "default_version")]
    pub version: String,

    /// Known platforms
    #[serde(default)]
    pub platforms: Vec<Platform>,

    /// Named contexts, each selecting a platform
    #[serde(default)]
    pub contexts: Vec<ContextEntry>,

    /// Name of the selected context, empty when none
    #[serde(default)]
    pub current_context: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            platforms: Vec::new(),
            contexts: Vec::new(),
            current_context: String::new(),
        }
    }
}

/// A platform deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_info: Option<OrgInfo>,
}

/// Default organization of a platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: u64,
}

/// A named context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub name: String,
    pub platform_name: String,
}

impl GlobalConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a platform by name
    pub fn platform(&self, name: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.name == name)
    }

    /// Look up a context by name
    pub fn context(&self, name: &str) -> Option<&ContextEntry> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Platform selected by the current context
    pub fn current_platform(&self) -> Option<&Platform> {
        if self.current_context.is_empty() {
            return None;
        }
        let context = self.context(&self.current_context)?;
        self.platform(&context.platform_name)
    }

    /// Add a platform or update the server (and org, when given) of an
    /// existing one
    pub fn set_platform(&mut self, name: &str, server: &str, org: Option<&str>) -> Result<()> {
        if server.is_empty() {
            return Err(Error::config("Must set server by --server"));
        }

        let org_info = org.filter(|o| !o.is_empty()).map(|o| OrgInfo {
            name: o.to_string(),
            id: 0,
        });

        match self.platforms.iter_mut().find(|p| p.name == name) {
            Some(platform) => {
                platform.server = server.to_string();
                if org_info.is_some() {
                    platform.org_info = org_info;
                }
            }
            None => self.platforms.push(Platform {
                name: name.to_string(),
                server: server.to_string(),
                org_info,
            }),
        }
        Ok(())
    }

    /// Add a context or repoint an existing one
    pub fn set_context(&mut self, name: &str, platform: &str) -> Result<()> {
        if platform.is_empty() {
            return Err(Error::config("Must set platform by --platform"));
        }
        if self.platform(platform).is_none() {
            warn!("Platform {platform} is not defined yet, context {name} will not resolve until it is");
        }

        match self.contexts.iter_mut().find(|c| c.name == name) {
            Some(context) => context.platform_name = platform.to_string(),
            None => self.contexts.push(ContextEntry {
                name: name.to_string(),
                platform_name: platform.to_string(),
            }),
        }
        Ok(())
    }

    /// Select an existing context
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.context(name).is_none() {
            return Err(Error::ContextNotFound {
                name: name.to_string(),
            });
        }
        self.current_context = name.to_string();
        Ok(())
    }

    /// Remove a platform, returning whether it existed
    pub fn delete_platform(&mut self, name: &str) -> bool {
        let before = self.platforms.len();
        self.platforms.retain(|p| p.name != name);
        self.platforms.len() != before
    }

    /// Remove a context, returning whether it existed
    ///
    /// Removing the current context also clears the selection.
    pub fn delete_context(&mut self, name: &str) -> bool {
        let before = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context.clear();
        }
        self.contexts.len() != before
    }
}

// ============================================================================
// Project Config
// ============================================================================

/// Contents of a project-local config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub version: String,
    pub server: String,
    pub org: String,
    pub org_id: u64,
    pub project: String,
    pub project_id: u64,
    pub applications: Vec<ApplicationInfo>,
}

/// An application checked out under the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationInfo {
    pub application: String,
    pub application_id: u64,
}

impl ProjectInfo {
    /// Look up an application by name
    pub fn application(&self, name: &str) -> Option<&ApplicationInfo> {
        self.applications.iter().find(|a| a.application == name)
    }
}
