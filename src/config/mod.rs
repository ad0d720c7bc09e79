//! Configuration module
//!
//! The global config (platforms, contexts, the selected context) and the
//! project-local config that pins a working copy to an org and project.

mod store;
mod types;

pub use store::{
    default_config_path, find_project_config, load_project_config, save_project_config,
    ConfigStore, CONFIG_DIR, CONFIG_FILE,
};
pub use types::{ApplicationInfo, ContextEntry, GlobalConfig, OrgInfo, Platform, ProjectInfo};
