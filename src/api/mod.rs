//! Platform API module
//!
//! Typed access to the platform's REST endpoints. Listing endpoints are
//! exposed twice: one method per page, for interactive viewing, and one
//! that collects the whole collection.

mod client;
mod types;

pub use client::ErdaClient;
pub use types::{
    ApiErrorBody, Application, CreateApplicationRequest, CreateMspProjectRequest,
    CreateProjectRequest, Envelope, Member, Org, PagingList, Project, RawData, Runtime,
};

#[cfg(test)]
mod tests;
