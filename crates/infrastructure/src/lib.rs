//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_project_group_api;
mod in_memory_project_group_api;

pub use http_project_group_api::HttpProjectGroupApi;
pub use in_memory_project_group_api::InMemoryProjectGroupApi;
