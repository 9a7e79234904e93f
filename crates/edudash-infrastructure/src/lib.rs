pub mod authorized_gateway;
pub mod backend;
pub mod config_service;
pub mod file_gateway;
pub mod json;
pub mod memory_gateway;
pub mod paths;
pub mod rest_gateway;
pub mod storage;

pub use crate::authorized_gateway::{AuthorizedGateway, Fallback};
pub use crate::backend::open_gateway;
pub use crate::config_service::ConfigService;
pub use crate::file_gateway::TomlFileGateway;
pub use crate::memory_gateway::InMemoryGateway;
pub use crate::paths::DashPaths;
pub use crate::rest_gateway::RestGateway;
