pub mod common;
pub mod config;
pub mod environment;
pub mod example;
pub mod package;
pub mod project;
pub mod request;

pub use crate::domain::DomainError;
pub use environment::EnvironmentDescriptor;
pub use project::ProjectSummary;
pub use request::ProjectRequest;
