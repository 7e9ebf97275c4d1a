use crate::domain::{entities::ProjectRequest, error::DomainError};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_request(request: &ProjectRequest) -> Result<(), DomainError> {
        request.validate()
    }

    /// Environment names are limited to ASCII letters, digits, `_` and `-`.
    pub fn validate_env_name(name: &str) -> Result<(), DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidEnvironmentName {
                name: name.into(),
                reason: "name is empty".into(),
            });
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(DomainError::InvalidEnvironmentName {
                name: name.into(),
                reason: format!("character '{c}' is not allowed"),
            });
        }
        Ok(())
    }
}
