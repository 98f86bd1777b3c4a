use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Message without the variant prefix, suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::NotFound { entity, value, .. } => format!("{} '{}' not found", entity, value),
            DomainError::Validation(msg)
            | DomainError::Conflict(msg)
            | DomainError::Unauthorized(msg)
            | DomainError::Forbidden(msg)
            | DomainError::Storage(msg) => msg.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_strips_prefix() {
        let e = DomainError::Validation("Rejection reason is required".into());
        assert_eq!(e.to_string(), "Validation: Rejection reason is required");
        assert_eq!(e.user_message(), "Rejection reason is required");
    }

    #[test]
    fn not_found_message() {
        let e = DomainError::not_found("Vehicle", "v-1");
        assert_eq!(e.user_message(), "Vehicle 'v-1' not found");
    }

    #[test]
    fn infra_errors_become_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let e: DomainError = InfraError::from(io).into();
        assert!(matches!(e, DomainError::Storage(msg) if msg.contains("disk full")));
    }
}
