use crate::target::TargetError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("unsupported query type: {0}")]
    InvalidQueryType(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error(transparent)]
    InvalidTarget(#[from] TargetError),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport failure talking to {server}: {reason}")]
    TransportFailure { server: String, reason: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("At least one DNS server is required")]
    NoTargets,

    #[error("too many DNS servers: {count} (maximum allowed: {max}). Reduce servers in config or request")]
    TooManyTargets { count: usize, max: usize },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
                | DomainError::TransportFailure { .. }
                | DomainError::InvalidDnsResponse(_)
                | DomainError::IoError(_)
        )
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidDomainName(_)
                | DomainError::InvalidQueryType(_)
                | DomainError::InvalidIpAddress(_)
                | DomainError::InvalidTarget(_)
                | DomainError::NoTargets
                | DomainError::TooManyTargets { .. }
        )
    }
}
