use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Packet access out of range: {width} bytes at offset {offset} (capacity {capacity})")]
    PacketOverflow {
        offset: usize,
        width: usize,
        capacity: usize,
    },

    #[error("{message}")]
    FormatError { rcode: u8, message: String },

    #[error("{message}")]
    ServiceUnavailable { rcode: u8, message: String },

    #[error("{0}")]
    NameNotFound(String),

    #[error("{message}")]
    OperationNotSupported { rcode: u8, message: String },

    #[error("DNS response not authoritative (server {server})")]
    NotAuthoritative { server: String },

    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Transport error talking to {server}: {source}")]
    Transport {
        server: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("{message}")]
    Communication {
        message: String,
        #[source]
        cause: Option<Box<DomainError>>,
    },

    #[error("DNS client has been closed")]
    ClientClosed,
}

impl DomainError {
    pub fn transport(server: impl ToString, source: std::io::Error) -> Self {
        DomainError::Transport {
            server: server.to_string(),
            source: Arc::new(source),
        }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        DomainError::Communication {
            message: message.into(),
            cause: None,
        }
    }

    /// Wraps `cause` (if any) as the root cause of a communication failure.
    pub fn communication_caused_by(message: impl Into<String>, cause: Option<DomainError>) -> Self {
        DomainError::Communication {
            message: message.into(),
            cause: cause.map(Box::new),
        }
    }

    pub fn is_name_not_found(&self) -> bool {
        matches!(self, DomainError::NameNotFound(_))
    }

    /// Errors that describe what a name server said, as opposed to a failure
    /// to talk to it.
    pub fn is_naming(&self) -> bool {
        match self {
            DomainError::FormatError { .. }
            | DomainError::ServiceUnavailable { .. }
            | DomainError::NameNotFound(_)
            | DomainError::OperationNotSupported { .. }
            | DomainError::NotAuthoritative { .. } => true,
            DomainError::ConfigError(_)
            | DomainError::InvalidDomainName(_)
            | DomainError::PacketOverflow { .. }
            | DomainError::MalformedMessage(_)
            | DomainError::Transport { .. }
            | DomainError::TransportTimeout { .. }
            | DomainError::Communication { .. }
            | DomainError::ClientClosed => false,
        }
    }

    /// A connected UDP socket reports ICMP port unreachable as a refused
    /// connection on the next receive.
    pub fn is_port_unreachable(&self) -> bool {
        match self {
            DomainError::Transport { source, .. } => {
                source.kind() == std::io::ErrorKind::ConnectionRefused
            }
            _ => false,
        }
    }

    pub fn rcode(&self) -> Option<u8> {
        match self {
            DomainError::FormatError { rcode, .. }
            | DomainError::ServiceUnavailable { rcode, .. }
            | DomainError::OperationNotSupported { rcode, .. } => Some(*rcode),
            DomainError::NameNotFound(_) => Some(3),
            _ => None,
        }
    }
}
