use crate::errors::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// A configured name server: `host[:port]`, with IPv6 literals optionally
/// bracketed (`[::1]:5353`). The port defaults to 53.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddr {
    host: Arc<str>,
    port: u16,
}

impl ServerAddr {
    pub fn new(host: impl Into<Arc<str>>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The socket address when the host is an IP literal; host names need
    /// resolving first.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.host
            .parse::<IpAddr>()
            .ok()
            .map(|ip| SocketAddr::new(ip, self.port))
    }

    pub fn needs_resolution(&self) -> bool {
        self.socket_addr().is_none()
    }
}

fn parse_port(s: &str, original: &str) -> Result<u16, DomainError> {
    s.parse::<u16>().map_err(|e| {
        DomainError::ConfigError(format!("Invalid port in DNS server '{}': {}", original, e))
    })
}

impl FromStr for ServerAddr {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            let end = rest.find(']').ok_or_else(|| {
                DomainError::ConfigError(format!("Unterminated '[' in DNS server '{}'", s))
            })?;
            let host = &rest[..end];
            let port = match &rest[end + 1..] {
                "" => DEFAULT_DNS_PORT,
                tail => {
                    let port_str = tail.strip_prefix(':').ok_or_else(|| {
                        DomainError::ConfigError(format!("Malformed DNS server '{}'", s))
                    })?;
                    parse_port(port_str, s)?
                }
            };
            (host, port)
        } else if s.matches(':').count() > 1 {
            // bare IPv6 literal, no port
            (s, DEFAULT_DNS_PORT)
        } else if let Some((host, port_str)) = s.rsplit_once(':') {
            (host, parse_port(port_str, s)?)
        } else {
            (s, DEFAULT_DNS_PORT)
        };

        if host.is_empty() {
            return Err(DomainError::ConfigError(format!(
                "Missing host in DNS server '{}'",
                s
            )));
        }

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
