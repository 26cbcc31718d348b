use crate::server_addr::ServerAddr;
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inputs of a `DnsClient`: which servers to ask and how patiently.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// `host[:port]` strings, tried in this order.
    #[serde(default)]
    pub servers: Vec<String>,

    /// UDP wait window of the first retry round. Doubles every round.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of UDP retry rounds over the whole server list.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Deadline for TCP connect and each framed read/write. Unset means TCP
    /// exchanges wait as long as the peer keeps the connection open.
    #[serde(default)]
    pub tcp_timeout_ms: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
            tcp_timeout_ms: None,
        }
    }
}

impl ResolverConfig {
    pub fn with_servers<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn tcp_timeout(&self) -> Option<Duration> {
        self.tcp_timeout_ms.map(Duration::from_millis)
    }

    pub fn server_addrs(&self) -> Result<Vec<ServerAddr>, DomainError> {
        self.servers.iter().map(|s| s.parse()).collect()
    }
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_retries() -> u32 {
    4
}
