//! DNS client protocol engine
//!
//! A [`DnsClient`] owns one shared UDP socket and the bookkeeping that lets
//! many concurrent queries use it: each UDP round trip holds the socket
//! lock, and a response read by the "wrong" task is handed over to its
//! owner through [`pending::PendingQueries`].

mod pending;
mod query;
mod xid;
mod zone;

pub use pending::{PendingQueries, PendingQuery};
pub use xid::XidGenerator;

use super::transport::{resolve_server, SharedUdpSocket};
use ferrous_query_domain::{DomainError, ResolverConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct DnsClient {
    servers: Vec<SocketAddr>,
    timeout: Duration,
    retries: u32,
    tcp_timeout: Option<Duration>,
    udp: SharedUdpSocket,
    pending: PendingQueries,
    xids: Arc<XidGenerator>,
}

impl DnsClient {
    /// Builds a client for the configured servers. Host names are resolved
    /// here, once.
    pub async fn new(config: &ResolverConfig) -> Result<Self, DomainError> {
        Self::with_xid_generator(config, XidGenerator::shared()).await
    }

    pub async fn with_xid_generator(
        config: &ResolverConfig,
        xids: Arc<XidGenerator>,
    ) -> Result<Self, DomainError> {
        let addrs = config.server_addrs()?;
        if addrs.is_empty() {
            return Err(DomainError::ConfigError(
                "No DNS servers configured".to_string(),
            ));
        }

        let mut servers = Vec::with_capacity(addrs.len());
        for addr in &addrs {
            servers.push(resolve_server(addr).await?);
        }

        debug!(
            servers = servers.len(),
            timeout_ms = config.timeout_ms,
            retries = config.retries,
            "DNS client created"
        );

        Ok(Self {
            servers,
            timeout: config.timeout(),
            retries: config.retries,
            tcp_timeout: config.tcp_timeout(),
            udp: SharedUdpSocket::new(),
            pending: PendingQueries::new(),
            xids,
        })
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    /// Releases the UDP socket and drops every outstanding query and
    /// stashed response. Later calls fail with [`DomainError::ClientClosed`].
    pub fn close(&self) {
        if self.udp.is_closed() {
            return;
        }
        self.udp.close();
        self.pending.clear();
        debug!("DNS client closed");
    }

    pub fn is_closed(&self) -> bool {
        self.udp.is_closed()
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_closed() {
            Err(DomainError::ClientClosed)
        } else {
            Ok(())
        }
    }
}

/// Keeps the first failure, except that an answer from a name server
/// outranks a failure to reach one.
fn capture(caught: &mut Option<DomainError>, err: DomainError) {
    let replace = match caught.as_ref() {
        Some(prev) => err.is_naming() && !prev.is_naming(),
        None => true,
    };
    if replace {
        *caught = Some(err);
    }
}

/// What a caller sees once every server has been tried.
fn into_failure(caught: Option<DomainError>, message: &str) -> DomainError {
    match caught {
        Some(err) if err.is_naming() => err,
        other => DomainError::communication_caused_by(message, other),
    }
}
