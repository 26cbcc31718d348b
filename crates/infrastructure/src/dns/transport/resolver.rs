use ferrous_query_domain::{DomainError, ServerAddr};
use std::net::SocketAddr;
use tracing::debug;

/// Turns a configured server into the socket address queries are sent to.
///
/// IP literals are used as-is. Host names go through the system resolver
/// once and the first address returned is kept.
pub async fn resolve_server(server: &ServerAddr) -> Result<SocketAddr, DomainError> {
    if let Some(addr) = server.socket_addr() {
        return Ok(addr);
    }

    let target = (server.host(), server.port());
    let mut addrs = tokio::net::lookup_host(target)
        .await
        .map_err(|e| DomainError::ConfigError(format!("Unknown DNS server: {} ({})", server, e)))?;

    let addr = addrs
        .next()
        .ok_or_else(|| DomainError::ConfigError(format!("Unknown DNS server: {}", server)))?;

    debug!(server = %server, resolved = %addr, "Resolved DNS server host name");
    Ok(addr)
}
