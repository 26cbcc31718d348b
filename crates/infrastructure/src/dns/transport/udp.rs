//! UDP transport for DNS queries (RFC 1035 §4.2.1)
//!
//! One socket per address family is shared by every query of a client.
//! A [`UdpSession`] holds the socket lock for one whole attempt: connect to
//! the target server, send, then read datagrams until one is accepted or
//! the attempt window closes. Datagrams addressed to other outstanding
//! queries are handed to the caller's callback, which decides what to do
//! with them.

use bytes::Bytes;
use ferrous_query_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::debug;

/// Maximum UDP DNS response size accepted
const MAX_UDP_RESPONSE_SIZE: usize = 8192;

/// The receive loop keeps going only while more than this is left of the
/// attempt window.
pub const MIN_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Default)]
struct Sockets {
    v4: Option<UdpSocket>,
    v6: Option<UdpSocket>,
}

/// The UDP socket(s) owned by one client for its whole lifetime.
#[derive(Default)]
pub struct SharedUdpSocket {
    sockets: Mutex<Sockets>,
    closed: AtomicBool,
}

impl SharedUdpSocket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of the socket.
    pub async fn lock(&self) -> Result<UdpSession<'_>, DomainError> {
        if self.is_closed() {
            return Err(DomainError::ClientClosed);
        }
        let sockets = self.sockets.lock().await;
        if self.is_closed() {
            return Err(DomainError::ClientClosed);
        }
        Ok(UdpSession {
            sockets,
            closed: &self.closed,
        })
    }

    /// Releases the sockets. Idempotent. When a session is in flight the
    /// sockets are released as soon as it ends.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Ok(mut sockets) = self.sockets.try_lock() {
            *sockets = Sockets::default();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Exclusive use of the shared socket for one UDP round trip.
pub struct UdpSession<'a> {
    sockets: MutexGuard<'a, Sockets>,
    closed: &'a AtomicBool,
}

impl UdpSession<'_> {
    fn socket_for(&mut self, server: SocketAddr) -> Result<&UdpSocket, DomainError> {
        let slot = if server.is_ipv4() {
            &mut self.sockets.v4
        } else {
            &mut self.sockets.v6
        };

        if slot.is_none() {
            let socket = create_socket(server).map_err(|e| DomainError::transport(server, e))?;
            debug!(server = %server, "Created shared UDP socket");
            *slot = Some(socket);
        }

        slot.as_ref().ok_or(DomainError::ClientClosed)
    }

    /// Sends `packet` to `server` and reads datagrams for up to `window`.
    ///
    /// `on_datagram` sees every datagram received; returning `Ok(true)`
    /// accepts it and ends the exchange, `Ok(false)` keeps reading, and an
    /// error aborts the exchange. `Ok(None)` means the window closed without
    /// an accepted datagram.
    pub async fn exchange<F>(
        &mut self,
        server: SocketAddr,
        packet: &[u8],
        window: Duration,
        mut on_datagram: F,
    ) -> Result<Option<Bytes>, DomainError>
    where
        F: FnMut(&[u8]) -> Result<bool, DomainError>,
    {
        let socket = self.socket_for(server)?;

        // Re-targets the association; a previous peer is no longer accepted.
        // The socket stays connected after the attempt until the next connect.
        socket
            .connect(server)
            .await
            .map_err(|e| DomainError::transport(server, e))?;
        socket
            .send(packet)
            .await
            .map_err(|e| DomainError::transport(server, e))?;

        debug!(
            server = %server,
            bytes_sent = packet.len(),
            window_ms = window.as_millis() as u64,
            "UDP query sent"
        );

        let deadline = Instant::now() + window;
        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let mut first_read = true;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !first_read && remaining <= MIN_TIMEOUT {
                return Ok(None);
            }
            first_read = false;

            let len = match tokio::time::timeout(remaining, socket.recv(&mut buf)).await {
                Err(_) => return Ok(None),
                Ok(result) => result.map_err(|e| DomainError::transport(server, e))?,
            };

            debug!(server = %server, bytes_received = len, "UDP datagram received");

            if on_datagram(&buf[..len])? {
                return Ok(Some(Bytes::copy_from_slice(&buf[..len])));
            }
        }
    }
}

impl Drop for UdpSession<'_> {
    fn drop(&mut self) {
        if self.closed.load(Ordering::Acquire) {
            *self.sockets = Sockets::default();
        }
    }
}

fn create_socket(server: SocketAddr) -> Result<UdpSocket, std::io::Error> {
    use socket2::{Domain, Protocol, Socket, Type};

    let (domain, bind_addr) = if server.is_ipv4() {
        (
            Domain::IPV4,
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        )
    } else {
        (
            Domain::IPV6,
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        )
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_recv_buffer_size(256 * 1024)?;
    socket.bind(&bind_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}
