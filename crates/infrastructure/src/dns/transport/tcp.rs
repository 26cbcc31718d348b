//! TCP transport for DNS (RFC 1035 §4.2.2)
//!
//! Every message in either direction is preceded by a two-byte big-endian
//! length. A connection carries one exchange: a single query and either one
//! response or, for zone transfers, a stream of responses.

use bytes::Bytes;
use ferrous_query_domain::DomainError;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

/// One stream connection to a single name server.
///
/// Dropping the connection releases the socket; [`TcpConnection::close`]
/// additionally sends a FIN first.
pub struct TcpConnection {
    server: SocketAddr,
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    io_timeout: Option<Duration>,
}

impl TcpConnection {
    pub async fn connect(
        server: SocketAddr,
        io_timeout: Option<Duration>,
    ) -> Result<Self, DomainError> {
        let stream = with_deadline(server, io_timeout, TcpStream::connect(server)).await?;
        stream
            .set_nodelay(true)
            .map_err(|e| DomainError::transport(server, e))?;

        debug!(server = %server, "TCP connection established");

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            server,
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            io_timeout,
        })
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    pub async fn send(&mut self, message: &[u8]) -> Result<(), DomainError> {
        with_deadline(
            self.server,
            self.io_timeout,
            write_framed(&mut self.writer, message),
        )
        .await
    }

    /// Reads the next framed message. `None` means the peer closed the
    /// connection cleanly before sending another length prefix.
    pub async fn receive(&mut self) -> Result<Option<Bytes>, DomainError> {
        let msg = with_deadline(self.server, self.io_timeout, read_framed(&mut self.reader)).await?;
        Ok(msg.map(Bytes::from))
    }

    /// Sends `message` and reads back exactly one response.
    pub async fn exchange(&mut self, message: &[u8]) -> Result<Bytes, DomainError> {
        self.send(message).await?;
        debug!(server = %self.server, message_len = message.len(), "TCP query sent");

        let response = self.receive().await?.ok_or_else(|| {
            DomainError::transport(
                self.server,
                io::Error::new(io::ErrorKind::UnexpectedEof, "DNS error: no response"),
            )
        })?;

        debug!(server = %self.server, response_len = response.len(), "TCP response received");
        Ok(response)
    }

    pub async fn close(mut self) {
        if let Err(e) = self.writer.shutdown().await {
            debug!(server = %self.server, error = %e, "TCP shutdown failed");
        }
    }
}

async fn with_deadline<T, F>(
    server: SocketAddr,
    deadline: Option<Duration>,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = io::Result<T>>,
{
    let result = match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })?,
        None => fut.await,
    };
    result.map_err(|e| DomainError::transport(server, e))
}

pub(crate) async fn write_framed<S>(stream: &mut S, message: &[u8]) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    if message.len() > MAX_TCP_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("DNS message too large: {} bytes", message.len()),
        ));
    }

    let length_bytes = (message.len() as u16).to_be_bytes();
    stream.write_all(&length_bytes).await?;
    stream.write_all(message).await?;
    stream.flush().await
}

pub(crate) async fn read_framed<S>(stream: &mut S) -> io::Result<Option<Vec<u8>>>
where
    S: AsyncRead + Unpin,
{
    let mut len_hi = [0u8; 1];
    if stream.read(&mut len_hi).await? == 0 {
        return Ok(None);
    }

    let len_lo = stream.read_u8().await.map_err(|e| corrupted(e, "bad length"))?;
    let len = u16::from_be_bytes([len_hi[0], len_lo]) as usize;

    let mut msg = vec![0u8; len];
    stream
        .read_exact(&mut msg)
        .await
        .map_err(|e| corrupted(e, "too little data"))?;

    Ok(Some(msg))
}

fn corrupted(err: io::Error, what: &str) -> io::Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Corrupted DNS response: {}", what),
        )
    } else {
        err
    }
}
