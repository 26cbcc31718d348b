#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinHandle;

/// Maps one request to the messages sent back for it. An empty list means
/// the server stays silent.
pub type Handler = Arc<dyn Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync>;

/// A name server on 127.0.0.1 answering over UDP, TCP, or both on the same
/// port. Every request is recorded.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_requests: Arc<Mutex<Vec<Vec<u8>>>>,
    tcp_requests: Arc<Mutex<Vec<Vec<u8>>>>,
    tasks: Vec<JoinHandle<()>>,
}

impl MockDnsServer {
    pub async fn udp<F>(handler: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        Self::start(Some((Arc::new(handler), Duration::ZERO)), None).await
    }

    /// Like [`MockDnsServer::udp`] but every reply leaves `delay` after the
    /// request arrived.
    pub async fn udp_delayed<F>(delay: Duration, handler: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        Self::start(Some((Arc::new(handler), delay)), None).await
    }

    pub async fn silent() -> Self {
        Self::udp(|_| Vec::new()).await
    }

    pub async fn tcp<G>(handler: G) -> Self
    where
        G: Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        Self::start(None, Some(Arc::new(handler))).await
    }

    pub async fn udp_and_tcp<F, G>(udp: F, tcp: G) -> Self
    where
        F: Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync + 'static,
        G: Fn(&[u8]) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        Self::start(Some((Arc::new(udp), Duration::ZERO)), Some(Arc::new(tcp))).await
    }

    async fn start(udp: Option<(Handler, Duration)>, tcp: Option<Handler>) -> Self {
        let udp_requests = Arc::new(Mutex::new(Vec::new()));
        let tcp_requests = Arc::new(Mutex::new(Vec::new()));
        let mut tasks = Vec::new();

        let mut addr = SocketAddr::from(([127, 0, 0, 1], 0));

        if let Some((handler, delay)) = udp {
            let socket = UdpSocket::bind(addr).await.expect("bind mock UDP");
            addr = socket.local_addr().expect("mock UDP address");
            tasks.push(tokio::spawn(serve_udp(
                Arc::new(socket),
                handler,
                delay,
                Arc::clone(&udp_requests),
            )));
        }

        if let Some(handler) = tcp {
            let listener = TcpListener::bind(addr).await.expect("bind mock TCP");
            addr = listener.local_addr().expect("mock TCP address");
            tasks.push(tokio::spawn(serve_tcp(
                listener,
                handler,
                Arc::clone(&tcp_requests),
            )));
        }

        Self {
            addr,
            udp_requests,
            tcp_requests,
            tasks,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_requests(&self) -> Vec<Vec<u8>> {
        self.udp_requests.lock().unwrap().clone()
    }

    pub fn tcp_requests(&self) -> Vec<Vec<u8>> {
        self.tcp_requests.lock().unwrap().clone()
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn serve_udp(
    socket: Arc<UdpSocket>,
    handler: Handler,
    delay: Duration,
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
) {
    let mut buf = vec![0u8; 4096];
    loop {
        let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
            continue;
        };
        let request = buf[..len].to_vec();
        requests.lock().unwrap().push(request.clone());

        let replies = handler(&request);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            for reply in replies {
                let _ = socket.send_to(&reply, peer).await;
            }
        });
    }
}

async fn serve_tcp(listener: TcpListener, handler: Handler, requests: Arc<Mutex<Vec<Vec<u8>>>>) {
    loop {
        let Ok((stream, _)) = listener.accept().await else {
            continue;
        };
        let handler = Arc::clone(&handler);
        let requests = Arc::clone(&requests);
        tokio::spawn(async move {
            let _ = answer_tcp(stream, handler, requests).await;
        });
    }
}

async fn answer_tcp(
    mut stream: TcpStream,
    handler: Handler,
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
) -> std::io::Result<()> {
    let len = stream.read_u16().await? as usize;
    let mut request = vec![0u8; len];
    stream.read_exact(&mut request).await?;
    requests.lock().unwrap().push(request.clone());

    for reply in handler(&request) {
        stream.write_u16(reply.len() as u16).await?;
        stream.write_all(&reply).await?;
    }
    stream.flush().await?;
    stream.shutdown().await
}

/// An address on which nothing listens, so datagrams sent there bounce
/// with ICMP port unreachable.
pub async fn closed_udp_port() -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind probe");
    socket.local_addr().expect("probe address")
}
