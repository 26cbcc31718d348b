pub mod resolver;
pub mod tcp;
pub mod udp;

pub use resolver::resolve_server;
pub use tcp::TcpConnection;
pub use udp::{SharedUdpSocket, UdpSession, MIN_TIMEOUT};
