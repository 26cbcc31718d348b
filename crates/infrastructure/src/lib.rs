//! Ferrous Query Infrastructure Layer
//!
//! Network side of the DNS client: the shared UDP socket, TCP framing and
//! the query engine built on top of them.
pub mod dns;

pub use dns::{DnsClient, XidGenerator};
