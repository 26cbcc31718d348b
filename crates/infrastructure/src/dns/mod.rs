pub mod client;
pub mod message_builder;
pub mod transport;

pub use client::{DnsClient, XidGenerator};
pub use message_builder::MessageBuilder;
