//! Ferrous Query Domain Layer
//!
//! Wire-format building blocks of the DNS client: packets, headers, names,
//! records, server addresses, configuration and the error taxonomy.
pub mod config;
pub mod dns_name;
pub mod dns_record;
pub mod errors;
pub mod header;
pub mod packet;
pub mod rcode;
pub mod server_addr;

pub use config::{Config, ResolverConfig};
pub use dns_name::DnsName;
pub use dns_record::{Question, RecordClass, RecordType, ResourceRecord, ResourceRecords};
pub use errors::DomainError;
pub use header::{Header, HEADER_SIZE};
pub use packet::Packet;
pub use rcode::ResponseCode;
pub use server_addr::{ServerAddr, DEFAULT_DNS_PORT};
