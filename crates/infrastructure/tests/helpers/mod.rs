#![allow(dead_code)]
pub mod builders;
pub mod dns_server_mock;

pub use builders::{asked, resolver_config, soa_rdata, xid_of, ResponseBuilder};
pub use dns_server_mock::{closed_udp_port, MockDnsServer};
