//! Startup configuration for a DNS forwarder that answers a fixed set of
//! local records and sends every other query to one of two upstream
//! resolvers.
//!
//! [`load_config`] decodes a JSON or YAML document, validates every local
//! record and both upstream nameservers, and fills defaults for omitted
//! ports and the upstream timeout.

pub mod config;
pub mod error;


pub use config::models::{Configuration, LocalDnsRecord, Nameserver, RecordType, UpstreamNameservers};
pub use config::{load_config, parse_config, validate_nameserver, DocumentFormat, RecordValidator};
pub use error::{AddressFamily, ConfigError, LoadError, NameserverError, NameserverRole, ValidationError};
