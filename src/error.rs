use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::models::RecordType;

/// Errors returned while loading a configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document could not be opened or decoded
    #[error("Failed to load config file {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// A record or nameserver violated a rule; only the first violation is reported
    #[error("Invalid config: {0}")]
    Validation(#[from] ValidationError),

    /// The domain name pattern did not compile
    #[error("Domain name pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// Underlying cause of a failed decode.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed but a field has the wrong type
    #[error("document does not match the configuration layout: {0}")]
    Shape(#[source] serde_json::Error),
}

/// A rule violated by a local record or an upstream nameserver.
///
/// Local record variants carry the record's position in `LocalRecords`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name for LocalRecord at index {index} is invalid, should follow pattern domain.name.: {name:?}")]
    RecordName { index: usize, name: String },

    #[error("Type for LocalRecord at index {index} is invalid: {found:?} (expected one of A, AAAA, CNAME)")]
    RecordType { index: usize, found: String },

    #[error("TTL for LocalRecord at index {index} is invalid: must be greater than 0")]
    RecordTtl { index: usize },

    #[error("Target for LocalRecord at index {index} is invalid for type {record_type}: {target:?}")]
    RecordTarget {
        index: usize,
        record_type: RecordType,
        target: String,
    },

    #[error("{role} upstream nameserver is invalid: {source}")]
    Nameserver {
        role: NameserverRole,
        #[source]
        source: NameserverError,
    },
}

impl ValidationError {
    /// Position of the offending local record, if the error concerns one.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            ValidationError::RecordName { index, .. }
            | ValidationError::RecordType { index, .. }
            | ValidationError::RecordTtl { index }
            | ValidationError::RecordTarget { index, .. } => Some(*index),
            ValidationError::Nameserver { .. } => None,
        }
    }
}

/// Failure of a single upstream endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameserverError {
    #[error("IPv4 OR IPv6 of upstream nameserver must be provided")]
    MissingAddress,

    #[error("{family} of upstream nameserver is invalid: {value:?}")]
    InvalidAddress {
        family: AddressFamily,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameserverRole {
    Primary,
    Secondary,
}

impl fmt::Display for NameserverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameserverRole::Primary => write!(f, "Primary"),
            NameserverRole::Secondary => write!(f, "Secondary"),
        }
    }
}

/// Which address field of a nameserver an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
