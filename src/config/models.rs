use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 53;
pub const DEFAULT_TIMEOUT_MS: u16 = 5000;

/// The decoded configuration document.
///
/// Field names are matched without regard to case, so the derived
/// `Deserialize` expects keys already lowercased. Decode documents through
/// [`Configuration::from_document`], which does that folding; serialization
/// writes the canonical `LocalRecords`/`UpstreamNameservers` spelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(
        rename(serialize = "LocalRecords", deserialize = "localrecords"),
        alias = "local_records"
    )]
    pub local_records: Vec<LocalDnsRecord>,

    #[serde(
        rename(serialize = "UpstreamNameservers", deserialize = "upstreamnameservers"),
        alias = "upstream_nameservers"
    )]
    pub upstream_nameservers: UpstreamNameservers,
}

impl Configuration {
    /// Decodes a parsed document, matching every field name case-insensitively.
    ///
    /// Unknown fields are ignored and omitted ones take their zero value.
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(fold_keys(document))
    }
}

/// Lowercases every object key. When two keys fold to the same name the
/// later one in the document wins.
fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), fold_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

/// A statically answered DNS entry.
///
/// `record_type` stays a string after decoding so that an unknown type is
/// reported as a validation failure against the record's index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalDnsRecord {
    #[serde(rename(serialize = "Name", deserialize = "name"))]
    pub name: String,

    #[serde(rename(serialize = "Type", deserialize = "type"))]
    pub record_type: String,

    #[serde(rename(serialize = "TTL", deserialize = "ttl"))]
    pub ttl: u32,

    #[serde(rename(serialize = "Target", deserialize = "target"))]
    pub target: String,
}

impl LocalDnsRecord {
    /// The parsed record type, or `None` if it is not a permitted type.
    pub fn record_type(&self) -> Option<RecordType> {
        self.record_type.parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nameserver {
    #[serde(
        rename(serialize = "IPv4", deserialize = "ipv4"),
        skip_serializing_if = "Option::is_none"
    )]
    pub ipv4: Option<String>,

    #[serde(
        rename(serialize = "IPv6", deserialize = "ipv6"),
        skip_serializing_if = "Option::is_none"
    )]
    pub ipv6: Option<String>,

    /// Zero means omitted; filled with 53 once the endpoint validates
    #[serde(rename(serialize = "Port", deserialize = "port"))]
    pub port: u16,
}

impl Nameserver {
    pub fn ipv4(&self) -> Option<&str> {
        self.ipv4.as_deref().filter(|s| !s.is_empty())
    }

    pub fn ipv6(&self) -> Option<&str> {
        self.ipv6.as_deref().filter(|s| !s.is_empty())
    }

    /// Parsed addresses of this endpoint, IPv4 field first.
    pub fn addresses(&self) -> Vec<IpAddr> {
        [self.ipv4(), self.ipv6()]
            .into_iter()
            .flatten()
            .filter_map(|addr| addr.parse().ok())
            .collect()
    }

    pub fn socket_addrs(&self) -> Vec<SocketAddr> {
        self.addresses()
            .into_iter()
            .map(|ip| SocketAddr::new(ip, self.port))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamNameservers {
    #[serde(rename(serialize = "Primary", deserialize = "primary"))]
    pub primary: Nameserver,

    #[serde(rename(serialize = "Secondary", deserialize = "secondary"))]
    pub secondary: Nameserver,

    /// Zero means omitted; filled with 5000 on load
    #[serde(
        rename(serialize = "TimeoutMs", deserialize = "timeoutms"),
        alias = "timeout_ms"
    )]
    pub timeout_ms: u16,
}

impl UpstreamNameservers {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.timeout_ms))
    }
}

/// Record types this service can answer locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [RecordType::A, RecordType::Aaaa, RecordType::Cname];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
        }
    }

    /// TYPE value used on the wire (RFC 1035, RFC 3596).
    pub fn wire_code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Cname => 5,
            RecordType::Aaaa => 28,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecordType(pub String);

impl fmt::Display for UnknownRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record type: {}", self.0)
    }
}

impl std::error::Error for UnknownRecordType {}

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    // Case-sensitive: "a" and "cname" are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownRecordType(s.to_string()))
    }
}
