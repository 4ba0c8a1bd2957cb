use log::{debug, error};
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::models::{LocalDnsRecord, Nameserver, RecordType, DEFAULT_PORT};
use crate::error::{AddressFamily, ConfigError, NameserverError, NameserverRole, ValidationError};

/// Dot-terminated labels, at least two. Labels are 1-63 alphanumerics or
/// hyphens and may not begin or end with a hyphen.
pub const FQDN_PATTERN: &str =
    r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.$";

/// 253 octets of name plus the trailing dot.
const MAX_NAME_LENGTH: usize = 254;

/// Validates local records against the domain name grammar and the
/// per-type target rules.
#[derive(Debug, Clone)]
pub struct RecordValidator {
    fqdn: Regex,
}

impl RecordValidator {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_pattern(FQDN_PATTERN)
    }

    pub(crate) fn with_pattern(pattern: &str) -> Result<Self, ConfigError> {
        let fqdn = Regex::new(pattern).map_err(|e| {
            error!("Domain name pattern failed to compile: {}", e);
            ConfigError::Pattern(e)
        })?;
        Ok(Self { fqdn })
    }

    pub fn is_valid_name(&self, name: &str) -> bool {
        name.len() <= MAX_NAME_LENGTH && self.fqdn.is_match(name)
    }

    /// Checks `target` against the rule for `record_type`.
    ///
    /// CNAME targets must also contain no two identical adjacent
    /// characters. This is a rough filter, not real CNAME syntax: it rejects
    /// perfectly good names such as `www.example.com.`. Unknown types never
    /// validate.
    pub fn is_valid_target(&self, record_type: &str, target: &str) -> bool {
        match record_type.parse::<RecordType>() {
            Ok(RecordType::A) => target.parse::<Ipv4Addr>().is_ok(),
            Ok(RecordType::Aaaa) => target.parse::<Ipv6Addr>().is_ok(),
            Ok(RecordType::Cname) => self.is_valid_name(target) && !has_adjacent_repeat(target),
            Err(_) => false,
        }
    }

    /// Applies the record rules in order: name, type, TTL, target.
    pub fn validate_record(
        &self,
        index: usize,
        record: &LocalDnsRecord,
    ) -> Result<(), ValidationError> {
        if !self.is_valid_name(&record.name) {
            return Err(ValidationError::RecordName {
                index,
                name: record.name.clone(),
            });
        }

        let record_type = record
            .record_type()
            .ok_or_else(|| ValidationError::RecordType {
                index,
                found: record.record_type.clone(),
            })?;

        if record.ttl == 0 {
            return Err(ValidationError::RecordTtl { index });
        }

        if !self.is_valid_target(&record.record_type, &record.target) {
            return Err(ValidationError::RecordTarget {
                index,
                record_type,
                target: record.target.clone(),
            });
        }

        Ok(())
    }
}

fn has_adjacent_repeat(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).any(|pair| pair[0] == pair[1])
}

/// Validates a single upstream endpoint and fills its port with 53 when it
/// is zero.
///
/// At least one of the two address fields must be set, and each one that is
/// set must be an IP literal of either family. The port is only filled in
/// once the addresses pass, so calling this again on a normalized endpoint
/// changes nothing. `role` names the endpoint in the returned error.
pub fn validate_nameserver(
    role: NameserverRole,
    ns: &mut Nameserver,
) -> Result<(), ValidationError> {
    check_addresses(ns).map_err(|source| ValidationError::Nameserver { role, source })?;

    if ns.port == 0 {
        debug!("{} nameserver port omitted, using {}", role, DEFAULT_PORT);
        ns.port = DEFAULT_PORT;
    }

    Ok(())
}

fn check_addresses(ns: &Nameserver) -> Result<(), NameserverError> {
    if ns.ipv4().is_none() && ns.ipv6().is_none() {
        return Err(NameserverError::MissingAddress);
    }

    for (family, value) in [(AddressFamily::V4, ns.ipv4()), (AddressFamily::V6, ns.ipv6())] {
        if let Some(value) = value {
            if value.parse::<IpAddr>().is_err() {
                return Err(NameserverError::InvalidAddress {
                    family,
                    value: value.to_string(),
                });
            }
        }
    }

    Ok(())
}
