pub mod models;
pub mod validation;

use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::error::{ConfigError, LoadError, NameserverRole, Result};
use models::{Configuration, DEFAULT_TIMEOUT_MS};
pub use validation::{validate_nameserver, RecordValidator};

/// Encoding of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` and `.yml` files are YAML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Reads, validates and normalizes the configuration at `path`.
///
/// Records are checked in document order, then the primary and secondary
/// nameservers. The first violation aborts the load. On success, omitted
/// nameserver ports are set to 53 and an omitted timeout to 5000 ms.
pub fn load_config(path: impl AsRef<Path>) -> Result<Configuration> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path);
    debug!("Loading {:?} config from {}", format, path.display());

    let config = decode_file(path, format).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(config)
}

/// Runs an in-memory document through the same pipeline as [`load_config`].
pub fn parse_config(contents: &str, format: DocumentFormat) -> Result<Configuration> {
    let config = match format {
        DocumentFormat::Json => serde_json::from_str(contents).map_err(LoadError::from),
        DocumentFormat::Yaml => serde_yaml::from_str(contents).map_err(LoadError::from),
    }
    .and_then(decode_document)
    .map_err(|source| ConfigError::Load {
        path: "<memory>".into(),
        source,
    })?;

    validate_config(config)
}

fn decode_file(path: &Path, format: DocumentFormat) -> std::result::Result<Configuration, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let document = match format {
        DocumentFormat::Json => serde_json::from_reader(reader)?,
        DocumentFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    decode_document(document)
}

fn decode_document(document: Value) -> std::result::Result<Configuration, LoadError> {
    Configuration::from_document(document).map_err(LoadError::Shape)
}

fn validate_config(mut config: Configuration) -> Result<Configuration> {
    let validator = RecordValidator::new()?;
    for (index, record) in config.local_records.iter().enumerate() {
        validator.validate_record(index, record)?;
    }
    debug!("{} local records passed validation", config.local_records.len());

    let upstream = &mut config.upstream_nameservers;
    validate_nameserver(NameserverRole::Primary, &mut upstream.primary)?;
    validate_nameserver(NameserverRole::Secondary, &mut upstream.secondary)?;

    if upstream.timeout_ms == 0 {
        debug!("Upstream timeout omitted, using {} ms", DEFAULT_TIMEOUT_MS);
        upstream.timeout_ms = DEFAULT_TIMEOUT_MS;
    }

    info!(
        "Loaded {} local records, upstream timeout {} ms",
        config.local_records.len(),
        config.upstream_nameservers.timeout_ms
    );
    Ok(config)
}
