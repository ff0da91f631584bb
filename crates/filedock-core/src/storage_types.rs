use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

/// Storage handler selection
///
/// Defined in core because it is used by configuration and by every
/// crate that needs to pick a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    Swift,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "swift" | "ovh" => Ok(StorageBackend::Swift),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Swift => write!(f, "swift"),
        }
    }
}

/// Backend-specific configuration handed to a storage handler.
///
/// Every field is optional here; each handler decides which ones it
/// requires and how it reacts when they are missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlerOptions {
    /// Root directory of the local filesystem handler.
    pub storage_path: Option<PathBuf>,
    pub swift_username: Option<String>,
    #[serde(skip_serializing)]
    pub swift_password: Option<String>,
    pub swift_tenant_id: Option<String>,
    pub swift_region: Option<String>,
    pub swift_container: Option<String>,
    /// Keystone v3 base URL, defaults to the OVH public cloud endpoint.
    pub swift_auth_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("local".parse::<StorageBackend>().unwrap(), StorageBackend::Local);
        assert_eq!("SWIFT".parse::<StorageBackend>().unwrap(), StorageBackend::Swift);
        assert_eq!("ovh".parse::<StorageBackend>().unwrap(), StorageBackend::Swift);
        assert!("s3".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_handler_options_camel_case() {
        let options: HandlerOptions = serde_json::from_str(
            r#"{"storagePath": "/var/files", "swiftContainer": "media"}"#,
        )
        .unwrap();
        assert_eq!(options.storage_path, Some(PathBuf::from("/var/files")));
        assert_eq!(options.swift_container.as_deref(), Some("media"));
        assert!(options.swift_username.is_none());
    }
}
