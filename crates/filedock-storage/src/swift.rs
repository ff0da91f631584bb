//! OpenStack Swift object storage handler
//!
//! Authenticates against Keystone v3 with password credentials scoped to a
//! project, then talks to the public `object-store` endpoint of the
//! configured region. Objects live at `/{container}/{storage name}`.

use crate::names::{generate_storage_name, validate_storage_name};
use crate::traits::{StorageError, StorageHandler, StorageResult};
use crate::{HandlerOptions, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use filedock_core::constants::DEFAULT_SWIFT_AUTH_URL;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;
use std::time::Duration;

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const OBJECT_STORE_SERVICE: &str = "object-store";
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Swift storage handler
///
/// Configuration is validated on every call so a misconfigured handler can
/// still be constructed; each operation then fails with a configuration
/// error naming every missing field.
#[derive(Clone)]
pub struct SwiftStorage {
    http_client: Client,
    options: HandlerOptions,
}

impl Debug for SwiftStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SwiftStorage")
            .field("container", &self.options.swift_container)
            .field("region", &self.options.swift_region)
            .finish()
    }
}

/// Validated connection settings borrowed from the handler options.
struct SwiftSettings<'a> {
    username: &'a str,
    password: &'a str,
    tenant_id: &'a str,
    region: &'a str,
    container: &'a str,
    auth_url: &'a str,
}

/// Token and object-store endpoint of one authenticated session.
struct SwiftSession {
    token: String,
    endpoint: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Deserialize)]
struct CatalogEndpoint {
    interface: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    region_id: Option<String>,
    url: String,
}

impl CatalogEndpoint {
    fn serves(&self, region: &str) -> bool {
        self.interface == "public"
            && (self.region.as_deref() == Some(region) || self.region_id.as_deref() == Some(region))
    }
}

impl SwiftStorage {
    /// Create a new SwiftStorage instance from the handler options.
    ///
    /// Only the HTTP client is built here; credentials are checked when an
    /// operation runs.
    pub fn new(options: HandlerOptions) -> StorageResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(SwiftStorage {
            http_client,
            options,
        })
    }

    fn settings(&self) -> StorageResult<SwiftSettings<'_>> {
        let options = &self.options;
        let required = [
            ("swiftUsername", options.swift_username.as_deref()),
            ("swiftPassword", options.swift_password.as_deref()),
            ("swiftTenantId", options.swift_tenant_id.as_deref()),
            ("swiftRegion", options.swift_region.as_deref()),
            ("swiftContainer", options.swift_container.as_deref()),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            tracing::error!(missing = ?missing, "Swift storage handler is not configured");
            return Err(StorageError::ConfigError(format!(
                "Missing configuration parameters: {}",
                missing.join(", ")
            )));
        }

        Ok(SwiftSettings {
            username: options.swift_username.as_deref().unwrap_or_default(),
            password: options.swift_password.as_deref().unwrap_or_default(),
            tenant_id: options.swift_tenant_id.as_deref().unwrap_or_default(),
            region: options.swift_region.as_deref().unwrap_or_default(),
            container: options.swift_container.as_deref().unwrap_or_default(),
            auth_url: options
                .swift_auth_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(DEFAULT_SWIFT_AUTH_URL),
        })
    }

    /// Open a session: request a project-scoped token and resolve the
    /// object-store endpoint for the configured region.
    async fn authenticate(&self, settings: &SwiftSettings<'_>) -> Result<SwiftSession, String> {
        let url = format!("{}/auth/tokens", settings.auth_url.trim_end_matches('/'));
        let body = json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": settings.username,
                            "domain": { "id": "default" },
                            "password": settings.password,
                        }
                    }
                },
                "scope": {
                    "project": { "id": settings.tenant_id }
                }
            }
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Swift authentication request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!(
                "Swift authentication failed: {} - {}",
                status, error_text
            ));
        }

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| "Swift authentication response carries no token".to_string())?;

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Swift token response: {}", e))?;

        let endpoint = token_response
            .token
            .catalog
            .iter()
            .filter(|entry| entry.service_type == OBJECT_STORE_SERVICE)
            .flat_map(|entry| entry.endpoints.iter())
            .find(|endpoint| endpoint.serves(settings.region))
            .map(|endpoint| endpoint.url.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                format!(
                    "No public object-store endpoint for region {}",
                    settings.region
                )
            })?;

        Ok(SwiftSession { token, endpoint })
    }

    fn object_url(session: &SwiftSession, container: &str, storage_name: &str) -> String {
        format!("{}/{}/{}", session.endpoint, container, storage_name)
    }
}

#[async_trait]
impl StorageHandler for SwiftStorage {
    async fn store(&self, source: &Path) -> StorageResult<String> {
        let settings = self.settings()?;

        let data = tokio::fs::read(source).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to read {}: {}", source.display(), e))
        })?;
        let size = data.len();

        let start = std::time::Instant::now();
        let session = self
            .authenticate(&settings)
            .await
            .map_err(StorageError::WriteFailed)?;

        let storage_name = generate_storage_name();
        let url = Self::object_url(&session, settings.container, &storage_name);

        let response = self
            .http_client
            .put(&url)
            .header(AUTH_TOKEN_HEADER, &session.token)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Swift upload request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StorageError::WriteFailed(format!(
                "Swift upload failed: {} - {}",
                status, error_text
            )));
        }

        tracing::info!(
            container = %settings.container,
            storage_name = %storage_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Swift store successful"
        );

        Ok(storage_name)
    }

    async fn fetch(&self, storage_name: &str) -> StorageResult<Bytes> {
        let settings = self.settings()?;
        validate_storage_name(storage_name)?;

        let start = std::time::Instant::now();
        let session = self
            .authenticate(&settings)
            .await
            .map_err(StorageError::ReadFailed)?;
        let url = Self::object_url(&session, settings.container, storage_name);

        let response = self
            .http_client
            .get(&url)
            .header(AUTH_TOKEN_HEADER, &session.token)
            .send()
            .await
            .map_err(|e| StorageError::ReadFailed(format!("Swift download request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(storage_name.to_string()));
        }
        if !status.is_success() {
            return Err(StorageError::ReadFailed(format!(
                "Swift download failed: {}",
                status
            )));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| StorageError::ReadFailed(format!("Failed to read Swift object: {}", e)))?;

        tracing::info!(
            container = %settings.container,
            storage_name = %storage_name,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Swift fetch successful"
        );

        Ok(data)
    }

    async fn delete(&self, storage_name: &str) -> StorageResult<()> {
        let settings = self.settings()?;
        validate_storage_name(storage_name)?;

        let session = self
            .authenticate(&settings)
            .await
            .map_err(StorageError::DeleteFailed)?;
        let url = Self::object_url(&session, settings.container, storage_name);

        let response = self
            .http_client
            .delete(&url)
            .header(AUTH_TOKEN_HEADER, &session.token)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(format!("Swift delete request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(storage_name.to_string()));
        }
        if !status.is_success() {
            return Err(StorageError::DeleteFailed(format!(
                "Swift delete failed: {}",
                status
            )));
        }

        tracing::info!(
            container = %settings.container,
            storage_name = %storage_name,
            "Swift delete successful"
        );

        Ok(())
    }

    fn consumes_source(&self) -> bool {
        false
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Swift
    }
}
