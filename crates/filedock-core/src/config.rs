//! Configuration module
//!
//! `UploadOptions` carries the per-collection upload policy with named
//! defaults. `Config` is the process configuration read from the
//! environment by the API binary.

use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_COLLECTION, DEFAULT_FILE_FIELD, DEFAULT_OWNER_COLLECTION,
};
use crate::generator_types::{GeneratorKind, GeneratorOptions};
use crate::storage_types::{HandlerOptions, StorageBackend};

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// MIME type allowlist. Empty means every type is accepted.
///
/// Deserializes from either a single string or a list of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcceptList(Vec<String>);

impl AcceptList {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AcceptList(
            types
                .into_iter()
                .map(|t| normalize_mime(&t.into()))
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// No constraint on the MIME type.
    pub fn any() -> Self {
        AcceptList(Vec::new())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.0.is_empty()
    }

    pub fn allows(&self, mimetype: &str) -> bool {
        self.is_unconstrained() || self.0.contains(&normalize_mime(mimetype))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for AcceptList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            None => AcceptList::any(),
            Some(OneOrMany::One(t)) => AcceptList::new([t]),
            Some(OneOrMany::Many(ts)) => AcceptList::new(ts),
        })
    }
}

/// Lowercased MIME essence, parameters (`; charset=...`) dropped.
fn normalize_mime(mimetype: &str) -> String {
    mimetype
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Upload policy for one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadOptions {
    pub collection: String,
    /// Route prefix; derived from the collection when unset.
    pub api_name: Option<String>,
    pub owner_collection: String,
    pub accept: AcceptList,
    pub file_field: String,
    /// Maximum size in bytes; `None` means unconstrained.
    pub max_size: Option<u64>,
    /// Serve binaries as attachments instead of inline.
    pub attachment: bool,
    /// Directory transient uploads are spooled to.
    pub temp_file_dir: Option<PathBuf>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            api_name: None,
            owner_collection: DEFAULT_OWNER_COLLECTION.to_string(),
            accept: AcceptList::any(),
            file_field: DEFAULT_FILE_FIELD.to_string(),
            max_size: None,
            attachment: false,
            temp_file_dir: None,
        }
    }
}

impl UploadOptions {
    /// Route prefix: the configured api name, else the kebab-cased
    /// collection, else the default collection name.
    pub fn api_name(&self) -> String {
        if let Some(name) = self.api_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim_matches('/').to_string();
        }
        let kebab = kebab_case(&self.collection);
        if kebab.is_empty() {
            DEFAULT_COLLECTION.to_string()
        } else {
            kebab
        }
    }

    pub fn temp_file_dir(&self) -> PathBuf {
        self.temp_file_dir
            .clone()
            .unwrap_or_else(|| env::temp_dir().join("filedock"))
    }
}

/// `secondTestTable` -> `second-test-table`, `My_Files` -> `my-files`,
/// `HTTPServer` -> `http-server`.
pub fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = match prev {
            Some(p) => {
                (p.is_lowercase() && c.is_uppercase())
                    // Last capital of an acronym starts the next word
                    || (p.is_uppercase()
                        && c.is_uppercase()
                        && next.is_some_and(|n| n.is_lowercase()))
                    || (p.is_alphabetic() && c.is_numeric())
                    || (p.is_numeric() && c.is_alphabetic())
            }
            None => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

/// Process configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// PostgreSQL URL; the in-memory metadata store is used when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub upload: UploadOptions,
    pub storage_backend: StorageBackend,
    pub handler_options: HandlerOptions,
    pub generator: Option<GeneratorKind>,
    pub generator_options: GeneratorOptions,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(SERVER_PORT);

        let database_url = non_empty_var("DATABASE_URL");

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(MAX_CONNECTIONS);

        let db_timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(CONNECTION_TIMEOUT_SECS);

        let defaults = UploadOptions::default();
        let max_size = match non_empty_var("UPLOAD_MAX_SIZE") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                anyhow::anyhow!("UPLOAD_MAX_SIZE must be a number of bytes: {}", e)
            })?),
            None => None,
        };
        let upload = UploadOptions {
            collection: non_empty_var("UPLOAD_COLLECTION").unwrap_or(defaults.collection),
            api_name: non_empty_var("UPLOAD_API_NAME"),
            owner_collection: non_empty_var("UPLOAD_OWNER_COLLECTION")
                .unwrap_or(defaults.owner_collection),
            accept: non_empty_var("UPLOAD_ACCEPT")
                .map(|s| AcceptList::new(s.split(',').map(str::to_string)))
                .unwrap_or_default(),
            file_field: non_empty_var("UPLOAD_FILE_FIELD").unwrap_or(defaults.file_field),
            max_size,
            attachment: env::var("UPLOAD_ATTACHMENT")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            temp_file_dir: non_empty_var("UPLOAD_TEMP_DIR").map(PathBuf::from),
        };

        let storage_backend = match non_empty_var("STORAGE_BACKEND") {
            Some(s) => s.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let handler_options = HandlerOptions {
            storage_path: non_empty_var("LOCAL_STORAGE_PATH").map(PathBuf::from),
            swift_username: non_empty_var("SWIFT_USERNAME"),
            swift_password: non_empty_var("SWIFT_PASSWORD"),
            swift_tenant_id: non_empty_var("SWIFT_TENANT_ID"),
            swift_region: non_empty_var("SWIFT_REGION"),
            swift_container: non_empty_var("SWIFT_CONTAINER"),
            swift_auth_url: non_empty_var("SWIFT_AUTH_URL"),
        };

        let generator = match non_empty_var("GENERATOR").as_deref() {
            None | Some("none") => None,
            Some(s) => Some(s.parse::<GeneratorKind>()?),
        };

        let generator_options = match non_empty_var("GENERATOR_OPTIONS") {
            Some(raw) => serde_json::from_str::<GeneratorOptions>(&raw)
                .map_err(|e| anyhow::anyhow!("GENERATOR_OPTIONS is not valid JSON: {}", e))?,
            None => GeneratorOptions::default(),
        };

        Ok(Config {
            server_port,
            environment,
            database_url,
            db_max_connections,
            db_timeout_seconds,
            upload,
            storage_backend,
            handler_options,
            generator,
            generator_options,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
