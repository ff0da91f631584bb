//! Named defaults used when an option is not configured.

/// Collection name used when none is configured.
pub const DEFAULT_COLLECTION: &str = "uploads";

/// Multipart field expected to carry the uploaded file.
pub const DEFAULT_FILE_FIELD: &str = "file";

/// Collection the `ownerId` of a record refers to.
pub const DEFAULT_OWNER_COLLECTION: &str = "accounts";

/// Cache directive attached to every binary response.
pub const CACHE_CONTROL: &str = "max-age=86400";

/// Keystone v3 endpoint used by the Swift handler when none is configured.
pub const DEFAULT_SWIFT_AUTH_URL: &str = "https://auth.cloud.ovh.net/v3";

/// Name template used for a variant when its size specification has none.
pub const DEFAULT_NAME_FORMAT: &str = "{{name}}";
