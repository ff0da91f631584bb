//! HTTP adapter constants

/// Room left for multipart boundaries and part headers on top of the
/// configured maximum file size.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Route segment under which stored binaries are served.
pub const BINARY_SEGMENT: &str = "binary";

/// Where the OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Liveness probe route.
pub const HEALTH_PATH: &str = "/health";
