//! Non-critical cleanup of transient files
//!
//! Failures are logged and never returned: a leaked temp file must not
//! mask the outcome of the operation that produced it.

use crate::generator::VariantCleanup;
use std::io::ErrorKind;
use std::path::Path;

/// Remove a transient file. A file that is already gone is not an error.
pub async fn remove_transient_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Transient file removed"),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Transient file already gone")
        }
        Err(e) => tracing::warn!(
            error = %e,
            path = %path.display(),
            "Unable to remove transient file"
        ),
    }
}

/// Run a generator cleanup off the async workers.
pub async fn run_generator_cleanup(cleanup: VariantCleanup) {
    if let Err(e) = tokio::task::spawn_blocking(move || cleanup.run()).await {
        tracing::warn!(error = %e, "Generator cleanup task failed");
    }
}
