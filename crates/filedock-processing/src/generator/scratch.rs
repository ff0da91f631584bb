//! Per-call scratch directories shared by the generators.

use super::traits::VariantCleanup;
use std::io;
use tempfile::TempDir;
use uuid::Uuid;

/// A fresh directory for one generation call.
pub(crate) fn scratch_dir(prefix: &str) -> io::Result<TempDir> {
    tempfile::Builder::new().prefix(prefix).tempdir()
}

/// Unique file name inside a scratch directory.
pub(crate) fn scratch_file_name() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Cleanup removing the scratch directory and whatever is left in it.
pub(crate) fn scratch_cleanup(dir: TempDir) -> VariantCleanup {
    VariantCleanup::new(move || {
        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "Generator scratch directory removed"),
            Err(e) => tracing::warn!(
                error = %e,
                path = %path.display(),
                "Unable to remove generator scratch directory"
            ),
        }
    })
}
