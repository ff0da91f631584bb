use std::path::PathBuf;

/// A derived file produced by a generator, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Caller-chosen id, unique within one generation result.
    pub variant_id: String,
    /// Display name.
    pub name: String,
    pub mimetype: String,
    pub size: u64,
    /// Transient location inside the generator's scratch directory.
    pub path: PathBuf,
}
