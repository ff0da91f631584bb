use std::collections::HashMap;
use std::path::PathBuf;

/// A file received with a request, spooled to a transient location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original filename as sent by the client.
    pub name: String,
    /// Declared MIME type.
    pub mimetype: String,
    pub size: u64,
    /// Transient on-disk location, removed when the pipeline run ends.
    pub path: PathBuf,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        mimetype: impl Into<String>,
        size: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            mimetype: mimetype.into(),
            size,
            path: path.into(),
        }
    }
}

/// Inbound create request: the files keyed by form field plus the
/// caller's authenticated identity, if any.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    files: HashMap<String, UploadedFile>,
    pub owner_id: Option<String>,
}

impl UploadRequest {
    pub fn new(owner_id: Option<String>) -> Self {
        Self {
            files: HashMap::new(),
            owner_id,
        }
    }

    pub fn with_file(mut self, field: impl Into<String>, file: UploadedFile) -> Self {
        self.insert_file(field, file);
        self
    }

    /// Adds a file; a previous file under the same field is returned so the
    /// caller can dispose of it.
    pub fn insert_file(
        &mut self,
        field: impl Into<String>,
        file: UploadedFile,
    ) -> Option<UploadedFile> {
        self.files.insert(field.into(), file)
    }

    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        self.files.remove(field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.files.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Files still held by the request.
    pub fn into_files(self) -> Vec<UploadedFile> {
        self.files.into_values().collect()
    }
}
