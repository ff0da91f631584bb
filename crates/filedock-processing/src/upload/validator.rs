use filedock_core::models::UploadedFile;
use filedock_core::{AcceptList, AppError, UploadOptions};

/// Verify-stage rejections
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unable to find a file in request body")]
    MissingFile { field: String, found: Vec<String> },

    #[error("Maximum allowed file size is {max}")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File format '{mimetype}' is not allowed. Accepted formats are : {accepted}")]
    TypeNotAllowed { mimetype: String, accepted: String },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        match err {
            ValidationError::MissingFile { .. } => AppError::MissingFile(message),
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(message),
            ValidationError::TypeNotAllowed { .. } => AppError::UnsupportedMediaType(message),
        }
    }
}

/// Size and MIME type policy of one collection
#[derive(Debug, Clone, Default)]
pub struct UploadValidator {
    max_size: Option<u64>,
    accept: AcceptList,
}

impl UploadValidator {
    pub fn new(max_size: Option<u64>, accept: AcceptList) -> Self {
        Self { max_size, accept }
    }

    pub fn from_options(options: &UploadOptions) -> Self {
        Self::new(options.max_size, options.accept.clone())
    }

    pub fn validate_size(&self, size: u64) -> Result<(), ValidationError> {
        match self.max_size {
            Some(max) if size > max => Err(ValidationError::FileTooLarge { size, max }),
            _ => Ok(()),
        }
    }

    pub fn validate_content_type(&self, mimetype: &str) -> Result<(), ValidationError> {
        if self.accept.allows(mimetype) {
            return Ok(());
        }
        Err(ValidationError::TypeNotAllowed {
            mimetype: mimetype.to_string(),
            accepted: self.accept.as_slice().join(", "),
        })
    }

    /// Size first, then type.
    pub fn validate(&self, file: &UploadedFile) -> Result<(), ValidationError> {
        self.validate_size(file.size)?;
        self.validate_content_type(&file.mimetype)
    }
}
