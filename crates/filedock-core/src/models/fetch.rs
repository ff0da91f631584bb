use bytes::Bytes;

use crate::constants::CACHE_CONTROL;

/// Bytes of a stored artifact plus what the caller needs to shape the response.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub name: String,
    pub mimetype: String,
    pub data: Bytes,
    pub attachment: bool,
}

impl FetchedFile {
    /// `attachment; filename="<encoded name>"` when serving as attachment, else `inline`.
    pub fn content_disposition(&self) -> String {
        if self.attachment {
            format!(
                "attachment; filename=\"{}\"",
                urlencoding::encode(&self.name)
            )
        } else {
            "inline".to_string()
        }
    }

    pub fn cache_control(&self) -> &'static str {
        CACHE_CONTROL
    }
}
