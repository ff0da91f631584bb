//! Image variant generation: formats, orientation, resize geometry and
//! the resizer generator built on them.

pub mod format;
pub mod orientation;
pub mod resize;
pub mod resizer;

pub use format::{VariantFormat, DEFAULT_OUTPUT_FORMAT, READABLE_FORMATS, WRITABLE_FORMATS};
pub use orientation::ImageOrientation;
pub use resize::{ImageResize, ResizeDimensions};
pub use resizer::ImageResizer;
