mod error;
mod reference;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use reference::{
    ALLOWED_EXTENSIONS, UploadRole, is_allowed_file, sanitize_filename, upload_reference,
    validate_reference,
};
pub use traits::{BoxReader, UploadStore};
