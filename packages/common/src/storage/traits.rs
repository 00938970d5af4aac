use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Storage for supporting documents, addressed by upload reference.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store bytes under `reference`, replacing any previous file. Returns the size.
    async fn put(&self, reference: &str, data: &[u8]) -> Result<u64, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(reference, reader).await
    }

    async fn put_stream(&self, reference: &str, reader: BoxReader) -> Result<u64, StorageError>;

    async fn get(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(reference).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    async fn get_stream(&self, reference: &str) -> Result<BoxReader, StorageError>;

    async fn size(&self, reference: &str) -> Result<u64, StorageError>;

    /// Remove every stored upload. Returns how many files were deleted.
    async fn delete_all(&self) -> Result<u64, StorageError>;
}
