use async_trait::async_trait;
use reqwest::StatusCode;
use snafu::Snafu;

pub mod client;
pub mod file;

pub use file::{FileEntry, User};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    #[snafu(display("Request to {url} failed"))]
    Request { url: String, source: reqwest::Error },

    #[snafu(display("{url} answered with status {status}"))]
    Status { url: String, status: StatusCode },

    #[snafu(display("Could not build url for {endpoint}"))]
    InvalidUrl {
        endpoint: String,
        source: url::ParseError,
    },
}

/// Remote file and key-value operations the deletion coordinator consumes.
///
/// Every call is a suspension point. Implementations must not assume calls
/// for different paths are serialized.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn read_directory(&self, path: &str) -> Result<Vec<FileEntry>, StorageError>;

    async fn delete_file(&self, path: &str) -> Result<(), StorageError>;

    /// Deleting a key that does not exist succeeds.
    async fn delete_key(&self, key: &str) -> Result<(), StorageError>;

    async fn flush_all_keys(&self) -> Result<(), StorageError>;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `None` when the session is not authenticated.
    async fn current_user(&self) -> Result<Option<User>, StorageError>;
}
