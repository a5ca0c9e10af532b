//! Object storage access
//!
//! The pipeline only needs "fetch bytes by bucket and key", so the storage
//! backend sits behind [`ObjectStore`] and can be replaced in tests.

mod s3;

pub use s3::S3ObjectStore;

use crate::event::ObjectLocation;
use crate::utils::AppError;

/// Read access to stored log objects
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full object body
    async fn fetch(&self, location: &ObjectLocation) -> Result<Vec<u8>, AppError>;
}
