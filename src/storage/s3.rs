use super::ObjectStore;
use crate::event::ObjectLocation;
use crate::utils::AppError;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use tracing::{debug, error, instrument};

/// [`ObjectStore`] backed by S3 `GetObject`
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential and region chain
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_from_env().await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self), fields(bucket = %location.bucket, key = %location.key))]
    async fn fetch(&self, location: &ObjectLocation) -> Result<Vec<u8>, AppError> {
        let output = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(error = %message, "S3 GetObject failed");
                AppError::fetch(&location.bucket, &location.key, message)
            })?;

        let body = output.body.collect().await.map_err(|e| {
            error!(error = %e, "Failed to read S3 object body");
            AppError::fetch(&location.bucket, &location.key, e.to_string())
        })?;

        let bytes = body.into_bytes().to_vec();
        debug!(bytes = bytes.len(), "S3 object fetched");
        Ok(bytes)
    }
}
