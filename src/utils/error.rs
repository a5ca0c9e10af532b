use thiserror::Error;

/// Notifier-wide error type
///
/// Every stage of an invocation maps its failure into one of these variants.
/// None of them are retried; the pipeline top level logs and discards them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid storage event: {0}")]
    InvalidEvent(String),

    #[error("failed to fetch s3://{bucket}/{key}: {message}")]
    Fetch {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("failed to decompress log object: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to parse log batch: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("webhook delivery failed: {0}")]
    Delivery(String),
}

impl AppError {
    /// Short stable tag used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidEvent(_) => "invalid_event",
            AppError::Fetch { .. } => "fetch",
            AppError::Decompress(_) => "decompress",
            AppError::Parse(_) => "parse",
            AppError::Delivery(_) => "delivery",
        }
    }
}

/// 편의 함수들
impl AppError {
    pub fn invalid_event(msg: impl Into<String>) -> Self {
        AppError::InvalidEvent(msg.into())
    }

    pub fn fetch(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AppError::Fetch {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        AppError::Delivery(msg.into())
    }
}
