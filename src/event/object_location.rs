use crate::utils::AppError;
use aws_lambda_events::s3::S3Event;
use percent_encoding::percent_decode_str;
use std::fmt;

/// Bucket + decoded key of the delivered log object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Extract the object reference from the first record of an S3 notification
    ///
    /// One notification references exactly one CloudTrail delivery; further
    /// records, if any, are not consulted.
    pub fn from_event(event: &S3Event) -> Result<Self, AppError> {
        let record = event
            .records
            .first()
            .ok_or_else(|| AppError::invalid_event("notification contains no records"))?;

        let bucket = record
            .s3
            .bucket
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::invalid_event("record has no bucket name"))?;

        let raw_key = record
            .s3
            .object
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::invalid_event("record has no object key"))?;

        Ok(Self::new(bucket, decode_key(raw_key)?))
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Decode an S3 notification key: `+` means space, then percent-decoding
pub fn decode_key(raw: &str) -> Result<String, AppError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| {
            AppError::invalid_event(format!("object key '{}' is not valid UTF-8: {}", raw, e))
        })
}
