//! Gunzip and parse glue between the fetched object and [`LogBatch`]

use super::LogBatch;
use crate::utils::AppError;
use flate2::read::MultiGzDecoder;
use std::io::Read;
use tracing::debug;

/// Decompress a gzip body (single or multi member)
pub fn gunzip(compressed: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut decoded = Vec::new();
    MultiGzDecoder::new(compressed)
        .read_to_end(&mut decoded)
        .map_err(AppError::Decompress)?;

    debug!(
        compressed_bytes = compressed.len(),
        decompressed_bytes = decoded.len(),
        "Log object decompressed"
    );
    Ok(decoded)
}

/// Parse decompressed bytes as a CloudTrail batch
pub fn parse_batch(bytes: &[u8]) -> Result<LogBatch, AppError> {
    let batch: LogBatch = serde_json::from_slice(bytes)?;
    debug!(records = batch.records.len(), "Log batch parsed");
    Ok(batch)
}

/// Gunzip then parse
pub fn decode_batch(compressed: &[u8]) -> Result<LogBatch, AppError> {
    gunzip(compressed).and_then(|bytes| parse_batch(&bytes))
}
