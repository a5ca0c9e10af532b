//! CloudTrail log batch model and decoding
//!
//! CloudTrail delivers gzip-compressed JSON documents of the form
//! `{"Records": [...]}` to S3. This module turns those bytes into typed records.

pub mod decode;
mod record;

pub use decode::{decode_batch, gunzip, parse_batch};
pub use record::{LogBatch, LogRecord, UserIdentity};
