//! Inbound S3 notification handling
//!
//! Turns the Lambda trigger payload into the location of the log object.

mod object_location;

pub use object_location::{decode_key, ObjectLocation};
