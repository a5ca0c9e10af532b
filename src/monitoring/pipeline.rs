//! Invocation pipeline: S3 notification to Slack alerts
//!
//! fetch → gunzip → parse → filter → notify, strictly in that order.
//! Any stage failure ends the invocation; [`Pipeline::handle`] logs it and
//! returns normally.

use crate::cloudtrail;
use crate::event::ObjectLocation;
use crate::monitoring::notifier::Notifier;
use crate::monitoring::slack_alert::AlertSender;
use crate::storage::ObjectStore;
use crate::utils::AppError;
use aws_lambda_events::s3::S3Event;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// One configured notification pipeline, shared across invocations
pub struct Pipeline<O: ObjectStore, S: AlertSender> {
    store: Arc<O>,
    notifier: Notifier<S>,
}

impl<O: ObjectStore, S: AlertSender> Pipeline<O, S> {
    pub fn new(store: Arc<O>, notifier: Notifier<S>) -> Self {
        Self { store, notifier }
    }

    /// Run every stage, returning the number of delivered alerts
    pub async fn run(&self, event: &S3Event) -> Result<usize, AppError> {
        let location = ObjectLocation::from_event(event)?;
        self.process(&location).await
    }

    /// Stages 3 to 6 for an already resolved object
    #[instrument(skip(self), fields(bucket = %location.bucket, key = %location.key))]
    pub async fn process(&self, location: &ObjectLocation) -> Result<usize, AppError> {
        let body = self.store.fetch(location).await?;
        let batch = cloudtrail::decode_batch(&body)?;
        info!(records = batch.records.len(), "Processing log batch");
        self.notifier.notify(&batch.records).await
    }

    /// Top-level entry: never fails, never retries
    pub async fn handle(&self, event: &S3Event) {
        match self.run(event).await {
            Ok(delivered) => info!(delivered, "Invocation finished"),
            Err(e) => error!(kind = e.kind(), error = %e, "Invocation failed"),
        }
    }
}
