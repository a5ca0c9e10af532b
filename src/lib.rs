pub mod cloudtrail;
pub mod config;
pub mod event;
pub mod monitoring;
pub mod storage;
pub mod utils;

use config::AppConfig;
use monitoring::{FilterSet, Notifier, Pipeline, SlackWebhook};
use std::sync::Arc;
use storage::ObjectStore;

/// Pipeline type deployed by the Lambda binary
pub type LambdaPipeline<O> = Pipeline<O, SlackWebhook>;

/// Wire the configured filters and Slack webhook to an object store
pub fn build_pipeline<O: ObjectStore>(config: &AppConfig, store: Arc<O>) -> LambdaPipeline<O> {
    let filters = Arc::new(FilterSet::from_config(config));
    let webhook = Arc::new(SlackWebhook::new(config.slack_webhook_url.clone()));
    Pipeline::new(store, Notifier::new(filters, webhook))
}
