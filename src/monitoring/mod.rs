//! Monitoring module for CloudTrail login alerts
//!
//! This module provides the alerting pipeline:
//! - Record filters that render Slack messages
//! - Slack webhook delivery
//! - Per-batch notification and invocation orchestration

pub mod filters;
pub mod notifier;
pub mod pipeline;
pub mod slack_alert;

pub use filters::{Alert, ConsoleLoginFilter, FilterSet, LogFilter, Severity};
pub use notifier::Notifier;
pub use pipeline::Pipeline;
pub use slack_alert::{AlertSender, SlackWebhook};
