//! Record filters that turn CloudTrail entries into Slack alerts
//!
//! A [`FilterSet`] is an ordered registry. For each record the filters are
//! asked in registration order and the first one that produces an [`Alert`]
//! wins.

use crate::cloudtrail::LogRecord;
use crate::config::AppConfig;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Placeholder shown when a login has no named actor
pub const ROOT_ACTOR: &str = "ROOT";

const CONSOLE_LOGIN_EVENT: &str = "ConsoleLogin";

/// Alert severity, rendered as a leading Slack emoji
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Success,
    Danger,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Warning => ":warning:",
            Severity::Success => ":large_green_circle:",
            Severity::Danger => ":red_circle:",
        }
    }
}

/// Message produced by a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: Severity,
    pub body: String,
}

impl Alert {
    pub fn new(severity: Severity, body: impl Into<String>) -> Self {
        Self {
            severity,
            body: body.into(),
        }
    }

    /// Text posted to the webhook: icon, space, body
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.icon(), self.body)
    }
}

/// A pure record classifier
pub trait LogFilter: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// `None` when the record does not match
    fn evaluate(&self, record: &LogRecord) -> Option<Alert>;
}

/// Reports AWS console sign-ins
#[derive(Debug, Clone)]
pub struct ConsoleLoginFilter {
    trusted_ips: Arc<HashSet<String>>,
}

impl ConsoleLoginFilter {
    pub fn new(trusted_ips: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            trusted_ips: Arc::new(trusted_ips.into_iter().map(Into::into).collect()),
        }
    }

    fn is_trusted(&self, ip: Option<&str>) -> bool {
        ip.is_some_and(|ip| self.trusted_ips.contains(ip))
    }
}

impl LogFilter for ConsoleLoginFilter {
    fn name(&self) -> &'static str {
        "console_login"
    }

    fn evaluate(&self, record: &LogRecord) -> Option<Alert> {
        if record.event_name != CONSOLE_LOGIN_EVENT {
            return None;
        }

        let name = record.user_name();
        let ip = record.source_ip().unwrap_or_default();

        if let Some(error) = record.error_message() {
            return Some(Alert::new(
                Severity::Warning,
                format!(
                    "[{}] Console login failed from {}. Error: {}",
                    name.unwrap_or_default(),
                    ip,
                    error
                ),
            ));
        }

        let actor = name.unwrap_or(ROOT_ACTOR);
        if self.is_trusted(record.source_ip()) {
            Some(Alert::new(
                Severity::Success,
                format!("[{}] Console login from trusted IP({}) detected.", actor, ip),
            ))
        } else {
            Some(Alert::new(
                Severity::Danger,
                format!("[{}] Console login from untrusted IP({}) detected.", actor, ip),
            ))
        }
    }
}

/// Ordered filter registry, first match wins
#[derive(Default)]
pub struct FilterSet {
    filters: Vec<Box<dyn LogFilter>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters enabled for a deployment
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new().with_filter(ConsoleLoginFilter::new(config.trusted_ips.iter().cloned()))
    }

    /// Append a filter after the ones already registered
    pub fn with_filter(mut self, filter: impl LogFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Alert from the first matching filter, if any
    pub fn evaluate(&self, record: &LogRecord) -> Option<Alert> {
        self.filters.iter().find_map(|filter| {
            let alert = filter.evaluate(record)?;
            debug!(
                filter = filter.name(),
                event_name = %record.event_name,
                event_time = ?record.event_timestamp(),
                "Record matched filter"
            );
            Some(alert)
        })
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}
