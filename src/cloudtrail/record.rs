use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parsed CloudTrail delivery document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogBatch {
    #[serde(rename = "Records")]
    pub records: Vec<LogRecord>,
}

/// Single CloudTrail audit entry
///
/// Only the fields the filters read or log are modelled; anything else in
/// the document is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// API or console action (e.g. "ConsoleLogin"), empty when missing
    #[serde(default)]
    pub event_name: String,
    /// Acting principal; absent for some root and anonymous actions
    #[serde(default)]
    pub user_identity: Option<UserIdentity>,
    #[serde(default, rename = "sourceIPAddress")]
    pub source_ip_address: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Raw timestamp, see [`LogRecord::event_timestamp`]
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub event_source: Option<String>,
    #[serde(default)]
    pub aws_region: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub recipient_account_id: Option<String>,
}

/// Principal that performed the action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// "Root", "IAMUser", "AssumedRole", ...
    #[serde(default, rename = "type")]
    pub identity_type: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl LogRecord {
    /// Actor user name, `None` when the identity or its name is missing or empty
    pub fn user_name(&self) -> Option<&str> {
        self.user_identity
            .as_ref()
            .and_then(|identity| identity.user_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Source address as sent by CloudTrail, if any
    pub fn source_ip(&self) -> Option<&str> {
        self.source_ip_address.as_deref()
    }

    /// Parsed `eventTime`; `None` when missing or not RFC 3339
    pub fn event_timestamp(&self) -> Option<DateTime<Utc>> {
        self.event_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|time| time.with_timezone(&Utc))
    }

    /// Error text, `None` when absent or empty
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|msg| !msg.is_empty())
    }
}
