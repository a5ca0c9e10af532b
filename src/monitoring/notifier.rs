//! Per-record alert resolution and concurrent delivery

use crate::cloudtrail::LogRecord;
use crate::monitoring::filters::FilterSet;
use crate::monitoring::slack_alert::AlertSender;
use crate::utils::AppError;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Resolves records to alerts and delivers them
pub struct Notifier<S: AlertSender> {
    filters: Arc<FilterSet>,
    sender: Arc<S>,
}

impl<S: AlertSender> Clone for Notifier<S> {
    fn clone(&self) -> Self {
        Self {
            filters: Arc::clone(&self.filters),
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<S: AlertSender> Notifier<S> {
    pub fn new(filters: Arc<FilterSet>, sender: Arc<S>) -> Self {
        Self { filters, sender }
    }

    /// Alert texts for a batch, in record order, without sending anything
    pub fn resolve(&self, records: &[LogRecord]) -> Vec<String> {
        records
            .iter()
            .filter_map(|record| self.filters.evaluate(record))
            .map(|alert| alert.text())
            .collect()
    }

    /// Deliver one alert per matching record
    ///
    /// All deliveries are started together and awaited jointly, so one
    /// failure never stops its siblings. Returns the number of delivered
    /// messages, or a delivery error once every attempt has finished if any
    /// of them failed.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn notify(&self, records: &[LogRecord]) -> Result<usize, AppError> {
        let messages = self.resolve(records);
        if messages.is_empty() {
            debug!("No record matched any filter");
            return Ok(0);
        }

        let deliveries = messages.iter().map(|text| {
            info!(alert = %text, "Sending alert");
            self.sender.send_text(text)
        });
        let results = join_all(deliveries).await;

        let total = results.len();
        let failures: Vec<AppError> = results.into_iter().filter_map(Result::err).collect();

        if let Some(first) = failures.first() {
            error!(
                failed = failures.len(),
                total,
                error = %first,
                "Some alerts could not be delivered"
            );
            return Err(AppError::delivery(format!(
                "{} of {} alerts failed, first error: {}",
                failures.len(),
                total,
                first
            )));
        }

        info!(delivered = total, "Alerts delivered");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudtrail::UserIdentity;
    use crate::monitoring::filters::ConsoleLoginFilter;
    use crate::monitoring::slack_alert::MockAlertSender;
    use mockall::predicate::eq;
    use std::io;
    use std::sync::Mutex;

    /// Captures formatted log lines for assertions
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            let bytes = self.0.lock().expect("log buffer lock").clone();
            String::from_utf8_lossy(&bytes).into_owned()
        }

        fn contains_line_with(&self, text: &str) -> bool {
            self.contents()
                .lines()
                .any(|line| line.contains("Sending alert") && line.contains(text))
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn login(user: &str, ip: &str) -> LogRecord {
        LogRecord {
            event_name: "ConsoleLogin".to_string(),
            user_identity: Some(UserIdentity {
                user_name: Some(user.to_string()),
                ..Default::default()
            }),
            source_ip_address: Some(ip.to_string()),
            ..Default::default()
        }
    }

    fn other_event() -> LogRecord {
        LogRecord {
            event_name: "DescribeInstances".to_string(),
            ..Default::default()
        }
    }

    fn filters(trusted: &[&str]) -> Arc<FilterSet> {
        Arc::new(FilterSet::new().with_filter(ConsoleLoginFilter::new(trusted.iter().copied())))
    }

    #[tokio::test]
    async fn should_deliver_one_message_per_matching_record() {
        // Arrange
        let mut sender = MockAlertSender::new();
        sender
            .expect_send_text()
            .with(eq(
                ":large_green_circle: [alice] Console login from trusted IP(1.2.3.4) detected.",
            ))
            .times(1)
            .returning(|_| Ok(()));
        sender
            .expect_send_text()
            .with(eq(
                ":red_circle: [bob] Console login from untrusted IP(5.6.7.8) detected.",
            ))
            .times(1)
            .returning(|_| Ok(()));
        let notifier = Notifier::new(filters(&["1.2.3.4"]), Arc::new(sender));
        let records = vec![login("alice", "1.2.3.4"), other_event(), login("bob", "5.6.7.8")];

        // Act
        let delivered = notifier.notify(&records).await;

        // Assert
        assert_eq!(delivered.expect("delivery should succeed"), 2);
    }

    #[tokio::test]
    async fn should_skip_batches_without_matches() {
        // Arrange
        let mut sender = MockAlertSender::new();
        sender.expect_send_text().never();
        let notifier = Notifier::new(filters(&[]), Arc::new(sender));

        // Act
        let delivered = notifier.notify(&[other_event(), other_event()]).await;

        // Assert
        assert_eq!(delivered.expect("nothing to deliver"), 0);
    }

    #[tokio::test]
    async fn should_attempt_every_delivery_when_one_fails() {
        // Arrange
        let mut sender = MockAlertSender::new();
        sender
            .expect_send_text()
            .times(3)
            .returning(|text| {
                if text.contains("[bob]") {
                    Err(AppError::delivery("Slack webhook error: 500"))
                } else {
                    Ok(())
                }
            });
        let notifier = Notifier::new(filters(&[]), Arc::new(sender));
        let records = vec![
            login("alice", "1.1.1.1"),
            login("bob", "2.2.2.2"),
            login("carol", "3.3.3.3"),
        ];

        // Act
        let result = notifier.notify(&records).await;

        // Assert
        match result {
            Err(AppError::Delivery(msg)) => {
                assert!(msg.starts_with("1 of 3 alerts failed"));
                assert!(msg.contains("500"));
            }
            other => panic!("Expected Delivery error, got {:?}", other),
        }
    }

    #[test]
    fn should_resolve_same_messages_for_same_input() {
        // Arrange
        let notifier = Notifier::new(filters(&["1.2.3.4"]), Arc::new(MockAlertSender::new()));
        let records = vec![login("alice", "1.2.3.4"), other_event()];

        // Act
        let first = notifier.resolve(&records);
        let second = notifier.resolve(&records);

        // Assert
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn should_log_each_alert_before_sending_it() {
        // Arrange
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _default = tracing::subscriber::set_default(subscriber);

        let observed = logs.clone();
        let mut sender = MockAlertSender::new();
        sender.expect_send_text().times(2).returning(move |text| {
            assert!(
                observed.contains_line_with(text),
                "alert was sent before being logged: {}",
                text
            );
            Ok(())
        });
        let notifier = Notifier::new(filters(&["1.2.3.4"]), Arc::new(sender));
        let records = vec![login("alice", "1.2.3.4"), login("bob", "5.6.7.8")];

        // Act
        let delivered = notifier.notify(&records).await;

        // Assert
        assert_eq!(delivered.expect("delivery should succeed"), 2);
        let output = logs.contents();
        assert!(output.contains(
            ":large_green_circle: [alice] Console login from trusted IP(1.2.3.4) detected."
        ));
        assert!(output.contains(
            ":red_circle: [bob] Console login from untrusted IP(5.6.7.8) detected."
        ));
    }
}
