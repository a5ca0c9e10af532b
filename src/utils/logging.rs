//! 로깅 초기화 모듈
//!
//! JSON 형식의 구조화된 로깅을 제공합니다.
//! stdout에 항상 출력하고, `LOG_DIR`이 설정된 경우 일별 로그 파일에도 출력합니다.

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,cloudtrail_slack_notifier=debug";

/// File name prefix for the rolling log file
const LOG_FILE_PREFIX: &str = "notifier.log";

/// 로깅 시스템을 초기화합니다.
///
/// Lambda 환경에서는 stdout 출력이 CloudWatch로 수집됩니다.
/// `LOG_DIR`이 설정되어 있으면 `notifier.log.YYYY-MM-DD` 파일에도 기록합니다.
///
/// 반환되는 `WorkerGuard`를 main에서 유지해야 버퍼링된 로그가 손실되지 않습니다.
pub fn init_logging() -> Option<WorkerGuard> {
    let log_dir = std::env::var("LOG_DIR").ok().filter(|dir| !dir.is_empty());

    let (file_writer, guard) = match log_dir {
        Some(dir) => {
            let file_appender = rolling::daily(&dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(non_blocking), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .flatten_event(false)
        .with_ansi(false);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_current_span(true)
            .flatten_event(false)
            .with_ansi(false)
            .with_writer(writer)
    });

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .or_else(|err| {
            // Detect "already initialized" via source downcasting
            use std::error::Error;
            if err
                .source()
                .and_then(|s| s.downcast_ref::<tracing::dispatcher::SetGlobalDefaultError>())
                .is_some()
            {
                return Ok(());
            }
            eprintln!("Failed to initialize tracing: {}", err);
            Err(err)
        })
        .ok();

    guard
}
