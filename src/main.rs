use aws_lambda_events::s3::S3Event;
use cloudtrail_slack_notifier::config::AppConfig;
use cloudtrail_slack_notifier::storage::S3ObjectStore;
use cloudtrail_slack_notifier::utils::init_logging;
use cloudtrail_slack_notifier::build_pipeline;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화
    let _guard = init_logging();

    // 3. 설정 및 파이프라인 구성
    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;
    tracing::info!(
        trusted_ips = config.trusted_ips.len(),
        "Configuration loaded"
    );

    let store = Arc::new(S3ObjectStore::from_env().await);
    let pipeline = Arc::new(build_pipeline(&config, store));

    // 4. Lambda 런타임 실행
    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| {
        let pipeline = Arc::clone(&pipeline);
        async move {
            pipeline.handle(&event.payload).await;
            Ok::<(), Error>(())
        }
    }))
    .await
}
