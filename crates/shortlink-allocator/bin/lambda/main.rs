mod cli;

use crate::cli::{LogFormat, CLI};
use anyhow::Context;
use clap::Parser;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use shortlink_allocator::{
    handle_request, AllocatorService, AllocatorSettings, ShortLinkRequest, ShortLinkResponse,
};
use shortlink_generator::RandomGenerator;
use shortlink_storage::{S3RedirectStore, S3Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

type Service = AllocatorService<S3RedirectStore, RandomGenerator>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = CLI::try_parse().context("invalid shortlink configuration")?;
    init_tracing(config.log_format);

    info!(
        bucket = %config.bucket,
        region = ?config.region,
        key_prefix = %config.key_prefix,
        max_attempts = config.max_attempts,
        conditional_writes = config.conditional_writes,
        "starting shortlink lambda"
    );

    let store = S3RedirectStore::connect(s3_settings(&config)).await;
    let service = AllocatorService::new(store, RandomGenerator::new(), allocator_settings(&config));

    run(service_fn(|event| function_handler(&service, event))).await
}

async fn function_handler(
    service: &Service,
    event: LambdaEvent<Value>,
) -> Result<ShortLinkResponse, Error> {
    let request = ShortLinkRequest::from_event(event.payload);
    Ok(handle_request(service, request).await)
}

fn init_tracing(format: LogFormat) {
    // Lambda's log pipeline stamps each line, so timestamps are dropped.
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .without_time()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .without_time()
            .init(),
    }
}

fn s3_settings(config: &CLI) -> S3Settings {
    S3Settings {
        bucket: config.bucket.clone(),
        region: config.region.clone(),
        endpoint_url: config.s3_endpoint.clone(),
    }
}

fn allocator_settings(config: &CLI) -> AllocatorSettings {
    AllocatorSettings {
        key_prefix: config.key_prefix.clone(),
        cdn_prefix: config.cdn_prefix.clone(),
        max_attempts: config.max_attempts,
        conditional_writes: config.conditional_writes,
    }
}
