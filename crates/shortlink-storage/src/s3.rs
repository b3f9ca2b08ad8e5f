//! Amazon S3 redirect store.
//!
//! Each short link is a zero-byte object whose `x-amz-website-redirect-location`
//! metadata points at the long URL. When the bucket is served through S3
//! static website hosting (or a CDN in front of it), fetching the object
//! answers with an HTTP 301 to that location.
//!
//! Create-if-absent writes send `If-None-Match: *`, which S3 rejects with
//! `412 Precondition Failed` when the key is already taken.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::operation::put_object::builders::PutObjectFluentBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use shortlink_core::error::{Result, StorageError};
use shortlink_core::{ObjectKey, ReadRedirectStore, RedirectStore, REDIRECT_CONTENT_TYPE};
use tracing::{debug, instrument};
use typed_builder::TypedBuilder;

/// Connection settings for [`S3RedirectStore::connect`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct S3Settings {
    /// Bucket holding the redirect objects.
    #[builder(setter(into))]
    pub bucket: String,
    /// Bucket region. Falls back to the SDK's default provider chain.
    #[builder(default, setter(strip_option, into))]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services such as MinIO.
    /// Enables path-style addressing.
    #[builder(default, setter(strip_option, into))]
    pub endpoint_url: Option<String>,
}

/// A [`RedirectStore`] backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3RedirectStore {
    client: Client,
    bucket: String,
}

impl S3RedirectStore {
    /// Creates a store from an existing S3 client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Loads AWS configuration from the environment and builds a client.
    pub async fn connect(settings: S3Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = settings.region.clone() {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &settings.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        debug!(
            bucket = %settings.bucket,
            region = ?sdk_config.region(),
            endpoint = ?settings.endpoint_url,
            "S3RedirectStore initialised"
        );

        Self::new(Client::from_conf(builder.build()), settings.bucket)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn put_request(&self, key: &ObjectKey, target: &str) -> PutObjectFluentBuilder {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .body(ByteStream::from_static(b""))
            .website_redirect_location(target)
            .content_type(REDIRECT_CONTENT_TYPE)
    }
}

#[async_trait]
impl ReadRedirectStore for S3RedirectStore {
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn exists(&self, key: &ObjectKey) -> Result<bool> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(HeadObjectError::is_not_found) => {
                Ok(false)
            }
            Err(err) => Err(map_sdk_error(err)),
        }
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn redirect_target(&self, key: &ObjectKey) -> Result<Option<String>> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.website_redirect_location().map(str::to_owned)),
            Err(err) if err.as_service_error().is_some_and(HeadObjectError::is_not_found) => {
                Ok(None)
            }
            Err(err) => Err(map_sdk_error(err)),
        }
    }
}

#[async_trait]
impl RedirectStore for S3RedirectStore {
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn put_redirect(&self, key: &ObjectKey, target: &str) -> Result<()> {
        self.put_request(key, target)
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn put_redirect_if_absent(&self, key: &ObjectKey, target: &str) -> Result<()> {
        match self.put_request(key, target).if_none_match("*").send().await {
            Ok(_) => Ok(()),
            Err(err) if is_precondition_failure(&err) => {
                Err(StorageError::Conflict(key.to_string()))
            }
            Err(err) => Err(map_sdk_error(err)),
        }
    }
}

/// `412 Precondition Failed`, or `409 ConditionalRequestConflict` when a
/// concurrent conditional write to the same key is in flight.
fn is_precondition_failure<E: ProvideErrorMetadata>(err: &SdkError<E, HttpResponse>) -> bool {
    matches!(
        err.code(),
        Some("PreconditionFailed" | "ConditionalRequestConflict")
    ) || err
        .raw_response()
        .is_some_and(|response| response.status().as_u16() == 412)
}

fn map_sdk_error<E>(err: SdkError<E, HttpResponse>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    if matches!(
        err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    ) {
        return StorageError::Unavailable(DisplayErrorContext(&err).to_string());
    }

    // HEAD responses carry no body, so the code may only be in the status.
    let code = err
        .code()
        .map(str::to_owned)
        .or_else(|| {
            err.raw_response()
                .map(|response| status_error_code(response.status().as_u16()))
        })
        .unwrap_or_else(|| "Unknown".to_owned());
    let message = err
        .message()
        .map(str::to_owned)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    StorageError::Backend { code, message }
}

/// Error code for a response that carried only a status line.
fn status_error_code(status: u16) -> String {
    match status {
        400 => "BadRequest".to_owned(),
        403 => "Forbidden".to_owned(),
        404 => "NotFound".to_owned(),
        412 => "PreconditionFailed".to_owned(),
        503 => "ServiceUnavailable".to_owned(),
        other => format!("HTTP{}", other),
    }
}
