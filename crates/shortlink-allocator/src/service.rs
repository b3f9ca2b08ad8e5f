use async_trait::async_trait;
use shortlink_core::{
    AllocateError, AllocateParams, Allocation, Allocator, ObjectKey, RedirectStore, ShortCode,
    StorageError,
};
use shortlink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;
use url::Url;

pub const DEFAULT_KEY_PREFIX: &str = "u";

/// Static configuration of an [`AllocatorService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct AllocatorSettings {
    /// Key prefix for redirect objects, e.g. `u` for `u/ab3k9fz`.
    #[builder(default = DEFAULT_KEY_PREFIX.to_string(), setter(into))]
    pub key_prefix: String,
    /// CDN host used when a request carries no `cdn_prefix`.
    #[builder(default, setter(strip_option, into))]
    pub cdn_prefix: Option<String>,
    /// Number of generated ids tried before reporting a collision.
    ///
    /// `1` fails on the first collision. Caller-supplied ids are always
    /// tried exactly once.
    #[builder(default = 1)]
    pub max_attempts: u32,
    /// Write with create-if-absent instead of an overwriting put.
    #[builder(default = true)]
    pub conditional_writes: bool,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Allocator` trait.
///
/// This service wraps a `RedirectStore` and a `Generator` to handle:
/// - URL and short id validation
/// - Short id generation when the caller supplies none
/// - The existence probe followed by the redirect write
///
/// The probe always completes before the write starts. With
/// `conditional_writes` enabled the write itself refuses an occupied key,
/// so two concurrent allocations of one id cannot both succeed.
#[derive(Debug, Clone)]
pub struct AllocatorService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: AllocatorSettings,
}

impl<S: RedirectStore, G: Generator> AllocatorService<S, G> {
    pub fn new(store: S, generator: G, settings: AllocatorSettings) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            settings,
        }
    }

    /// Validates that the URL is absolute, http(s), and has a host.
    fn validate_url(raw: &str) -> Result<(), AllocateError> {
        let url = Url::parse(raw)
            .map_err(|e| AllocateError::InvalidUrl(format!("{}: {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AllocateError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                url.scheme()
            )));
        }

        if !url.host_str().is_some_and(|host| !host.is_empty()) {
            return Err(AllocateError::InvalidUrl(format!(
                "URL has no host: {}",
                raw
            )));
        }

        Ok(())
    }

    fn generate_code(&self) -> ShortCode {
        self.generator.generate().into()
    }

    /// Probes `code`'s key and, if free, writes the redirect object.
    async fn claim(&self, code: &ShortCode, long_url: &str) -> Result<ObjectKey, AllocateError> {
        let key = code.object_key(&self.settings.key_prefix);

        let exists = self.store.exists(&key).await.map_err(|e| {
            warn!(key = %key, error = %e, "existence probe failed");
            AllocateError::StorageProbeFailed {
                code: e.code().to_owned(),
                message: e.message(),
            }
        })?;
        if exists {
            debug!(key = %key, "short id already in use");
            return Err(AllocateError::IdAlreadyInUse(code.to_string()));
        }

        let written = if self.settings.conditional_writes {
            self.store.put_redirect_if_absent(&key, long_url).await
        } else {
            self.store.put_redirect(&key, long_url).await
        };
        written.map_err(|e| match e {
            StorageError::Conflict(_) => {
                debug!(key = %key, "short id claimed concurrently");
                AllocateError::IdAlreadyInUse(code.to_string())
            }
            other => {
                warn!(key = %key, error = %other, "redirect write failed");
                AllocateError::StorageWriteFailed(other.message())
            }
        })?;

        Ok(key)
    }
}

#[async_trait]
impl<S: RedirectStore, G: Generator> Allocator for AllocatorService<S, G> {
    async fn allocate(&self, params: AllocateParams) -> Result<Allocation, AllocateError> {
        Self::validate_url(&params.long_url)?;

        let custom = params
            .short_id
            .filter(|id| !id.is_empty())
            .map(ShortCode::new)
            .transpose()?;

        let cdn_prefix = params
            .cdn_prefix
            .filter(|prefix| !prefix.is_empty())
            .or_else(|| self.settings.cdn_prefix.clone())
            .ok_or(AllocateError::MissingCdnPrefix)?;

        let max_attempts = match custom {
            Some(_) => 1,
            None => self.settings.max_attempts.max(1),
        };
        let mut code = custom.unwrap_or_else(|| self.generate_code());
        let mut attempt = 1;

        loop {
            info!(long_url = %params.long_url, short_id = %code, attempt, "allocating short link");

            let outcome = self.claim(&code, &params.long_url).await;
            match outcome {
                Ok(key) => {
                    let short_url = code.to_url(&cdn_prefix);
                    info!(key = %key, short_url = %short_url, "short link created");
                    return Ok(Allocation {
                        code,
                        key,
                        short_url,
                    });
                }
                Err(AllocateError::IdAlreadyInUse(_))
                    if code.is_generated() && attempt < max_attempts =>
                {
                    warn!(short_id = %code, attempt, max_attempts, "generated short id collided, regenerating");
                    attempt += 1;
                    code = self.generate_code();
                }
                Err(err) => return Err(err),
            }
        }
    }
}
