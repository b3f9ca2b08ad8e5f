use crate::error::AllocateError;
use crate::key::ObjectKey;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, AllocateError>;

/// Parameters for allocating a short link.
#[derive(Debug, Clone)]
pub struct AllocateParams {
    /// The long URL the short link redirects to.
    pub long_url: String,
    /// Optional caller-supplied short identifier. Empty means absent.
    pub short_id: Option<String>,
    /// Host (and optional path) the short URL is served from.
    /// Falls back to the allocator's configured prefix when absent.
    pub cdn_prefix: Option<String>,
}

/// A successfully recorded short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub code: ShortCode,
    pub key: ObjectKey,
    pub short_url: String,
}

#[async_trait]
pub trait Allocator: Send + Sync + 'static {
    /// Allocates a short identifier for `params.long_url` and records the
    /// redirect in storage.
    async fn allocate(&self, params: AllocateParams) -> Result<Allocation>;
}
