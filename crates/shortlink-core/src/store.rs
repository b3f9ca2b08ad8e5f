use crate::error::Result;
use crate::key::ObjectKey;
use async_trait::async_trait;

/// Content type recorded on every redirect object.
pub const REDIRECT_CONTENT_TYPE: &str = "text/plain";

/// A read-only view of a redirect store.
#[async_trait]
pub trait ReadRedirectStore: Send + Sync + 'static {
    /// Checks whether an object already exists at `key`.
    ///
    /// A missing object is `Ok(false)`, never an error.
    async fn exists(&self, key: &ObjectKey) -> Result<bool>;

    /// Returns the redirect target recorded on the object at `key`.
    /// Returns `None` if the object does not exist.
    async fn redirect_target(&self, key: &ObjectKey) -> Result<Option<String>>;
}

/// An object store that can record website redirects.
///
/// Each redirect object has an empty body, content type
/// [`REDIRECT_CONTENT_TYPE`], and its redirect-target metadata set to the
/// long URL.
#[async_trait]
pub trait RedirectStore: ReadRedirectStore {
    /// Writes a redirect object, overwriting any existing object at `key`.
    async fn put_redirect(&self, key: &ObjectKey, target: &str) -> Result<()>;

    /// Writes a redirect object only if `key` is free.
    /// Returns `Err(Conflict)` if an object already exists.
    async fn put_redirect_if_absent(&self, key: &ObjectKey, target: &str) -> Result<()>;
}
