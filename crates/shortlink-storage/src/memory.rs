use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shortlink_core::error::{Result, StorageError};
use shortlink_core::{ObjectKey, ReadRedirectStore, RedirectStore, REDIRECT_CONTENT_TYPE};
use std::sync::Arc;

/// A redirect object as the in-memory store keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub redirect_target: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl StoredObject {
    fn redirect(target: &str) -> Self {
        Self {
            redirect_target: target.to_owned(),
            content_type: REDIRECT_CONTENT_TYPE.to_owned(),
            body: Vec::new(),
        }
    }
}

/// In-memory implementation of the redirect store using DashMap.
///
/// Clones share the same underlying map, so a test can keep a handle to a
/// store after passing it to an allocator. `put_redirect_if_absent` holds the
/// shard lock across check and insert, so it is atomic like a conditional put.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRedirectStore {
    objects: Arc<DashMap<String, StoredObject>>,
}

impl InMemoryRedirectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    /// Returns a copy of the object stored at `key`.
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ReadRedirectStore for InMemoryRedirectStore {
    async fn exists(&self, key: &ObjectKey) -> Result<bool> {
        Ok(self.objects.contains_key(key.as_str()))
    }

    async fn redirect_target(&self, key: &ObjectKey) -> Result<Option<String>> {
        Ok(self
            .objects
            .get(key.as_str())
            .map(|entry| entry.redirect_target.clone()))
    }
}

#[async_trait]
impl RedirectStore for InMemoryRedirectStore {
    async fn put_redirect(&self, key: &ObjectKey, target: &str) -> Result<()> {
        self.objects
            .insert(key.as_str().to_owned(), StoredObject::redirect(target));
        Ok(())
    }

    async fn put_redirect_if_absent(&self, key: &ObjectKey, target: &str) -> Result<()> {
        match self.objects.entry(key.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(key.to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(StoredObject::redirect(target));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlink_core::ShortCode;
    use tokio::sync::Barrier;

    fn key(s: &str) -> ObjectKey {
        ShortCode::new_unchecked(s).object_key("u")
    }

    #[tokio::test]
    async fn put_and_read_back() {
        let store = InMemoryRedirectStore::new();

        store
            .put_redirect(&key("abc123"), "https://example.com")
            .await
            .unwrap();

        assert!(store.exists(&key("abc123")).await.unwrap());
        assert_eq!(
            store.redirect_target(&key("abc123")).await.unwrap().as_deref(),
            Some("https://example.com")
        );

        let object = store.object("u/abc123").unwrap();
        assert_eq!(object.content_type, "text/plain");
        assert!(object.body.is_empty());
    }

    #[tokio::test]
    async fn missing_object() {
        let store = InMemoryRedirectStore::new();

        assert!(!store.exists(&key("nope")).await.unwrap());
        assert!(store.redirect_target(&key("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_redirect_overwrites() {
        let store = InMemoryRedirectStore::new();

        store
            .put_redirect(&key("abc123"), "https://old.com")
            .await
            .unwrap();
        store
            .put_redirect(&key("abc123"), "https://new.com")
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.object("u/abc123").unwrap().redirect_target,
            "https://new.com"
        );
    }

    #[tokio::test]
    async fn put_if_absent_conflict() {
        let store = InMemoryRedirectStore::new();

        store
            .put_redirect_if_absent(&key("abc123"), "https://example.com")
            .await
            .unwrap();

        let err = store
            .put_redirect_if_absent(&key("abc123"), "https://other.com")
            .await
            .unwrap_err();

        assert_eq!(err, StorageError::Conflict("u/abc123".to_string()));
        assert_eq!(
            store.object("u/abc123").unwrap().redirect_target,
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryRedirectStore::new();
        let handle = store.clone();

        store
            .put_redirect(&key("abc123"), "https://example.com")
            .await
            .unwrap();

        assert!(handle.exists(&key("abc123")).await.unwrap());
        assert!(!handle.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_put_if_absent_has_one_winner() {
        let store = InMemoryRedirectStore::with_capacity(1);
        let start = Arc::new(Barrier::new(16));
        let mut handles = vec![];

        for i in 0..16u32 {
            let store = store.clone();
            let start = Arc::clone(&start);
            handles.push(tokio::spawn(async move {
                start.wait().await;
                store
                    .put_redirect_if_absent(&key("race"), &format!("https://example{i}.com"))
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => winners += 1,
                Err(err) => assert!(matches!(err, StorageError::Conflict(_))),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }
}
