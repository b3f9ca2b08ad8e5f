pub mod memory;
pub mod s3;

pub use memory::{InMemoryRedirectStore, StoredObject};
pub use s3::{S3RedirectStore, S3Settings};
pub use shortlink_core::error::{Result, StorageError};
pub use shortlink_core::{ObjectKey, ReadRedirectStore, RedirectStore};
