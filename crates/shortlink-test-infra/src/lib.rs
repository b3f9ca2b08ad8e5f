//! Disposable containers for integration tests.

pub mod error;
pub mod minio;

pub use error::{Result, TestInfraError};
