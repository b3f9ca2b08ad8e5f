//! Core types and traits for the shortlink allocator.
//!
//! This crate provides the short code and object key types, the error
//! taxonomy, and the storage and allocator contracts shared by the
//! generator, storage and allocator crates.

pub mod allocator;
pub mod error;
pub mod key;
pub mod shortcode;
pub mod store;

pub use allocator::{AllocateParams, Allocation, Allocator};
pub use error::{AllocateError, CoreError, StorageError};
pub use key::ObjectKey;
pub use shortcode::ShortCode;
pub use store::{ReadRedirectStore, RedirectStore, REDIRECT_CONTENT_TYPE};
