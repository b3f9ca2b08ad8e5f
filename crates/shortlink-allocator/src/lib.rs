//! Short link allocation service.
//!
//! This crate provides the allocator service, the invocation request and
//! response model, and the request handler used by the `shortlink-lambda`
//! binary. Core types are re-exported from `shortlink_core`.

pub mod handler;
pub mod model;
pub mod service;

pub use handler::handle_request;
pub use model::{ShortLinkRequest, ShortLinkResponse};
pub use service::{AllocatorService, AllocatorSettings};
pub use shortlink_core::{AllocateError, AllocateParams, Allocation, Allocator};
