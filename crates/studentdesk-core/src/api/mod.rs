//! REST API client module for the remote student store.
//!
//! This module provides the `ApiClient` for the four student endpoints
//! (list, create, update, delete). Requests carry no authentication.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
