//! Core library for studentdesk.
//!
//! - `api`: HTTP client for the remote student store
//! - `store`: the `StudentStore` seam the sync layer talks to
//! - `sync`: reload and mutation flows, reported as roster events
//! - `roster`: view state snapshot, reducer, search filter and dialogs
//! - `config`: file and environment configuration

pub mod api;
pub mod config;
pub mod models;
pub mod mvi;
pub mod roster;
pub mod store;
pub mod sync;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use models::StudentRecord;
pub use store::StudentStore;
