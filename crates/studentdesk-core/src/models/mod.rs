//! Data models for student records.
//!
//! - `StudentRecord`: a student as exchanged with the remote store

pub mod student;

pub use student::{sort_by_id, StudentRecord};
