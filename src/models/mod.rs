//! Core data models for the task organizer.
//!
//! `Bucket` and `Task` map to database rows via `sqlx::FromRow`; the types in
//! `views` are what callers receive, with display fields derived on every read.

pub mod bucket;
pub mod task;
pub mod views;
