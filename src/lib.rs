//! commentd - a comment resource service over a pluggable document store
//!
//! commentd exposes one resource over HTTP:
//! - `GET /` lists every comment
//! - `POST /` stores an arbitrary JSON object and returns it with its `_id`
//! - `DELETE /:id` removes a comment
//!
//! Persistence is delegated to a [`store::CommentStore`]: in memory, or one
//! JSON document per comment on local disk or S3.

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod types;

pub use error::{Error, Result};
