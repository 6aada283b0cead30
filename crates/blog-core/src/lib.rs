//! # Blog Core
//!
//! The domain layer of the blog API.
//! This crate contains the post model, the read-path query pipeline
//! (validate, search, sort, paginate) and the ports implemented by
//! `blog-infra`. It performs no I/O.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;

pub use error::{DomainError, ValidationError};
