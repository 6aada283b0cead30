//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - Storage only
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor

pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use storage::{JsonFile, JsonPostRepository, JsonUserRepository};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
