//! Persistence for posts and users.
//!
//! Each repository keeps the full collection in memory behind an async
//! `RwLock` and optionally mirrors it to a JSON file. Writers hold the write
//! lock across persist-then-publish, so readers always see a committed
//! snapshot and a failed write leaves memory untouched.

mod json_file;
mod posts;
mod users;

pub use json_file::JsonFile;
pub use posts::JsonPostRepository;
pub use users::JsonUserRepository;
