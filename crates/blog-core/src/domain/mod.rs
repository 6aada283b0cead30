//! Domain entities - the core business objects.

mod comment;
mod post;
mod user;

pub use comment::{COMMENT_TIMESTAMP_FORMAT, Comment, CommentDraft};
pub use post::{POST_DATE_FORMAT, Post, PostDraft, next_post_id};
pub use user::User;
