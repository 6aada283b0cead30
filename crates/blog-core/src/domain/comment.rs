use serde::{Deserialize, Serialize};

/// Format of [`Comment::timestamp`].
pub const COMMENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A comment attached to a post. The timestamp is assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Write payload for a new comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentDraft {
    pub author: Option<String>,
    pub text: Option<String>,
}
