use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::comment::Comment;
use crate::error::DomainError;

/// Calendar format of [`Post::date`].
pub const POST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Post entity - a blog entry with its embedded comments.
///
/// Optional fields carry their defaults here, once: an absent author,
/// category, tag list or comment list deserializes to an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Write payload for creating or replacing a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Post {
    /// Build a post from a validated draft, filling in defaults.
    ///
    /// `today` is used when the draft carries no date.
    pub fn from_draft(id: u64, draft: PostDraft, today: NaiveDate) -> Self {
        let date = non_empty(draft.date)
            .unwrap_or_else(|| today.format(POST_DATE_FORMAT).to_string());

        Self {
            id,
            title: draft.title.unwrap_or_default(),
            content: draft.content.unwrap_or_default(),
            author: draft.author.unwrap_or_default(),
            date,
            category: draft.category.unwrap_or_default(),
            tags: draft.tags.unwrap_or_default(),
            comments: Vec::new(),
        }
    }

    /// Merge a validated draft into this post.
    ///
    /// Title and content are replaced; the other fields only when supplied.
    /// The id and the comment thread are never touched.
    pub fn apply_update(&mut self, draft: PostDraft) {
        if let Some(title) = draft.title {
            self.title = title;
        }
        if let Some(content) = draft.content {
            self.content = content;
        }
        if let Some(author) = draft.author {
            self.author = author;
        }
        if let Some(date) = non_empty(draft.date) {
            self.date = date;
        }
        if let Some(category) = draft.category {
            self.category = category;
        }
        if let Some(tags) = draft.tags {
            self.tags = tags;
        }
    }

    /// Parsed publication date, if the stored string is a valid `YYYY-MM-DD`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, POST_DATE_FORMAT).ok()
    }

    pub fn is_authored_by(&self, username: &str) -> bool {
        self.author == username
    }

    /// Authorship check for updates and deletions.
    ///
    /// A known user may only modify posts that carry their name or no author
    /// at all. Anonymous callers are not restricted here; whether they may
    /// write at all is decided by the caller.
    pub fn ensure_editable_by(&self, username: Option<&str>) -> Result<(), DomainError> {
        match username {
            Some(name) if !self.author.is_empty() && !self.is_authored_by(name) => {
                Err(DomainError::NotAuthor(self.id))
            }
            _ => Ok(()),
        }
    }
}

/// Next identifier for a collection: highest existing id plus one, or 1.
pub fn next_post_id(posts: &[Post]) -> u64 {
    posts.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
