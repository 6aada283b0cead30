//! Multi-field post search.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::Post;

/// Per-field search terms. Absent or blank terms are not applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl SearchCriteria {
    /// True when no field carries a usable term.
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.content,
            &self.author,
            &self.date,
            &self.category,
            &self.tag,
        ]
        .into_iter()
        .all(|term| term_of(term).is_none())
    }

    /// Whether `post` satisfies at least one supplied term.
    ///
    /// Text fields match by case-insensitive substring, the date by
    /// case-sensitive substring (so `2024` or `2024-06` work as prefixes),
    /// and the tag by case-insensitive equality with any of the post's tags.
    pub fn matches(&self, post: &Post) -> bool {
        contains_ci(&post.title, term_of(&self.title))
            || contains_ci(&post.content, term_of(&self.content))
            || contains_ci(&post.author, term_of(&self.author))
            || term_of(&self.date).is_some_and(|term| post.date.contains(term))
            || contains_ci(&post.category, term_of(&self.category))
            || term_of(&self.tag).is_some_and(|term| {
                let term = term.to_lowercase();
                post.tags.iter().any(|t| t.to_lowercase() == term)
            })
    }
}

/// Posts matching any supplied criterion, in collection order, each id once.
///
/// With no usable criteria every post passes through unchanged.
pub fn search<'a>(posts: &'a [Post], criteria: &SearchCriteria) -> Vec<&'a Post> {
    if criteria.is_empty() {
        return posts.iter().collect();
    }

    let mut seen = HashSet::new();
    posts
        .iter()
        .filter(|post| criteria.matches(post))
        .filter(|post| seen.insert(post.id))
        .collect()
}

// Blank terms are skipped, but a usable term is matched as given.
fn term_of(term: &Option<String>) -> Option<&str> {
    term.as_deref().filter(|t| !t.trim().is_empty())
}

fn contains_ci(haystack: &str, term: Option<&str>) -> bool {
    term.is_some_and(|term| haystack.to_lowercase().contains(&term.to_lowercase()))
}
