//! Field-aware, stable ordering of posts.

use serde::{Deserialize, Serialize};

use crate::domain::Post;

/// Fields a post collection can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Title,
    Content,
    Author,
    Date,
    Category,
    /// Number of comments.
    Comments,
    /// Number of requested tags the post carries; see [`sort_posts`].
    Tags,
}

impl SortField {
    pub const ALL: &'static [SortField] = &[
        SortField::Id,
        SortField::Title,
        SortField::Content,
        SortField::Author,
        SortField::Date,
        SortField::Category,
        SortField::Comments,
        SortField::Tags,
    ];

    /// Case-insensitive lookup by name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Content => "content",
            SortField::Author => "author",
            SortField::Date => "date",
            SortField::Category => "category",
            SortField::Comments => "comments",
            SortField::Tags => "tags",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const ALL: &'static [SortDirection] = &[SortDirection::Asc, SortDirection::Desc];

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A validated sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Comparison key extracted once per post.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Number(u64),
    Date(Option<chrono::NaiveDate>),
    Text(&'a str),
}

/// Order posts by `spec`, returning a new view over the same posts.
///
/// The sort is stable in both directions: descending flips the key comparison
/// only, so posts with equal keys keep their input order.
///
/// Dates that do not parse as `YYYY-MM-DD` sort before every valid date.
/// [`SortField::Tags`] ranks each post by how many of the comma-separated
/// names in `tag_filter` appear (case-insensitively) among its tags; without
/// a filter every post ranks zero and the input order is kept.
pub fn sort_posts<'a>(
    posts: Vec<&'a Post>,
    spec: &SortSpec,
    tag_filter: Option<&str>,
) -> Vec<&'a Post> {
    let tag_terms = tag_terms(tag_filter);

    let mut keyed: Vec<(SortKey<'a>, &'a Post)> = posts
        .into_iter()
        .map(|post| (sort_key(post, spec.field, &tag_terms), post))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match spec.direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });

    keyed.into_iter().map(|(_, post)| post).collect()
}

fn sort_key<'a>(post: &'a Post, field: SortField, tag_terms: &[String]) -> SortKey<'a> {
    match field {
        SortField::Id => SortKey::Number(post.id),
        SortField::Title => SortKey::Text(&post.title),
        SortField::Content => SortKey::Text(&post.content),
        SortField::Author => SortKey::Text(&post.author),
        SortField::Date => SortKey::Date(post.parsed_date()),
        SortField::Category => SortKey::Text(&post.category),
        SortField::Comments => SortKey::Number(post.comments.len() as u64),
        SortField::Tags => SortKey::Number(matching_tags(post, tag_terms)),
    }
}

fn tag_terms(tag_filter: Option<&str>) -> Vec<String> {
    tag_filter
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn matching_tags(post: &Post, tag_terms: &[String]) -> u64 {
    let post_tags: Vec<String> = post.tags.iter().map(|t| t.to_lowercase()).collect();
    tag_terms.iter().filter(|term| post_tags.contains(term)).count() as u64
}
