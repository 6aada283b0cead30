//! Composition of the read-path stages.

use serde::{Deserialize, Serialize};

use crate::domain::Post;
use crate::error::ValidationError;

use super::paginate::Pagination;
use super::search::{SearchCriteria, search};
use super::sort::{SortField, SortSpec, sort_posts};
use super::validate::{validate_pagination_params, validate_sort_params};

/// Raw query-string parameters as received from a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryParams {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Which read path a request is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPath {
    /// Listing: search terms are ignored.
    List,
    /// Searching: search terms filter the collection before sorting.
    Search,
}

/// A fully validated query, ready to run against a snapshot.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub criteria: Option<SearchCriteria>,
    pub sort: Option<SortSpec>,
    /// Raw `tag` parameter; ranks posts when sorting by [`SortField::Tags`].
    pub tag_filter: Option<String>,
    pub pagination: Pagination,
}

impl QueryParams {
    fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            date: self.date.clone(),
            category: self.category.clone(),
            tag: self.tag.clone(),
        }
    }

    /// Validate every parameter before any data is touched.
    ///
    /// Pagination is checked first, then the sort parameters; the first
    /// failure is returned.
    pub fn validate(&self, path: ReadPath, allowed: &[SortField]) -> Result<Query, ValidationError> {
        let pagination = validate_pagination_params(self.page.as_deref(), self.limit.as_deref())?;
        let sort = validate_sort_params(self.sort.as_deref(), self.direction.as_deref(), allowed)?;

        let criteria = match path {
            ReadPath::List => None,
            ReadPath::Search => Some(self.criteria()).filter(|c| !c.is_empty()),
        };

        Ok(Query {
            criteria,
            sort,
            tag_filter: self.tag.clone(),
            pagination,
        })
    }
}

/// Run a validated query: search, then sort, then paginate.
///
/// Returns the selected page as owned posts; `posts` is left untouched.
pub fn execute(posts: &[Post], query: &Query) -> Vec<Post> {
    let filtered: Vec<&Post> = match &query.criteria {
        Some(criteria) => search(posts, criteria),
        None => posts.iter().collect(),
    };

    let ordered = match &query.sort {
        Some(spec) => sort_posts(filtered, spec, query.tag_filter.as_deref()),
        None => filtered,
    };

    query
        .pagination
        .apply(&ordered)
        .iter()
        .map(|post| (*post).clone())
        .collect()
}

/// Validate `params` and run them against `posts`.
pub fn run(
    posts: &[Post],
    params: &QueryParams,
    path: ReadPath,
    allowed: &[SortField],
) -> Result<Vec<Post>, ValidationError> {
    let query = params.validate(path, allowed)?;
    Ok(execute(posts, &query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64, title: &str, date: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
            content: String::new(),
            author: String::new(),
            date: date.to_string(),
            category: String::new(),
            tags: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn scenario() -> Vec<Post> {
        vec![
            post(1, "Hello World", "2024-01-01"),
            post(2, "Goodbye", "2024-06-01"),
        ]
    }

    fn params() -> QueryParams {
        QueryParams::default()
    }

    fn ids(posts: &[Post]) -> Vec<u64> {
        posts.iter().map(|p| p.id).collect()
    }

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_defaults_return_first_page_in_order() {
        let posts: Vec<Post> = (1..=15).map(|id| post(id, "t", "")).collect();
        let result = run(&posts, &params(), ReadPath::List, SortField::ALL).unwrap();
        assert_eq!(ids(&result), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_search_then_paginate() {
        let posts = scenario();
        let p = QueryParams {
            title: some("hello"),
            ..params()
        };
        let result = run(&posts, &p, ReadPath::Search, SortField::ALL).unwrap();
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_list_ignores_search_terms() {
        let posts = scenario();
        let p = QueryParams {
            title: some("hello"),
            ..params()
        };
        let result = run(&posts, &p, ReadPath::List, SortField::ALL).unwrap();
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_search_without_terms_uses_everything() {
        let posts = scenario();
        let p = QueryParams {
            title: some(" "),
            ..params()
        };
        let result = run(&posts, &p, ReadPath::Search, SortField::ALL).unwrap();
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_sort_before_paginate() {
        let posts = scenario();
        let p = QueryParams {
            sort: some("date"),
            direction: some("desc"),
            page: some("1"),
            limit: some("1"),
            ..params()
        };
        let result = run(&posts, &p, ReadPath::List, SortField::ALL).unwrap();
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_second_page() {
        let posts = scenario();
        let p = QueryParams {
            page: some("2"),
            limit: some("1"),
            ..params()
        };
        let result = run(&posts, &p, ReadPath::List, SortField::ALL).unwrap();
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let posts = scenario();
        let p = QueryParams {
            page: some("5"),
            ..params()
        };
        assert!(run(&posts, &p, ReadPath::Search, SortField::ALL)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_tag_sort_reads_tag_parameter() {
        let mut posts = scenario();
        posts[1].tags = vec!["rust".to_string()];
        let p = QueryParams {
            sort: some("tags"),
            direction: some("desc"),
            tag: some("rust"),
            ..params()
        };
        let result = run(&posts, &p, ReadPath::List, SortField::ALL).unwrap();
        assert_eq!(ids(&result), vec![2, 1]);
    }

    #[test]
    fn test_direction_without_sort_halts() {
        let p = QueryParams {
            direction: some("desc"),
            ..params()
        };
        let err = run(&scenario(), &p, ReadPath::List, SortField::ALL).unwrap_err();
        assert_eq!(err.kind(), "direction_without_field");
    }

    #[test]
    fn test_pagination_errors_before_sort_errors() {
        let p = QueryParams {
            sort: some("views"),
            page: some("0"),
            ..params()
        };
        let err = run(&scenario(), &p, ReadPath::Search, SortField::ALL).unwrap_err();
        assert_eq!(err, ValidationError::NonPositivePaginationParam);

        let p = QueryParams {
            direction: some("sideways"),
            page: some("abc"),
            ..params()
        };
        let err = run(&scenario(), &p, ReadPath::List, SortField::ALL).unwrap_err();
        assert_eq!(err, ValidationError::NonIntegerPaginationParam);
    }

    #[test]
    fn test_bad_direction_reported_without_sort_field() {
        let p = QueryParams {
            direction: some("sideways"),
            ..params()
        };
        let err = run(&scenario(), &p, ReadPath::List, SortField::ALL).unwrap_err();
        assert_eq!(err.kind(), "invalid_sort_direction");
    }

    #[test]
    fn test_invalid_pagination_is_reported() {
        let p = QueryParams {
            limit: some("0"),
            ..params()
        };
        let err = run(&scenario(), &p, ReadPath::List, SortField::ALL).unwrap_err();
        assert_eq!(err, ValidationError::NonPositivePaginationParam);
    }

    #[test]
    fn test_source_collection_unchanged() {
        let posts = scenario();
        let before = posts.clone();
        let p = QueryParams {
            sort: some("title"),
            ..params()
        };
        let result = run(&posts, &p, ReadPath::List, SortField::ALL).unwrap();
        assert_eq!(ids(&result), vec![2, 1]);
        assert_eq!(posts, before);
    }
}
