//! Read-path query pipeline over a snapshot of posts.
//!
//! Stages run in a fixed order: validate parameters, search, sort, paginate.
//! Every stage is a pure function; the caller's collection is never mutated.

mod paginate;
mod pipeline;
mod search;
mod sort;
mod validate;

pub use paginate::{DEFAULT_LIMIT, DEFAULT_PAGE, Pagination, paginate};
pub use pipeline::{Query, QueryParams, ReadPath, execute, run};
pub use search::{SearchCriteria, search};
pub use sort::{SortDirection, SortField, SortSpec, sort_posts};
pub use validate::{
    validate_comment_fields, validate_pagination_params, validate_post_fields,
    validate_sort_params,
};
