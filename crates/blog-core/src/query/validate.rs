//! Payload and parameter validation.

use crate::domain::{CommentDraft, PostDraft};
use crate::error::ValidationError;

use super::paginate::{DEFAULT_LIMIT, DEFAULT_PAGE, Pagination};
use super::sort::{SortDirection, SortField, SortSpec};

/// Names of the required post fields that are absent or blank, in field order.
///
/// An empty result means the payload is acceptable.
pub fn validate_post_fields(draft: &PostDraft) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if is_blank(draft.title.as_deref()) {
        missing.push("title");
    }
    if is_blank(draft.content.as_deref()) {
        missing.push("content");
    }
    missing
}

/// Whether a comment payload is acceptable.
///
/// `text` is always required. `author` is required only when the server does
/// not assign it from an authenticated identity.
pub fn validate_comment_fields(draft: &CommentDraft, identity_assigned: bool) -> bool {
    if is_blank(draft.text.as_deref()) {
        return false;
    }
    identity_assigned || !is_blank(draft.author.as_deref())
}

/// Validate the `sort` / `direction` pair against an allow-list.
///
/// Both are matched case-insensitively and blank values count as absent.
/// Returns `Ok(None)` when no sort was requested. The field is checked first,
/// then the direction, and only then whether a direction came without a field.
pub fn validate_sort_params(
    field: Option<&str>,
    direction: Option<&str>,
    allowed: &[SortField],
) -> Result<Option<SortSpec>, ValidationError> {
    let field = present(field).map(str::to_lowercase);
    let direction = present(direction).map(str::to_lowercase);

    let sort_field = match &field {
        None => None,
        Some(name) => Some(
            SortField::parse(name)
                .filter(|f| allowed.contains(f))
                .ok_or_else(|| ValidationError::InvalidSortField {
                    field: name.clone(),
                    allowed: names(allowed),
                })?,
        ),
    };

    let direction = match direction {
        None => None,
        Some(d) => Some(SortDirection::parse(&d).ok_or_else(|| {
            ValidationError::InvalidSortDirection {
                direction: d.clone(),
                allowed: SortDirection::ALL.iter().map(|d| d.as_str().to_string()).collect(),
            }
        })?),
    };

    match (sort_field, direction) {
        (Some(field), direction) => Ok(Some(SortSpec {
            field,
            direction: direction.unwrap_or_default(),
        })),
        (None, Some(_)) => Err(ValidationError::DirectionWithoutField {
            allowed: names(allowed),
        }),
        (None, None) => Ok(None),
    }
}

/// Parse `page` and `limit`, defaulting to page 1 of 10.
///
/// Both values are parsed before either is range-checked, so a non-integer
/// always wins over a non-positive value.
pub fn validate_pagination_params(
    page_raw: Option<&str>,
    limit_raw: Option<&str>,
) -> Result<Pagination, ValidationError> {
    let page = parse_int(page_raw, DEFAULT_PAGE)?;
    let limit = parse_int(limit_raw, DEFAULT_LIMIT)?;

    if page < 1 || limit < 1 {
        return Err(ValidationError::NonPositivePaginationParam);
    }

    Ok(Pagination {
        page: to_usize(page),
        limit: to_usize(limit),
    })
}

/// Parse an integer parameter. Well-formed integers too large for `i64`
/// saturate instead of failing.
fn parse_int(raw: Option<&str>, default: usize) -> Result<i64, ValidationError> {
    let Some(value) = raw else {
        return Ok(default as i64);
    };
    let value = value.trim();

    value.parse::<i64>().or_else(|_| {
        let (negative, digits) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value.strip_prefix('+').unwrap_or(value)),
        };
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(if negative { i64::MIN } else { i64::MAX })
        } else {
            Err(ValidationError::NonIntegerPaginationParam)
        }
    })
}

fn to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_blank(value: Option<&str>) -> bool {
    present(value).is_none()
}

fn names(fields: &[SortField]) -> Vec<String> {
    fields.iter().map(|f| f.as_str().to_string()).collect()
}
