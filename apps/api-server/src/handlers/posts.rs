//! Post and comment handlers.

use actix_web::{HttpResponse, web};
use chrono::Local;

use blog_core::DomainError;
use blog_core::ValidationError;
use blog_core::domain::{COMMENT_TIMESTAMP_FORMAT, Comment, CommentDraft, Post, PostDraft};
use blog_core::error::RepoError;
use blog_core::query::{
    QueryParams, ReadPath, SortField, run, validate_comment_fields, validate_post_fields,
};
use blog_shared::MessageResponse;

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Enforce the write policy: anonymous writes only when auth is not required.
fn writer(state: &AppState, identity: OptionalIdentity) -> AppResult<Option<Identity>> {
    match identity.0 {
        None if state.require_auth => Err(AppError::Unauthorized),
        identity => Ok(identity),
    }
}

async fn find_post(state: &AppState, id: u64) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::PostNotFound(id).into())
}

fn not_found_on_missing(id: u64) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound => DomainError::PostNotFound(id).into(),
        other => other.into(),
    }
}

fn check_post_fields(draft: &PostDraft) -> Result<(), ValidationError> {
    let missing = validate_post_fields(draft);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(
            missing.into_iter().map(String::from).collect(),
        ))
    }
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<QueryParams>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    let page = run(&posts, &params, ReadPath::List, SortField::ALL)?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/posts/search
pub async fn search_posts(
    state: web::Data<AppState>,
    params: web::Query<QueryParams>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    let page = run(&posts, &params, ReadPath::Search, SortField::ALL)?;
    tracing::debug!(matched = page.len(), "Search served");
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    let identity = writer(&state, identity)?;
    let mut draft = body.into_inner();
    check_post_fields(&draft)?;

    if let Some(identity) = identity {
        draft.author = Some(identity.username);
    }

    let post = Post::from_draft(0, draft, Local::now().date_naive());
    let created = state.posts.insert(post).await?;

    tracing::info!(post_id = created.id, "Post created");
    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<u64>,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    let identity = writer(&state, identity)?;
    let id = path.into_inner();
    let mut draft = body.into_inner();
    check_post_fields(&draft)?;

    let editor = identity.as_ref().map(|i| i.username.as_str());
    // Authorship is not transferable through an update.
    if editor.is_some() {
        draft.author = None;
    }

    let updated = state.posts.update(id, editor, draft).await?;
    tracing::info!(post_id = id, "Post updated");
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let identity = writer(&state, identity)?;
    let id = path.into_inner();

    let editor = identity.as_ref().map(|i| i.username.as_str());
    state.posts.remove(id, editor).await?;
    tracing::info!(post_id = id, "Post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Post with id {} has been deleted successfully.",
        id
    ))))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<u64>,
    body: web::Json<CommentDraft>,
) -> AppResult<HttpResponse> {
    let identity = writer(&state, identity)?;
    let id = path.into_inner();
    let draft = body.into_inner();

    find_post(&state, id).await?;

    if !validate_comment_fields(&draft, identity.is_some()) {
        let missing = missing_comment_fields(&draft, identity.is_some());
        return Err(ValidationError::MissingFields(missing).into());
    }

    let author = match identity {
        Some(identity) => identity.username,
        None => draft.author.unwrap_or_default(),
    };
    let comment = Comment {
        author,
        text: draft.text.unwrap_or_default(),
        timestamp: Local::now().format(COMMENT_TIMESTAMP_FORMAT).to_string(),
    };

    let post = state
        .posts
        .add_comment(id, comment)
        .await
        .map_err(not_found_on_missing(id))?;

    tracing::info!(post_id = id, comments = post.comments.len(), "Comment added");
    Ok(HttpResponse::Created().json(post))
}

fn missing_comment_fields(draft: &CommentDraft, identity_assigned: bool) -> Vec<String> {
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());

    let mut missing = Vec::new();
    if !identity_assigned && blank(&draft.author) {
        missing.push("author".to_string());
    }
    if blank(&draft.text) {
        missing.push("text".to_string());
    }
    missing
}
