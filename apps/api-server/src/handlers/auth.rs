//! Account handlers: registration, login and the current identity.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use blog_core::domain::User;
use blog_core::error::RepoError;
use blog_core::ports::{AuthError, PasswordService, TokenService};
use blog_shared::ApiResponse;
use blog_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const DEFAULT_ROLES: [&str; 1] = ["user"];

fn issue_token(tokens: &dyn TokenService, user: &User) -> AppResult<AuthResponse> {
    let roles = DEFAULT_ROLES.iter().map(|r| r.to_string()).collect();
    let access_token = tokens.generate_token(user.id, &user.username, roles)?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let username = req.username.trim();

    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required.".to_string(),
        ));
    }

    if state.users.find_by_username(username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken.".to_string()));
    }

    let password_hash = password_service.hash(&req.password)?;
    let user = User::new(username.to_string(), password_hash);

    // A concurrent registration may still win the race; the repository
    // enforces uniqueness.
    let saved = state.users.save(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => AppError::Conflict("Username already taken.".to_string()),
        other => other.into(),
    })?;

    tracing::info!(username = %saved.username, "User registered");

    Ok(HttpResponse::Created().json(issue_token(token_service.get_ref().as_ref(), &saved)?))
}

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password_service.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %user.username, "Login rejected");
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(HttpResponse::Ok().json(issue_token(token_service.get_ref().as_ref(), &user)?))
}

/// GET /api/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserResponse {
        id: identity.user_id.to_string(),
        username: identity.username,
        roles: identity.roles,
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use crate::handlers::configure_routes;
    use crate::handlers::test_support::{data, password_service, token_service};
    use crate::state::AppState;

    #[actix_rt::test]
    async fn test_register_login_and_me() {
        let tokens = token_service();
        let passwords = password_service();
        let (tokens_data, passwords_data) = data(&tokens, &passwords);
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(AppState::in_memory(true)))
                .app_data(tokens_data)
                .app_data(passwords_data)
                .configure(configure_routes),
        )
        .await;

        let credentials = json!({ "username": "ada", "password": "s3cret" });

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_json(json!({ "username": "ada", "password": "wrong" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let login: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        let token = login["access_token"].as_str().unwrap().to_string();
        assert_eq!(login["token_type"], "Bearer");

        let me: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/me")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request(),
        )
        .await;
        assert_eq!(me["data"]["username"], "ada");
    }

    #[actix_rt::test]
    async fn test_register_rejects_blank_credentials() {
        let tokens = token_service();
        let passwords = password_service();
        let (tokens_data, passwords_data) = data(&tokens, &passwords);
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(AppState::in_memory(true)))
                .app_data(tokens_data)
                .app_data(passwords_data)
                .configure(configure_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(json!({ "username": "  ", "password": "x" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_me_requires_token() {
        let tokens = token_service();
        let passwords = password_service();
        let (tokens_data, passwords_data) = data(&tokens, &passwords);
        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(AppState::in_memory(true)))
                .app_data(tokens_data)
                .app_data(passwords_data)
                .configure(configure_routes),
        )
        .await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/me").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
