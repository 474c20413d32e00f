use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{AccountId, DirectoryQuery, PageRequest, StatusFilter};
use super::intake::ProfileSubmission;
use super::repository::{ApprovalNotifier, DirectoryRepository, RepositoryError};
use super::service::{authorize_admin, DirectoryService, DirectoryServiceError, SignupRequest};

/// Router builder exposing the directory workflow over HTTP.
pub fn directory_router<R, N>(service: Arc<DirectoryService<R, N>>) -> Router
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    Router::new()
        .route("/api/v1/auth/signup", post(signup_handler::<R, N>))
        .route("/api/v1/auth/login", post(login_handler::<R, N>))
        .route("/api/v1/auth/me", get(me_handler::<R, N>))
        .route(
            "/api/v1/profile",
            get(profile_get_handler::<R, N>).post(profile_save_handler::<R, N>),
        )
        .route("/api/v1/interns/search", get(search_handler::<R, N>))
        .route("/api/v1/admin/stats", get(stats_handler::<R, N>))
        .route("/api/v1/admin/students", get(students_handler::<R, N>))
        .route(
            "/api/v1/admin/students/:id",
            get(student_detail_handler::<R, N>),
        )
        .route(
            "/api/v1/admin/students/:id/approve",
            post(approve_profile_handler::<R, N>),
        )
        .route(
            "/api/v1/admin/students/:id/reject",
            post(reject_profile_handler::<R, N>),
        )
        .route("/api/v1/admin/users", get(users_handler::<R, N>))
        .route(
            "/api/v1/admin/users/:id/approve",
            post(approve_account_handler::<R, N>),
        )
        .route(
            "/api/v1/admin/users/:id/reject",
            post(reject_account_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    pub(crate) page: Option<u32>,
    pub(crate) limit: Option<u32>,
    pub(crate) status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    pub(crate) q: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) diploma: Option<String>,
    pub(crate) page: Option<u32>,
    pub(crate) limit: Option<u32>,
}

pub(crate) async fn signup_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    axum::Json(request): axum::Json<SignupRequest>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    match service.signup(request) {
        Ok(outcome) => success(
            StatusCode::CREATED,
            "Account created successfully. Your account is pending admin approval.",
            json!({ "user": outcome.account, "status": outcome.status }),
        ),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn login_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    match service.login(&request.email, &request.password) {
        Ok(outcome) => success(
            StatusCode::OK,
            "Logged in successfully",
            json!({
                "user": outcome.account,
                "token": outcome.token,
                "expiresAt": outcome.expires_at,
            }),
        ),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn me_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    let claims = match authenticate(&service, &headers) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    match service.current_account(&claims.account_id) {
        Ok(account) => success(StatusCode::OK, "Identity fetched", json!({ "user": account })),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_get_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    let claims = match authenticate(&service, &headers) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    match service.get_profile(&claims.account_id) {
        Ok(profile) => success(StatusCode::OK, "Profile fetched successfully", profile),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_save_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
    axum::Json(submission): axum::Json<ProfileSubmission>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    let claims = match authenticate(&service, &headers) {
        Ok(claims) => claims,
        Err(response) => return response,
    };

    match service.save_profile(&claims.account_id, submission) {
        Ok(profile) => success(StatusCode::OK, "Profile updated successfully", profile),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn search_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    let query = DirectoryQuery::from_params(
        params.q.as_deref(),
        params.city.as_deref(),
        params.diploma.as_deref(),
    );
    let page = PageRequest::from_params(params.page, params.limit);

    match service.search_directory(&query, page) {
        Ok(results) => page_success("Interns fetched", results.items, results.pagination),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn stats_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    if let Err(response) = require_admin(&service, &headers) {
        return response;
    }

    match service.stats(Utc::now()) {
        Ok(stats) => success(StatusCode::OK, "Stats fetched", stats),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn students_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    if let Err(response) = require_admin(&service, &headers) {
        return response;
    }

    let filter = StatusFilter::from_param(params.status.as_deref());
    let page = PageRequest::from_params(params.page, params.limit);

    match service.list_students(filter, page) {
        Ok(results) => page_success("Students fetched", results.items, results.pagination),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn student_detail_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    if let Err(response) = require_admin(&service, &headers) {
        return response;
    }

    match service.get_student(&AccountId(id)) {
        Ok(student) => success(StatusCode::OK, "Student fetched", student),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_profile_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    if let Err(response) = require_admin(&service, &headers) {
        return response;
    }

    match service.approve_profile(&AccountId(id)) {
        Ok(student) => success(
            StatusCode::OK,
            "Student profile approved successfully",
            json!({ "user": student }),
        ),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_profile_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    if let Err(response) = require_admin(&service, &headers) {
        return response;
    }

    match service.reject_profile(&AccountId(id)) {
        Ok(student) => success(
            StatusCode::OK,
            "Student profile rejected successfully",
            json!({ "user": student }),
        ),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn users_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    if let Err(response) = require_admin(&service, &headers) {
        return response;
    }

    let filter = StatusFilter::from_param(params.status.as_deref());
    let page = PageRequest::from_params(params.page, params.limit);

    match service.list_accounts(filter, page) {
        Ok(results) => page_success("Users fetched", results.items, results.pagination),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_account_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    if let Err(response) = require_admin(&service, &headers) {
        return response;
    }

    match service.approve_account(&AccountId(id)) {
        Ok(account) => success(
            StatusCode::OK,
            "User approved successfully",
            json!({ "user": account }),
        ),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_account_handler<R, N>(
    State(service): State<Arc<DirectoryService<R, N>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    if let Err(response) = require_admin(&service, &headers) {
        return response;
    }

    match service.reject_account(&AccountId(id)) {
        Ok(account) => success(
            StatusCode::OK,
            "User rejected successfully",
            json!({ "user": account }),
        ),
        Err(err) => error_response(err),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn authenticate<R, N>(
    service: &DirectoryService<R, N>,
    headers: &HeaderMap,
) -> Result<super::auth::SessionClaims, Response>
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    let Some(token) = bearer_token(headers) else {
        return Err(error_response(DirectoryServiceError::Unauthenticated));
    };
    service.authenticate(&token).map_err(error_response)
}

fn require_admin<R, N>(
    service: &DirectoryService<R, N>,
    headers: &HeaderMap,
) -> Result<super::auth::SessionClaims, Response>
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    let claims = authenticate(service, headers)?;
    authorize_admin(&claims).map_err(error_response)?;
    Ok(claims)
}

fn success(status: StatusCode, message: &str, data: impl Serialize) -> Response {
    let body = json!({
        "success": true,
        "message": message,
        "data": data,
    });
    (status, axum::Json(body)).into_response()
}

fn page_success(message: &str, items: impl Serialize, pagination: impl Serialize) -> Response {
    let body = json!({
        "success": true,
        "message": message,
        "data": items,
        "pagination": pagination,
    });
    (StatusCode::OK, axum::Json(body)).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "success": false,
        "message": message,
        "data": serde_json::Value::Null,
    });
    (status, axum::Json(body)).into_response()
}

fn blocked(status: StatusCode, message: &str, tag: &str) -> Response {
    let body = json!({
        "success": false,
        "message": message,
        "data": { "status": tag },
    });
    (status, axum::Json(body)).into_response()
}

fn error_response(err: DirectoryServiceError) -> Response {
    match err {
        DirectoryServiceError::MissingCredentials => {
            failure(StatusCode::BAD_REQUEST, &err.to_string())
        }
        DirectoryServiceError::EmailTaken => failure(StatusCode::CONFLICT, &err.to_string()),
        DirectoryServiceError::EmailBarred => {
            blocked(StatusCode::FORBIDDEN, &err.to_string(), "REJECTED")
        }
        DirectoryServiceError::InvalidCredentials => {
            failure(StatusCode::UNAUTHORIZED, &err.to_string())
        }
        DirectoryServiceError::Rejected => {
            blocked(StatusCode::FORBIDDEN, &err.to_string(), "REJECTED")
        }
        DirectoryServiceError::PendingApproval => {
            blocked(StatusCode::FORBIDDEN, &err.to_string(), "PENDING_APPROVAL")
        }
        DirectoryServiceError::Unauthenticated => {
            failure(StatusCode::UNAUTHORIZED, &err.to_string())
        }
        DirectoryServiceError::Unauthorized => failure(StatusCode::FORBIDDEN, &err.to_string()),
        DirectoryServiceError::Validation(validation) => {
            let body = json!({
                "success": false,
                "message": "Validation error",
                "errors": validation.field_errors,
                "data": serde_json::Value::Null,
            });
            (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
        }
        DirectoryServiceError::Repository(RepositoryError::NotFound) => {
            failure(StatusCode::NOT_FOUND, "record not found")
        }
        DirectoryServiceError::Repository(RepositoryError::Conflict) => {
            failure(StatusCode::CONFLICT, "record already exists")
        }
        other => {
            error!(error = %other, "directory request failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}
