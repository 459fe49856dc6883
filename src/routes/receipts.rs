use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::receipts::{CreateReceiptRequest, ReceiptList, ReceiptWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::ReceiptListQuery,
    services::receipt_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_receipt))
        .route("/", get(list_receipts))
        .route("/{id}", get(get_receipt))
        .route("/{id}", delete(delete_receipt))
        .route("/{id}/text", get(receipt_text))
}

#[utoipa::path(
    post,
    path = "/receipts/",
    request_body = CreateReceiptRequest,
    responses(
        (status = 201, description = "Create receipt", body = ApiResponse<ReceiptWithItems>),
        (status = 400, description = "Invalid line items or payment"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn create_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReceiptRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReceiptWithItems>>)> {
    let resp = receipt_service::create_receipt(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/receipts/",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("date_from" = Option<String>, Query, description = "Created at or after (RFC 3339)"),
        ("date_to" = Option<String>, Query, description = "Created at or before (RFC 3339)"),
        ("min_total" = Option<String>, Query, description = "Minimum receipt total"),
        ("max_total" = Option<String>, Query, description = "Maximum receipt total"),
        ("payment_type" = Option<String>, Query, description = "cash or cashless"),
    ),
    responses(
        (status = 200, description = "List own receipts, newest first", body = ApiResponse<ReceiptList>),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn list_receipts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReceiptListQuery>,
) -> AppResult<Json<ApiResponse<ReceiptList>>> {
    let resp = receipt_service::list_receipts(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/receipts/{id}",
    params(("id" = Uuid, Path, description = "Receipt ID")),
    responses(
        (status = 200, description = "Get receipt", body = ApiResponse<ReceiptWithItems>),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Receipt not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn get_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReceiptWithItems>>> {
    let resp = receipt_service::get_receipt(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/receipts/{id}/text",
    params(("id" = Uuid, Path, description = "Receipt ID")),
    responses(
        (status = 200, description = "Plain-text rendering", content_type = "text/plain"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Receipt not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn receipt_text(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<String> {
    receipt_service::render_receipt(&state, &user, id).await
}

#[utoipa::path(
    delete,
    path = "/receipts/{id}",
    params(("id" = Uuid, Path, description = "Receipt ID")),
    responses(
        (status = 200, description = "Delete receipt"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Receipt not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Receipts"
)]
pub async fn delete_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = receipt_service::delete_receipt(&state, &user, id).await?;
    Ok(Json(resp))
}
