//! Product Routes
//!
//! Product CRUD plus the two dry-run endpoints:
//!
//! - `POST   /products`               create (201)
//! - `GET    /products`               list, `?limit&offset`
//! - `GET    /products/:id`           fetch
//! - `PUT    /products/:id`           full replacement
//! - `DELETE /products/:id`           delete (204)
//! - `POST   /products/:id/validate`  check lead data without storing it
//! - `POST   /schemas/check`          check a schema definition

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::errors::HttpResult;
use super::server::AppState;
use crate::api::{
    CheckSchemaRequest, LeadDataRequest, ListProductsResponse, ListQuery, ProductRequest,
    ProductResponse, ValidationResponse,
};

pub fn product_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/:id",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .route("/products/:id/validate", post(validate_lead_data_handler))
        .route("/schemas/check", post(check_schema_handler))
        .with_state(state)
}

async fn create_product_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> HttpResult<(StatusCode, Json<ProductResponse>)> {
    let Json(req) = payload?;
    let product = state.handler.create_product(req)?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn list_products_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> HttpResult<Json<ListProductsResponse>> {
    let query = ListQuery::from_params(&params);
    Ok(Json(state.handler.list_products(&query)?))
}

async fn get_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Json<ProductResponse>> {
    Ok(Json(state.handler.get_product(&id)?))
}

async fn update_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> HttpResult<Json<ProductResponse>> {
    let Json(req) = payload?;
    Ok(Json(state.handler.update_product(&id, req)?))
}

async fn delete_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<StatusCode> {
    state.handler.delete_product(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn validate_lead_data_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<LeadDataRequest>, JsonRejection>,
) -> HttpResult<Json<ValidationResponse>> {
    let Json(req) = payload?;
    Ok(Json(state.handler.validate_lead_data(&id, &req.data)?))
}

async fn check_schema_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckSchemaRequest>, JsonRejection>,
) -> HttpResult<Json<ValidationResponse>> {
    let Json(req) = payload?;
    Ok(Json(state.handler.check_schema(&req.schema)?))
}
