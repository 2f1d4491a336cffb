//! Lead Routes
//!
//! - `POST   /leads`      create (201), validated against the product schema
//! - `GET    /leads`      list, `?product_id&limit&offset`
//! - `GET    /leads/:id`  fetch
//! - `PUT    /leads/:id`  replace `data`, revalidated
//! - `DELETE /leads/:id`  delete (204)

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::errors::HttpResult;
use super::server::AppState;
use crate::api::{CreateLeadRequest, LeadDataRequest, LeadResponse, ListLeadsResponse, ListQuery};

pub fn lead_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/leads", get(list_leads_handler).post(create_lead_handler))
        .route(
            "/leads/:id",
            get(get_lead_handler)
                .put(update_lead_handler)
                .delete(delete_lead_handler),
        )
        .with_state(state)
}

async fn create_lead_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateLeadRequest>, JsonRejection>,
) -> HttpResult<(StatusCode, Json<LeadResponse>)> {
    let Json(req) = payload?;
    let lead = state.handler.create_lead(req)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

async fn list_leads_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> HttpResult<Json<ListLeadsResponse>> {
    let query = ListQuery::from_params(&params);
    Ok(Json(state.handler.list_leads(&query)?))
}

async fn get_lead_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Json<LeadResponse>> {
    Ok(Json(state.handler.get_lead(&id)?))
}

async fn update_lead_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<LeadDataRequest>, JsonRejection>,
) -> HttpResult<Json<LeadResponse>> {
    let Json(req) = payload?;
    Ok(Json(state.handler.update_lead(&id, req)?))
}

async fn delete_lead_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<StatusCode> {
    state.handler.delete_lead(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
