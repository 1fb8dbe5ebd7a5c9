//! Public round queries.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::views::{RoundView, WinnerView};
use super::{page_size, positive_id};
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

/// GET /api/rounds/active
async fn get_active(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let lifecycle = app_state.lifecycle();
    let round = with_txn(&app_state, move |txn| {
        Box::pin(async move { Ok(lifecycle.get_active_round(txn).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(RoundView::from(round)))
}

/// GET /api/rounds?limit=N, newest first
async fn list(
    query: web::Query<ListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let limit = page_size(query.limit);
    let lifecycle = app_state.lifecycle();
    let rounds = with_txn(&app_state, move |txn| {
        Box::pin(async move { Ok(lifecycle.list_rounds(txn, limit).await?) })
    })
    .await?;
    let body: Vec<RoundView> = rounds.into_iter().map(RoundView::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/rounds/{round_id}
async fn get_one(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let round_id = positive_id(path.into_inner(), ErrorCode::InvalidRoundId, "Round")?;
    let lifecycle = app_state.lifecycle();
    let round = with_txn(&app_state, move |txn| {
        Box::pin(async move { Ok(lifecycle.get_round(txn, round_id).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(RoundView::from(round)))
}

/// GET /api/rounds/{round_id}/winners
async fn winners(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let round_id = positive_id(path.into_inner(), ErrorCode::InvalidRoundId, "Round")?;
    let lifecycle = app_state.lifecycle();
    let winners = with_txn(&app_state, move |txn| {
        Box::pin(async move { Ok(lifecycle.list_winners(txn, round_id).await?) })
    })
    .await?;
    let body: Vec<WinnerView> = winners.into_iter().map(WinnerView::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // "/active" first so it is never taken for a round id
    cfg.route("/active", web::get().to(get_active))
        .route("", web::get().to(list))
        .route("/{round_id}", web::get().to(get_one))
        .route("/{round_id}/winners", web::get().to(winners));
}
