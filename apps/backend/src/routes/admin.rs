//! Operator endpoints. Authentication and role checks happen upstream.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use time::OffsetDateTime;

use super::positive_id;
use super::views::{AccountView, SettlementView, StartedRoundView};
use crate::db::txn::with_txn;
use crate::domain::pricing::Money;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CloseRoundBody {
    pub winning_numbers: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub struct CreditBody {
    pub amount: Money,
}

/// POST /api/admin/rounds
async fn start_round(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let lifecycle = app_state.lifecycle();
    let now = OffsetDateTime::now_utc();
    let started = with_txn(&app_state, move |txn| {
        Box::pin(async move { Ok(lifecycle.start_round(txn, now).await?) })
    })
    .await?;
    Ok(HttpResponse::Created().json(StartedRoundView::from(started)))
}

/// POST /api/admin/rounds/{round_id}/close
async fn close_round(
    path: web::Path<i64>,
    body: web::Json<CloseRoundBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let round_id = positive_id(path.into_inner(), ErrorCode::InvalidRoundId, "Round")?;
    let numbers = body.into_inner().winning_numbers;
    let lifecycle = app_state.lifecycle();
    let now = OffsetDateTime::now_utc();
    let summary = with_txn(&app_state, move |txn| {
        Box::pin(async move { Ok(lifecycle.close_round(txn, round_id, &numbers, now).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(SettlementView::from(summary)))
}

/// POST /api/admin/players/{player_id}/credits
///
/// Entry point for approved deposits (`BalanceCredited`).
async fn credit(
    path: web::Path<i64>,
    body: web::Json<CreditBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let player_id = positive_id(path.into_inner(), ErrorCode::InvalidPlayerId, "Player")?;
    let amount = body.amount;
    let accounts = app_state.accounts();
    let account = with_txn(&app_state, move |txn| {
        Box::pin(async move { Ok(accounts.credit_balance(txn, player_id, amount).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(AccountView::from(account)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/rounds", web::post().to(start_round))
        .route("/rounds/{round_id}/close", web::post().to(close_round))
        .route("/players/{player_id}/credits", web::post().to(credit));
}
