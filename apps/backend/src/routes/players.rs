//! Player-facing board purchase and history.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use time::OffsetDateTime;

use super::views::BoardView;
use super::{page_size, positive_id};
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::board_ledger::PurchaseRequest;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct PurchaseBody {
    pub round_id: i64,
    pub numbers: Vec<u8>,
    #[serde(default)]
    pub continuation_weeks: u32,
}

#[derive(Debug, Deserialize)]
pub struct BoardsQuery {
    pub round_id: Option<i64>,
    pub limit: Option<u64>,
}

/// POST /api/players/{player_id}/boards
async fn purchase(
    path: web::Path<i64>,
    body: web::Json<PurchaseBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let player_id = positive_id(path.into_inner(), ErrorCode::InvalidPlayerId, "Player")?;
    let body = body.into_inner();
    let request = PurchaseRequest {
        player_id,
        round_id: body.round_id,
        numbers: body.numbers,
        continuation_weeks: body.continuation_weeks,
    };
    let ledger = app_state.ledger();
    let now = OffsetDateTime::now_utc();
    let board = with_txn(&app_state, move |txn| {
        Box::pin(async move { Ok(ledger.purchase_board(txn, request, now).await?) })
    })
    .await?;
    Ok(HttpResponse::Created().json(BoardView::from(board)))
}

/// GET /api/players/{player_id}/boards?round_id=&limit=
async fn list(
    path: web::Path<i64>,
    query: web::Query<BoardsQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let player_id = positive_id(path.into_inner(), ErrorCode::InvalidPlayerId, "Player")?;
    let round_id = query.round_id;
    let limit = page_size(query.limit);
    let ledger = app_state.ledger();
    let boards = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            Ok(ledger
                .list_player_boards(txn, player_id, round_id, limit)
                .await?)
        })
    })
    .await?;
    let body: Vec<BoardView> = boards.into_iter().map(BoardView::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{player_id}/boards")
            .route(web::post().to(purchase))
            .route(web::get().to(list)),
    );
}
