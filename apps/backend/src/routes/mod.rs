use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod admin;
pub mod health;
pub mod players;
pub mod rounds;
pub mod views;

/// Default and upper bound for list endpoints.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Register every route. Body, query and path rejections render as problem details.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid JSON body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid query string: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid path: {err}")).into()
    }));

    cfg.configure(health::configure_routes);
    cfg.service(web::scope("/api/rounds").configure(rounds::configure_routes));
    cfg.service(web::scope("/api/players").configure(players::configure_routes));
    cfg.service(web::scope("/api/admin").configure(admin::configure_routes));
}

/// Clamp an optional `limit` query parameter into `1..=MAX_PAGE_SIZE`.
pub(crate) fn page_size(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Ids are positive; reject anything else before touching the database.
pub(crate) fn positive_id(raw: i64, code: ErrorCode, what: &str) -> Result<i64, AppError> {
    if raw > 0 {
        Ok(raw)
    } else {
        Err(AppError::invalid(code, format!("{what} id must be positive, got {raw}")))
    }
}
