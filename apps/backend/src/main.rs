use actix_web::{web, App, HttpServer};
use backend::config::db::{db_kind_from_env, RuntimeEnv};
use backend::config::game::GameConfig;
use backend::infra::state::build_state;
use backend::middleware::RequestLog;
use backend::routes;
use backend::scheduler::RoundTrigger;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker-compose env_file, or `set -a; . ./.env; set +a` locally).
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let (game, db_kind) = match GameConfig::from_env().and_then(|g| Ok((g, db_kind_from_env()?)))
    {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    let triggers_enabled = game.triggers_enabled;

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(db_kind)
        .with_game_config(game)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };
    info!(?db_kind, "Database connected");

    let shutdown = CancellationToken::new();
    let triggers = triggers_enabled.then(|| RoundTrigger::new(app_state.clone()).spawn(shutdown.clone()));
    if triggers.is_none() {
        info!("Round triggers disabled");
    }

    let data = web::Data::new(app_state);

    info!(%host, port, "Starting numbers pool backend");
    let served = HttpServer::new(move || {
        App::new()
            .wrap(RequestLog)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    shutdown.cancel();
    if let Some(handles) = triggers {
        handles.join().await;
    }
    served
}
