//! mcguess HTTP server
//!
//! Actix-web front for the multiple choice guesser

pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use mcguess_common::{AppConfig, Result};
use mcguess_guesser::Resources;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use state::AppState;
pub use types::{AnswerRequest, HealthResponse};

/// Serve on `config.server_bind_address()` until shutdown
pub async fn start_server(config: AppConfig, resources: Resources) -> Result<()> {
    let workers = if config.workers > 0 {
        config.workers
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    };

    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(resources, workers)?);

    info!("Starting server on {} with {} workers", bind_addr, workers);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
