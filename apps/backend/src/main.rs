use std::sync::Arc;

use actix::Actor;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use fourline_backend::archive::LogArchive;
use fourline_backend::config::Settings;
use fourline_backend::events::LogSink;
use fourline_backend::routes;
use fourline_backend::state::AppState;
use fourline_backend::ws::hub::GameHub;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Fourline Backend on http://{}:{}",
        settings.host, settings.port
    );

    let hub = GameHub::new(settings.clone(), Arc::new(LogSink), Arc::new(LogArchive)).start();
    let data = web::Data::new(AppState::new(hub, settings.clone()));

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
