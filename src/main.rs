use actix_cors::Cors;
use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use retail_orders_backend::{db, handlers, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .unwrap_or(8080);
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://orders.db".to_string());

    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to initialize SQLite pool");
    let app_state = web::Data::new(AppState::new(pool));

    info!(port, "starting retail orders backend");

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .configure(handlers::routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
