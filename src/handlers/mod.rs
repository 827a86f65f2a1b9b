pub mod auth;
pub mod basket;
pub mod partner;
pub mod products;
pub mod shops;

use actix_web::{web, HttpResponse};
use serde_json::json;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": "1.0.0"
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/api/auth/signup", web::post().to(auth::signup))
        .route("/api/auth/register", web::post().to(auth::register))
        .route("/api/auth/login", web::post().to(auth::login))
        .route("/api/shops", web::get().to(shops::list_shops))
        .route("/api/products", web::get().to(products::list_products))
        .route("/api/basket/orders", web::post().to(basket::add_order))
        .route("/api/basket/confirm", web::post().to(basket::confirm_basket))
        .route("/api/basket/{user_id}", web::get().to(basket::get_basket))
        .route("/api/partner/state", web::post().to(partner::update_state))
        .route("/api/partner/state/{user_id}", web::get().to(partner::get_state))
        .route("/api/partner/orders/{shop_id}", web::get().to(partner::list_orders))
        .route(
            "/api/partner/orders/{shop_id}/detail",
            web::get().to(partner::list_orders_detail),
        );
}
