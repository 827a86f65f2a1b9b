use actix_web::{web, HttpResponse};
use sqlx::Row;
use tracing::error;

use crate::handlers::shops::{load_shops, load_stock_pairs};
use crate::models::catalog::{stocked_product_ids, Product, ProductResponse, ShopResponse};
use crate::state::AppState;

pub async fn list_products(state: web::Data<AppState>) -> HttpResponse {
    let pool = &state.pool;

    let rows = match sqlx::query("SELECT id, name, category FROM products ORDER BY name")
        .fetch_all(pool)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!("failed to load products: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    let shops = match load_shops(pool).await {
        Ok(shops) => shops,
        Err(e) => {
            error!("failed to load shops: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    let pairs = match load_stock_pairs(pool).await {
        Ok(pairs) => pairs,
        Err(e) => {
            error!("failed to load stock records: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let items: Vec<ProductResponse> = rows
        .into_iter()
        .map(|r| {
            let product = Product {
                id: r.get::<String, _>("id"),
                name: r.get::<String, _>("name"),
                category: r.try_get::<Option<String>, _>("category").unwrap_or(None),
            };
            let stocking: Vec<ShopResponse> = shops
                .iter()
                .filter(|shop| {
                    pairs
                        .iter()
                        .any(|(sid, pid)| sid == &shop.id && pid == &product.id)
                })
                .map(|shop| ShopResponse::from_shop(shop, stocked_product_ids(&pairs, &shop.id)))
                .collect();
            ProductResponse::from_product(&product, stocking)
        })
        .collect();

    HttpResponse::Ok().json(items)
}
