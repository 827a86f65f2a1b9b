use actix_web::{web, HttpResponse};
use sqlx::{Row, SqlitePool};
use tracing::error;

use crate::models::catalog::{stocked_product_ids, Shop, ShopResponse};
use crate::state::AppState;

pub(crate) async fn load_stock_pairs(pool: &SqlitePool) -> Result<Vec<(String, String)>, sqlx::Error> {
    let rows = sqlx::query("SELECT shop_id, product_id FROM product_infos")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| (r.get::<String, _>("shop_id"), r.get::<String, _>("product_id")))
        .collect())
}

pub(crate) async fn load_shops(pool: &SqlitePool) -> Result<Vec<Shop>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, name, url FROM shops ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| Shop {
            id: r.get::<String, _>("id"),
            name: r.get::<String, _>("name"),
            url: r.try_get::<Option<String>, _>("url").unwrap_or(None),
        })
        .collect())
}

pub async fn list_shops(state: web::Data<AppState>) -> HttpResponse {
    let pool = &state.pool;

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

    let items: Vec<ShopResponse> = shops
        .iter()
        .map(|shop| ShopResponse::from_shop(shop, stocked_product_ids(&pairs, &shop.id)))
        .collect();

    HttpResponse::Ok().json(items)
}
