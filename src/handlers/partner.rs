use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::Row;
use tracing::error;

use crate::handlers::basket::{order_with_info, ORDER_WITH_INFO_COLUMNS};
use crate::models::order::{PartnerOrderDetail, PartnerOrderResponse};
use crate::models::user::{PartnerStateRequest, PartnerStateResponse, UserResponse};
use crate::state::AppState;

pub async fn get_state(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let user_id = path.into_inner();

    match sqlx::query_scalar::<_, bool>("SELECT state FROM user_profiles WHERE user_id = ?")
        .bind(&user_id)
        .fetch_optional(&state.pool)
        .await
    {
        Ok(flag) => HttpResponse::Ok().json(PartnerStateResponse {
            state: flag.unwrap_or(false),
        }),
        Err(e) => {
            error!("failed to load partner state: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn update_state(
    data: web::Json<PartnerStateRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let req = data.into_inner();
    let pool = &state.pool;

    match sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM users WHERE id = ?")
        .bind(&req.user_id)
        .fetch_one(pool)
        .await
    {
        Ok(0) => return HttpResponse::NotFound().json(json!({"error": "User not found"})),
        Ok(_) => {}
        Err(e) => {
            error!("failed to look up user: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    let res = sqlx::query(
        "INSERT INTO user_profiles (user_id, state) VALUES (?, ?) \
         ON CONFLICT(user_id) DO UPDATE SET \
            state = excluded.state, \
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ','now')"
    )
    .bind(&req.user_id)
    .bind(req.state)
    .execute(pool)
    .await;

    match res {
        Ok(_) => HttpResponse::Ok().json(json!({"status": "ok", "state": req.state})),
        Err(e) => {
            error!("failed to update partner state: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn shop_exists(pool: &sqlx::SqlitePool, shop_id: &str) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM shops WHERE id = ?")
        .bind(shop_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Orders placed against the shop's stock, brief shape.
pub async fn list_orders(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let shop_id = path.into_inner();
    let pool = &state.pool;

    match shop_exists(pool, &shop_id).await {
        Ok(false) => return HttpResponse::NotFound().json(json!({"error": "Shop not found"})),
        Ok(true) => {}
        Err(e) => {
            error!("failed to look up shop: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    let sql = format!(
        "SELECT {} FROM orders o JOIN product_infos p ON p.id = o.product_info_id \
         WHERE p.shop_id = ? AND o.status != 'basket' ORDER BY datetime(o.dt) DESC",
        ORDER_WITH_INFO_COLUMNS
    );
    match sqlx::query(&sql).bind(&shop_id).fetch_all(pool).await {
        Ok(rows) => {
            let items: Vec<PartnerOrderResponse> = rows
                .iter()
                .map(|r| {
                    let (order, info) = order_with_info(r);
                    PartnerOrderResponse::from_parts(&order, &info)
                })
                .collect();
            HttpResponse::Ok().json(items)
        }
        Err(e) => {
            error!("failed to load partner orders: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Same feed with quantity and the buyer embedded.
pub async fn list_orders_detail(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let shop_id = path.into_inner();
    let pool = &state.pool;

    match shop_exists(pool, &shop_id).await {
        Ok(false) => return HttpResponse::NotFound().json(json!({"error": "Shop not found"})),
        Ok(true) => {}
        Err(e) => {
            error!("failed to look up shop: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    let sql = format!(
        "SELECT {}, u.email, u.username FROM orders o \
         JOIN product_infos p ON p.id = o.product_info_id \
         JOIN baskets b ON b.id = o.basket_id \
         JOIN users u ON u.id = b.user_id \
         WHERE p.shop_id = ? AND o.status != 'basket' ORDER BY datetime(o.dt) DESC",
        ORDER_WITH_INFO_COLUMNS
    );
    match sqlx::query(&sql).bind(&shop_id).fetch_all(pool).await {
        Ok(rows) => {
            let items: Vec<PartnerOrderDetail> = rows
                .iter()
                .map(|r| {
                    let (order, info) = order_with_info(r);
                    let user = UserResponse {
                        email: r.get::<String, _>("email"),
                        username: r.get::<String, _>("username"),
                    };
                    PartnerOrderDetail::from_parts(&order, &info, user)
                })
                .collect();
            HttpResponse::Ok().json(items)
        }
        Err(e) => {
            error!("failed to load partner order details: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
