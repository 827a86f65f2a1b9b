use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::error;
use uuid::Uuid;

use crate::models::catalog::ProductInfo;
use crate::models::order::{
    AddOrderRequest, BasketResponse, ConfirmBasketRequest, ConfirmedBasketResponse, Order,
    OrderResponse,
};
use crate::state::AppState;

pub(crate) const ORDER_WITH_INFO_COLUMNS: &str =
    "o.id, o.basket_id, o.product_info_id, o.status, o.dt, o.quantity, \
     p.id AS info_id, p.product_id, p.shop_id, p.model, p.quantity AS stock_quantity, \
     p.price, p.price_rrc";

pub(crate) fn order_with_info(row: &SqliteRow) -> (Order, ProductInfo) {
    let order = Order {
        id: row.get::<String, _>("id"),
        basket_id: row.get::<String, _>("basket_id"),
        product_info_id: row.get::<String, _>("product_info_id"),
        status: row.get::<String, _>("status"),
        dt: row.get::<String, _>("dt"),
        quantity: row.get::<i64, _>("quantity"),
    };
    let info = ProductInfo {
        id: row.get::<String, _>("info_id"),
        product_id: row.get::<String, _>("product_id"),
        shop_id: row.get::<String, _>("shop_id"),
        model: row.get::<String, _>("model"),
        quantity: row.get::<i64, _>("stock_quantity"),
        price: row.get::<i64, _>("price"),
        price_rrc: row.get::<i64, _>("price_rrc"),
    };
    (order, info)
}

pub async fn get_basket(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let user_id = path.into_inner();
    let pool = &state.pool;

    let basket_id = match sqlx::query_scalar::<_, String>("SELECT id FROM baskets WHERE user_id = ?")
        .bind(&user_id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(id)) => id,
        Ok(None) => return HttpResponse::Ok().json(BasketResponse { orders: Vec::new() }),
        Err(e) => {
            error!("failed to load basket: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let sql = format!(
        "SELECT {} FROM orders o JOIN product_infos p ON p.id = o.product_info_id \
         WHERE o.basket_id = ? AND o.status = 'basket' ORDER BY datetime(o.dt) ASC",
        ORDER_WITH_INFO_COLUMNS
    );
    match sqlx::query(&sql).bind(&basket_id).fetch_all(pool).await {
        Ok(rows) => {
            let orders: Vec<OrderResponse> = rows
                .iter()
                .map(|r| {
                    let (order, info) = order_with_info(r);
                    OrderResponse::from_parts(&order, &info)
                })
                .collect();
            HttpResponse::Ok().json(BasketResponse { orders })
        }
        Err(e) => {
            error!("failed to load basket orders: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn add_order(data: web::Json<AddOrderRequest>, state: web::Data<AppState>) -> HttpResponse {
    let req = data.into_inner();
    let pool = &state.pool;

    if req.quantity < 1 {
        return HttpResponse::BadRequest().json(json!({"error": "quantity must be at least 1"}));
    }

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

    match sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM product_infos WHERE id = ?")
        .bind(&req.product_info_id)
        .fetch_one(pool)
        .await
    {
        Ok(0) => return HttpResponse::NotFound().json(json!({"error": "Product info not found"})),
        Ok(_) => {}
        Err(e) => {
            error!("failed to look up product info: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    // reuse the user's basket or open one
    let basket_id = match sqlx::query_scalar::<_, String>("SELECT id FROM baskets WHERE user_id = ?")
        .bind(&req.user_id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(id)) => id,
        Ok(None) => {
            let new_id = Uuid::new_v4().to_string();
            let now = chrono::Utc::now().to_rfc3339();
            if let Err(e) = sqlx::query("INSERT INTO baskets (id, user_id, created_at) VALUES (?, ?, ?)")
                .bind(&new_id)
                .bind(&req.user_id)
                .bind(&now)
                .execute(pool)
                .await
            {
                error!("failed to create basket: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            new_id
        }
        Err(e) => {
            error!("failed to load basket: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let order_id = Uuid::new_v4().to_string();
    let dt = chrono::Utc::now().to_rfc3339();
    if let Err(e) = sqlx::query(
        "INSERT INTO orders (id, basket_id, product_info_id, status, dt, quantity) VALUES (?, ?, ?, 'basket', ?, ?)"
    )
    .bind(&order_id)
    .bind(&basket_id)
    .bind(&req.product_info_id)
    .bind(&dt)
    .bind(req.quantity)
    .execute(pool)
    .await
    {
        error!("failed to add order: {e}");
        return HttpResponse::InternalServerError().json(json!({"error": "Failed to add order"}));
    }

    HttpResponse::Created().json(json!({"status": "ok", "id": order_id}))
}

pub async fn confirm_basket(
    data: web::Json<ConfirmBasketRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let contact = match data.into_inner().validate() {
        Ok(contact) => contact,
        Err(errors) => {
            return HttpResponse::BadRequest().json(json!({
                "error": "validation failed",
                "details": errors
            }));
        }
    };
    let pool = &state.pool;

    let basket_id = match sqlx::query_scalar::<_, String>("SELECT id FROM baskets WHERE user_id = ?")
        .bind(&contact.user_id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(id)) => id,
        Ok(None) => return HttpResponse::NotFound().json(json!({"error": "Basket not found"})),
        Err(e) => {
            error!("failed to load basket: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(1) FROM orders WHERE basket_id = ? AND status = 'basket'"
    )
    .bind(&basket_id)
    .fetch_one(pool)
    .await
    {
        Ok(0) => return HttpResponse::BadRequest().json(json!({"error": "Basket is empty"})),
        Ok(_) => {}
        Err(e) => {
            error!("failed to count basket orders: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    if let Err(e) = sqlx::query(
        "INSERT INTO confirmed_baskets (id, basket_id, address, phone, city, mail, postal_index) VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&basket_id)
    .bind(&contact.address)
    .bind(&contact.phone)
    .bind(&contact.city)
    .bind(&contact.mail)
    .bind(&contact.index)
    .execute(pool)
    .await
    {
        error!("failed to confirm basket: {e}");
        return HttpResponse::InternalServerError().json(json!({"error": "Failed to confirm basket"}));
    }

    if let Err(e) = sqlx::query(
        "UPDATE orders SET status = 'new' WHERE basket_id = ? AND status = 'basket'"
    )
    .bind(&basket_id)
    .execute(pool)
    .await
    {
        error!("failed to move basket orders to new: {e}");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok().json(ConfirmedBasketResponse::from_contact(&contact))
}
