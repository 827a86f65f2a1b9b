use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, Error};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use retail_orders_backend::{db, handlers, state::AppState};

async fn test_pool(dir: &tempfile::TempDir) -> SqlitePool {
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}", db_path.display());
    db::init_pool(&url).await.expect("pool init")
}

async fn test_app(
    pool: SqlitePool,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(pool)))
            .configure(handlers::routes),
    )
    .await
}

async fn post_json(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
    uri: &str,
    body: Value,
) -> ServiceResponse {
    let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
    test::call_service(app, req).await
}

async fn get(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
    uri: &str,
) -> ServiceResponse {
    let req = test::TestRequest::get().uri(uri).to_request();
    test::call_service(app, req).await
}

async fn register_user(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
    pool: &SqlitePool,
    email: &str,
) -> String {
    let resp = post_json(
        app,
        "/api/auth/register",
        json!({"email": email, "username": "bob", "password": "secret1"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("created user id")
}

#[actix_web::test]
async fn register_returns_email_and_username_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = test_pool(&dir).await;
    let app = test_app(pool.clone()).await;

    let resp = post_json(
        &app,
        "/api/auth/register",
        json!({"email": "a@b.co", "username": "bob", "password": "secret1"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"], json!({"email": "a@b.co", "username": "bob"}));
}

#[actix_web::test]
async fn register_stores_hash_never_plaintext() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = test_pool(&dir).await;
    let app = test_app(pool.clone()).await;

    register_user(&app, &pool, "a@b.co").await;

    let stored = sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE email = ?")
        .bind("a@b.co")
        .fetch_one(&pool)
        .await
        .expect("stored password");
    assert_ne!(stored, "secret1");
    assert!(bcrypt::verify("secret1", &stored).unwrap());
}

#[actix_web::test]
async fn register_rejects_malformed_email() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(test_pool(&dir).await).await;

    let resp = post_json(
        &app,
        "/api/auth/register",
        json!({"email": "x", "username": "bob", "password": "secret1"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"]["email"].is_array());
    assert!(body["details"].get("username").is_none());
}

#[actix_web::test]
async fn register_reports_every_violated_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(test_pool(&dir).await).await;

    let resp = post_json(&app, "/api/auth/register", json!({})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    for field in ["email", "username", "password"] {
        assert!(body["details"][field].is_array(), "missing error for {}", field);
    }
}

#[actix_web::test]
async fn signup_requires_first_and_last_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(test_pool(&dir).await).await;

    let resp = post_json(
        &app,
        "/api/auth/signup",
        json!({"email": "a@b.co", "username": "bob", "password": "secret1"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"]["first_name"].is_array());
    assert!(body["details"]["last_name"].is_array());

    let resp = post_json(
        &app,
        "/api/auth/signup",
        json!({
            "email": "a@b.co",
            "username": "bob",
            "password": "secret1",
            "first_name": "Ян",
            "last_name": "Ли"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn register_rejects_duplicate_email() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = test_pool(&dir).await;
    let app = test_app(pool.clone()).await;

    register_user(&app, &pool, "a@b.co").await;

    let resp = post_json(
        &app,
        "/api/auth/register",
        json!({"email": "a@b.co", "username": "other", "password": "secret2"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User already exists");
}

#[actix_web::test]
async fn login_verifies_password() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = test_pool(&dir).await;
    let app = test_app(pool.clone()).await;

    register_user(&app, &pool, "a@b.co").await;

    let resp = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "a@b.co", "password": "secret1"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "a@b.co");

    let resp = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "a@b.co", "password": "wrong-password"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn shops_listing_embeds_stocked_product_ids() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(test_pool(&dir).await).await;

    let resp = get(&app, "/api/shops").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let shops = body.as_array().expect("array of shops");
    let svyaznoy = shops
        .iter()
        .find(|s| s["id"] == "shop-svyaznoy")
        .expect("seeded shop");
    let products = svyaznoy["products"].as_array().unwrap();
    assert!(products.contains(&json!("product-iphone-xs")));
    assert!(products.contains(&json!("product-iphone-xr")));
}

#[actix_web::test]
async fn products_listing_embeds_shop_projections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(test_pool(&dir).await).await;

    let resp = get(&app, "/api/products").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let products = body.as_array().expect("array of products");
    let xr = products
        .iter()
        .find(|p| p["id"] == "product-iphone-xr")
        .expect("seeded product");
    let shop_ids: Vec<&str> = xr["shops"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert!(shop_ids.contains(&"shop-svyaznoy"));
    assert!(shop_ids.contains(&"shop-euroset"));
}

#[actix_web::test]
async fn basket_flow_projects_product_detail_and_confirms() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = test_pool(&dir).await;
    let app = test_app(pool.clone()).await;

    let user_id = register_user(&app, &pool, "a@b.co").await;

    // empty basket projects an empty order list, not an error
    let resp = get(&app, &format!("/api/basket/{}", user_id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"orders": []}));

    let resp = post_json(
        &app,
        "/api/basket/orders",
        json!({"user_id": user_id, "product_info_id": "info-iphone-xs-svyaznoy", "quantity": 2}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = get(&app, &format!("/api/basket/{}", user_id)).await;
    let body: Value = test::read_body_json(resp).await;
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "basket");
    assert_eq!(orders[0]["quantity"], 2);
    // the product field is always the detail shape, never a bare id
    let product = orders[0]["product"].as_object().expect("embedded product info");
    assert_eq!(product["model"], "apple/iphone/xs-max");
    assert_eq!(product["quantity"], 14);
    assert_eq!(product["price"], 110000);
    assert_eq!(product["price_rrc"], 116990);

    let resp = post_json(
        &app,
        "/api/basket/confirm",
        json!({
            "user_id": user_id,
            "address": "ул. Ленина, д. 1",
            "phone": "+7 900 000-00-00",
            "city": "Москва",
            "mail": "a@b.co",
            "index": "101000"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["city"], "Москва");
    assert_eq!(body["index"], "101000");

    // confirmed lines leave the open basket
    let resp = get(&app, &format!("/api/basket/{}", user_id)).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"orders": []}));

    // ...and show up in the partner feed without a quantity field
    let resp = get(&app, "/api/partner/orders/shop-svyaznoy").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let feed = body.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["status"], "new");
    assert!(feed[0]["product"].is_object());
    assert!(feed[0].as_object().unwrap().get("quantity").is_none());

    // the detail feed carries quantity and the buyer
    let resp = get(&app, "/api/partner/orders/shop-svyaznoy/detail").await;
    let body: Value = test::read_body_json(resp).await;
    let feed = body.as_array().unwrap();
    assert_eq!(feed[0]["quantity"], 2);
    assert_eq!(feed[0]["user"], json!({"email": "a@b.co", "username": "bob"}));
}

#[actix_web::test]
async fn confirm_reports_every_missing_contact_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(test_pool(&dir).await).await;

    let resp = post_json(&app, "/api/basket/confirm", json!({"user_id": "u1"})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    for field in ["address", "phone", "city", "mail", "index"] {
        assert!(body["details"][field].is_array(), "missing error for {}", field);
    }
}

#[actix_web::test]
async fn add_order_validates_inputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = test_pool(&dir).await;
    let app = test_app(pool.clone()).await;

    let user_id = register_user(&app, &pool, "a@b.co").await;

    let resp = post_json(
        &app,
        "/api/basket/orders",
        json!({"user_id": user_id, "product_info_id": "info-iphone-xs-svyaznoy", "quantity": 0}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json(
        &app,
        "/api/basket/orders",
        json!({"user_id": user_id, "product_info_id": "no-such-info", "quantity": 1}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn partner_state_defaults_to_inactive_and_switches() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = test_pool(&dir).await;
    let app = test_app(pool.clone()).await;

    let user_id = register_user(&app, &pool, "a@b.co").await;

    let resp = get(&app, &format!("/api/partner/state/{}", user_id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"state": false}));

    let resp = post_json(
        &app,
        "/api/partner/state",
        json!({"user_id": user_id, "state": true}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get(&app, &format!("/api/partner/state/{}", user_id)).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"state": true}));
}

#[actix_web::test]
async fn partner_orders_for_unknown_shop_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(test_pool(&dir).await).await;

    let resp = get(&app, "/api/partner/orders/no-such-shop").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
