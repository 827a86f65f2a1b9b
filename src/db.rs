use sqlx::{sqlite::{SqlitePoolOptions, SqliteConnectOptions}, SqlitePool};
use std::str::FromStr;

pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_opts)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            first_name TEXT,
            last_name TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            user_id TEXT PRIMARY KEY,
            state INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
            FOREIGN KEY(user_id) REFERENCES users(id)
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            expires_at TEXT,
            FOREIGN KEY(user_id) REFERENCES users(id)
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shops (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            url TEXT
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT
        );
        "#,
    )
    .execute(&pool)
    .await?;

    // Per-shop stock records; this table is also the shop<->product relation
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_infos (
            id TEXT PRIMARY KEY,
            product_id TEXT NOT NULL,
            shop_id TEXT NOT NULL,
            model TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            price INTEGER NOT NULL,
            price_rrc INTEGER NOT NULL,
            UNIQUE(product_id, shop_id),
            FOREIGN KEY(product_id) REFERENCES products(id),
            FOREIGN KEY(shop_id) REFERENCES shops(id)
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS baskets (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id)
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id TEXT PRIMARY KEY,
            basket_id TEXT NOT NULL,
            product_info_id TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('basket','new','confirmed','assembled','sent','delivered','canceled')),
            dt TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            FOREIGN KEY(basket_id) REFERENCES baskets(id),
            FOREIGN KEY(product_info_id) REFERENCES product_infos(id)
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS confirmed_baskets (
            id TEXT PRIMARY KEY,
            basket_id TEXT NOT NULL,
            address TEXT NOT NULL,
            phone TEXT NOT NULL,
            city TEXT NOT NULL,
            mail TEXT NOT NULL,
            postal_index TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
            FOREIGN KEY(basket_id) REFERENCES baskets(id)
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO shops (id, name, url) VALUES
            ('shop-svyaznoy', 'Связной', 'https://www.svyaznoy.ru'),
            ('shop-euroset',  'Евросеть', 'https://euroset.ru');
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO products (id, name, category) VALUES
            ('product-iphone-xs',  'Смартфон Apple iPhone XS Max 512GB (золотистый)', 'Смартфоны'),
            ('product-iphone-xr',  'Смартфон Apple iPhone XR 256GB (красный)',        'Смартфоны'),
            ('product-watch-s4',   'Часы Apple Watch Series 4 44mm',                  'Часы');
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO product_infos (id, product_id, shop_id, model, quantity, price, price_rrc) VALUES
            ('info-iphone-xs-svyaznoy', 'product-iphone-xs', 'shop-svyaznoy', 'apple/iphone/xs-max',   14, 110000, 116990),
            ('info-iphone-xr-svyaznoy', 'product-iphone-xr', 'shop-svyaznoy', 'apple/iphone/xr',        9,  65000,  69990),
            ('info-iphone-xr-euroset',  'product-iphone-xr', 'shop-euroset',  'apple/iphone/xr',        6,  64500,  69990),
            ('info-watch-s4-euroset',   'product-watch-s4',  'shop-euroset',  'apple/watch/series-4',  11,  30000,  32990);
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}
