use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
}

/// Per-shop stock record for a product.
#[derive(Debug, Clone)]
pub struct ProductInfo {
    pub id: String,
    pub product_id: String,
    pub shop_id: String,
    pub model: String,
    pub quantity: i64,
    pub price: i64,
    pub price_rrc: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopResponse {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub products: Vec<String>,
}

impl ShopResponse {
    pub fn from_shop(shop: &Shop, products: Vec<String>) -> Self {
        Self {
            id: shop.id.clone(),
            name: shop.name.clone(),
            url: shop.url.clone(),
            products,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub shops: Vec<ShopResponse>,
}

impl ProductResponse {
    pub fn from_product(product: &Product, shops: Vec<ShopResponse>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            shops,
        }
    }
}

/// Detail shape for a stock record; ids stay internal.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInfoResponse {
    pub model: String,
    pub quantity: i64,
    pub price: i64,
    pub price_rrc: i64,
}

impl ProductInfoResponse {
    pub fn from_info(info: &ProductInfo) -> Self {
        Self {
            model: info.model.clone(),
            quantity: info.quantity,
            price: info.price,
            price_rrc: info.price_rrc,
        }
    }
}

/// Product ids stocked by a shop, from (shop_id, product_id) stock pairs.
pub fn stocked_product_ids(pairs: &[(String, String)], shop_id: &str) -> Vec<String> {
    let mut ids = Vec::new();
    for (sid, pid) in pairs {
        if sid == shop_id && !ids.contains(pid) {
            ids.push(pid.clone());
        }
    }
    ids
}
