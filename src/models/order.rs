use serde::{Deserialize, Serialize};

use crate::errors::ValidationErrors;
use crate::models::catalog::{ProductInfo, ProductInfoResponse};
use crate::models::user::UserResponse;
use crate::validation;

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub basket_id: String,
    pub product_info_id: String,
    pub status: String,
    pub dt: String,
    pub quantity: i64,
}

/// Customer-facing order line. The stored row carries only the stock
/// record's id; the wire shape always embeds the resolved record in its
/// place, so `product` is never a bare identifier.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: String,
    pub product: ProductInfoResponse,
    pub dt: String,
    pub quantity: i64,
}

impl OrderResponse {
    pub fn from_parts(order: &Order, info: &ProductInfo) -> Self {
        Self {
            id: order.id.clone(),
            status: order.status.clone(),
            product: ProductInfoResponse::from_info(info),
            dt: order.dt.clone(),
            quantity: order.quantity,
        }
    }
}

/// Partner feed line: same product substitution, no quantity field.
#[derive(Debug, Serialize)]
pub struct PartnerOrderResponse {
    pub id: String,
    pub status: String,
    pub product: ProductInfoResponse,
    pub dt: String,
}

impl PartnerOrderResponse {
    pub fn from_parts(order: &Order, info: &ProductInfo) -> Self {
        Self {
            id: order.id.clone(),
            status: order.status.clone(),
            product: ProductInfoResponse::from_info(info),
            dt: order.dt.clone(),
        }
    }
}

/// Partner detail line with the buyer embedded.
#[derive(Debug, Serialize)]
pub struct PartnerOrderDetail {
    pub id: String,
    pub product: ProductInfoResponse,
    pub status: String,
    pub dt: String,
    pub quantity: i64,
    pub user: UserResponse,
}

impl PartnerOrderDetail {
    pub fn from_parts(order: &Order, info: &ProductInfo, user: UserResponse) -> Self {
        Self {
            id: order.id.clone(),
            product: ProductInfoResponse::from_info(info),
            status: order.status.clone(),
            dt: order.dt.clone(),
            quantity: order.quantity,
            user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BasketResponse {
    pub orders: Vec<OrderResponse>,
}

#[derive(Debug, Deserialize)]
pub struct AddOrderRequest {
    pub user_id: String,
    pub product_info_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmBasketRequest {
    pub user_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub mail: Option<String>,
    pub index: Option<String>,
}

/// Validated shipping/contact metadata for a finalized basket.
#[derive(Debug)]
pub struct ShippingContact {
    pub user_id: String,
    pub address: String,
    pub phone: String,
    pub city: String,
    pub mail: String,
    pub index: String,
}

impl ConfirmBasketRequest {
    pub fn validate(self) -> Result<ShippingContact, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let address = validation::required(&mut errors, "address", self.address);
        if let Some(v) = address.as_deref() {
            validation::non_blank(&mut errors, "address", v);
        }
        let phone = validation::required(&mut errors, "phone", self.phone);
        if let Some(v) = phone.as_deref() {
            validation::non_blank(&mut errors, "phone", v);
        }
        let city = validation::required(&mut errors, "city", self.city);
        if let Some(v) = city.as_deref() {
            validation::non_blank(&mut errors, "city", v);
        }
        let mail = validation::required(&mut errors, "mail", self.mail);
        if let Some(v) = mail.as_deref() {
            validation::email_format(&mut errors, "mail", v);
        }
        let index = validation::required(&mut errors, "index", self.index);
        if let Some(v) = index.as_deref() {
            validation::non_blank(&mut errors, "index", v);
        }

        match (address, phone, city, mail, index) {
            (Some(address), Some(phone), Some(city), Some(mail), Some(index))
                if errors.is_empty() =>
            {
                Ok(ShippingContact {
                    user_id: self.user_id,
                    address,
                    phone,
                    city,
                    mail,
                    index,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfirmedBasketResponse {
    pub address: String,
    pub phone: String,
    pub city: String,
    pub mail: String,
    pub index: String,
}

impl ConfirmedBasketResponse {
    pub fn from_contact(contact: &ShippingContact) -> Self {
        Self {
            address: contact.address.clone(),
            phone: contact.phone.clone(),
            city: contact.city.clone(),
            mail: contact.mail.clone(),
            index: contact.index.clone(),
        }
    }
}
