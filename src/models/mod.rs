pub mod catalog;
pub mod order;
pub mod user;

pub use catalog::{Product, ProductInfo, ProductInfoResponse, ProductResponse, Shop, ShopResponse};
pub use order::{
    AddOrderRequest,
    BasketResponse,
    ConfirmBasketRequest,
    ConfirmedBasketResponse,
    Order,
    OrderResponse,
    PartnerOrderDetail,
    PartnerOrderResponse,
    ShippingContact,
};
pub use user::{
    NewUser,
    PartnerStateRequest,
    PartnerStateResponse,
    RegisterRequest,
    SignupRequest,
    User,
    UserResponse,
};
