use serde::{Deserialize, Serialize};

/// Outcome class carried by every response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseCode {
    Success,
    BadRequest,
    Unauthorized,
    InvalidInput,
    ServerError,
}

/// Uniform response body: `{"code": ..., "response": ...}`.
///
/// On failure `response` is a human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: ResponseCode,
    pub response: T,
}

impl<T> Envelope<T> {
    pub fn success(response: T) -> Self {
        Self {
            code: ResponseCode::Success,
            response,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    #[serde(alias = "buyer")]
    Buyer,
    #[serde(alias = "seller")]
    Seller,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserRegister {
        pub username: String,
        pub password: String,
        /// Missing means BUYER.
        pub role: Option<Role>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserLogin {
        pub username: String,
        pub password: String,
    }

    /// Public view of a user. The password is never part of it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub deposit: i64,
        pub role: Role,
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductView {
        pub id: i32,
        pub amount_available: i64,
        pub cost: i64,
        pub product_name: String,
        pub seller_id: i32,
    }

    /// Body for creating a product. Any `sellerId` sent by the client is
    /// ignored.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNew {
        pub product_name: String,
        pub cost: i64,
        pub amount_available: i64,
    }

    /// Full replacement of a product's editable fields.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductUpdate {
        #[serde(rename = "product_id", alias = "productId")]
        pub product_id: i32,
        pub product_name: String,
        pub cost: i64,
        pub amount_available: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductDelete {
        #[serde(alias = "productId")]
        pub product_id: i32,
    }
}

pub mod action {
    use super::*;
    use crate::product::ProductView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Buy {
        #[serde(alias = "productId")]
        pub product_id: i32,
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Deposit {
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Deposited {
        /// Balance after the deposit.
        pub deposit: i64,
    }

    /// Result of a purchase.
    ///
    /// `change` is the remaining deposit, not a coin breakdown.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseReport {
        pub change: i64,
        #[serde(rename = "spending")]
        pub spent: i64,
        pub product: ProductView,
    }
}
