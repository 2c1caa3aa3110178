//! Product API endpoints

use api_types::{
    Envelope,
    product::{ProductDelete, ProductNew, ProductUpdate, ProductView},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{Product, ProductFields, User};

use crate::{ServerError, payload::Payload, server::ServerState};

pub(crate) fn product_view(product: Product) -> ProductView {
    ProductView {
        id: product.id,
        amount_available: product.amount_available,
        cost: product.cost,
        product_name: product.product_name,
        seller_id: product.seller_id,
    }
}

/// Handle requests for listing every product
pub async fn list(
    _: Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<ProductView>>>, ServerError> {
    let products = state.engine.products().await?;
    if products.is_empty() {
        return Err(ServerError::Generic("No products found".to_string()));
    }

    Ok(Json(Envelope::success(
        products.into_iter().map(product_view).collect(),
    )))
}

/// Handle requests for creating a new product owned by the caller
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Payload(payload): Payload<ProductNew>,
) -> Result<(StatusCode, Json<Envelope<ProductView>>), ServerError> {
    let product = state
        .engine
        .create_product(
            user.id,
            ProductFields {
                product_name: payload.product_name,
                cost: payload.cost,
                amount_available: payload.amount_available,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(product_view(product))),
    ))
}

/// Handle requests for replacing a product's fields
pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Payload(payload): Payload<ProductUpdate>,
) -> Result<(StatusCode, Json<Envelope<ProductView>>), ServerError> {
    let product = state
        .engine
        .update_product(
            user.id,
            payload.product_id,
            ProductFields {
                product_name: payload.product_name,
                cost: payload.cost,
                amount_available: payload.amount_available,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(product_view(product))),
    ))
}

/// Handle requests for deleting a product
pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Payload(payload): Payload<ProductDelete>,
) -> Result<Json<Envelope<String>>, ServerError> {
    state
        .engine
        .delete_product(user.id, payload.product_id)
        .await?;

    Ok(Json(Envelope::success(
        "Product deleted successfully".to_string(),
    )))
}
