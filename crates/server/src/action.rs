//! Buyer actions: buy, deposit and reset.

use api_types::{
    Envelope,
    action::{Buy, Deposit, Deposited, PurchaseReport},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::User;

use crate::{ServerError, payload::Payload, product::product_view, server::ServerState};

/// Handle purchase requests
pub async fn buy(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Payload(payload): Payload<Buy>,
) -> Result<Json<Envelope<PurchaseReport>>, ServerError> {
    let purchase = state
        .engine
        .buy(user.id, payload.product_id, payload.quantity)
        .await?;

    Ok(Json(Envelope::success(PurchaseReport {
        change: purchase.change,
        spent: purchase.spent,
        product: product_view(purchase.product),
    })))
}

/// Handle single-coin deposits
pub async fn deposit(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Payload(payload): Payload<Deposit>,
) -> Result<(StatusCode, Json<Envelope<Deposited>>), ServerError> {
    let deposit = state.engine.deposit(user.id, payload.amount).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(Deposited { deposit })),
    ))
}

/// Handle deposit reset requests
pub async fn reset(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<Envelope<String>>), ServerError> {
    state.engine.reset_deposit(user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("Deposit reset successfully".to_string())),
    ))
}
