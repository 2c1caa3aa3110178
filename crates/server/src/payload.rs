//! JSON body extractor reporting malformed bodies as invalid input.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::ServerError;

/// Drop-in replacement for [`Json`] whose rejection is rendered through
/// [`ServerError`], so that missing keys and wrong types share the envelope
/// of every other failure.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::InvalidPayload(rejection.body_text()))?;
        Ok(Self(value))
    }
}
