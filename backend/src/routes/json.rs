//! JSON body extractor with validation
//!
//! Malformed bodies and bodies failing their `validator` rules are turned
//! into `ApiError`s so they share the API's error format.

use crate::error::ApiError;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use portfolio_shared::validation::validate_request;
use serde::de::DeserializeOwned;
use validator::Validate;

/// `Json<T>` that also runs `T::validate`
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        validate_request(&value)?;

        Ok(Self(value))
    }
}
