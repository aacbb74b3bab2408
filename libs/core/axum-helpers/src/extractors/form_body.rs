//! Form body extractor with the standard error body on rejection.

use crate::errors::AppError;
use axum::extract::{Form, FromRequest, Request};
use serde::de::DeserializeOwned;

/// `axum::Form` with every rejection reported as `400 BAD_REQUEST`.
///
/// Covers a missing or wrong content type and a body that does not decode
/// into `T`.
#[derive(Debug, Clone)]
pub struct FormBody<T>(pub T);

impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(data) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(FormBody(data))
    }
}
