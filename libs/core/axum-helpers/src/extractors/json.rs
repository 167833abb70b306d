use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

/// `axum::Json` with an [`AppError`] rejection, so malformed bodies get the
/// same error envelope as every other failure.
///
/// ```ignore
/// async fn create(ApiJson(payload): ApiJson<CreateEvent>) -> impl IntoResponse { ... }
/// ```
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(data))
    }
}
