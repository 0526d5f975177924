//! Custom Axum extractors

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body whose decode failures become 400 validation errors
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::from(ValidationError::Malformed {
                reason: rejection.body_text(),
            })
        })?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn request(body: &str) -> Request {
        Request::post("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn decodes_valid_body() {
        let ValidJson(body) = ValidJson::<Named>::from_request(request(r#"{"name":"a"}"#), &())
            .await
            .unwrap();
        assert_eq!(body.name, "a");
    }

    #[tokio::test]
    async fn null_field_is_400() {
        let err = ValidJson::<Named>::from_request(request(r#"{"name":null}"#), &())
            .await
            .err()
            .expect("null name must be rejected");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_400() {
        let req = Request::post("/").body(Body::from("{}")).unwrap();
        let err = ValidJson::<Named>::from_request(req, &())
            .await
            .err()
            .expect("missing content type must be rejected");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
