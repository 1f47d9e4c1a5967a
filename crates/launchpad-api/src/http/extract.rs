//! Validated extractors: parse a request part, run the payload's own rules,
//! and short-circuit with field-level detail before any handler runs. The
//! validated value is produced fresh and handed to the handler; nothing on
//! the request is mutated in place.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::http::errors::ApiError;
use crate::models::{FieldError, Validate};

/// JSON body extractor that rejects with the validation envelope.
pub(crate) struct ValidatedJson<T>(pub(crate) T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject_body)?;
        value.validate().map_err(ApiError::validation)?;
        Ok(Self(value))
    }
}

/// Query-string extractor that rejects with the validation envelope.
pub(crate) struct ValidatedQuery<T>(pub(crate) T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(reject_query)?;
        value.validate().map_err(ApiError::validation)?;
        Ok(Self(value))
    }
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::validation(vec![FieldError::new("body", rejection.body_text())])
}

fn reject_query(rejection: QueryRejection) -> ApiError {
    ApiError::validation(vec![FieldError::new("query", rejection.body_text())])
}
