use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

/// JSON body that has been deserialized and passed `Validate`.
///
/// Malformed bodies and constraint violations are both reported as 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// A single positive integer path parameter (`id >= 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveId(pub i64);

impl PositiveId {
    /// Accepts ASCII digits only: no sign, no surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(id_error("not_an_integer", "id must be an integer"));
        }

        if negative {
            return Err(id_error("range", "id must be greater than or equal to 1"));
        }

        let id: i64 = digits
            .parse()
            .map_err(|_| id_error("range", "id out of range"))?;

        if id < 1 {
            return Err(id_error("range", "id must be greater than or equal to 1"));
        }

        Ok(PositiveId(id))
    }
}

fn id_error(code: &'static str, message: &'static str) -> AppError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add("id", error);
    AppError::ValidationError(errors)
}

#[async_trait]
impl<S> FromRequestParts<S> for PositiveId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;

        PositiveId::parse(&raw)
    }
}
