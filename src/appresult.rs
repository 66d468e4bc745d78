use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::{forms::ValidationErrors, include_res, res};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client. Internal failures are logged and masked.
    fn public_message(&self) -> String {
        match self {
            AppError::Internal(err) => {
                error!(error = ?err, "internal error");
                "internal server error".to_owned()
            }
            other => {
                warn!(error = %other, "request rejected");
                other.to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = include_res!(str, "/pages/error.html")
            .replace("{status}", status.as_str())
            .replace("{message}", &res::escape(&self.public_message()));

        (status, Html(body)).into_response()
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(sqlx::Error);
apperr_impl!(serde_json::Error);
apperr_impl!(tower_sessions::session::Error);

/// JSON flavour of [`AppError`] for the `/api` routes.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let body = Json(json!({
            "error": self.0.public_message(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FieldError;

    #[test]
    fn maps_kinds_to_status_codes() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("carpool 9".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(ValidationErrors::from(vec![FieldError::new("name", "required")])).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_stay_out_of_the_body() {
        let err = AppError::Internal(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.public_message(), "internal server error");
    }
}
