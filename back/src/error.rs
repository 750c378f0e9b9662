use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Any failure while handling a request. Always answered with a bare 500.
#[derive(Debug)]
pub struct AppError(eyre::Report);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {:?}", self.0);

        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<eyre::Report>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
