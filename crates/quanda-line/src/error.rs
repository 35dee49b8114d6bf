//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid webhook signature")]
  BadSignature,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("messaging api error: {0}")]
  Messaging(#[from] reqwest::Error),

  #[error("dispatch error: {0}")]
  Dispatch(#[from] quanda_core::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::BadSignature => {
        (StatusCode::BAD_REQUEST, "invalid signature").into_response()
      }
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Messaging(e) => {
        (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
      }
      Error::Dispatch(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
