use crate::{entity, repository};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("notification not exist")]
    NotificationNotExist,

    #[error("no dispatch pending for notification")]
    NoPendingDispatch,

    #[error("validation error: {0}")]
    Validation(&'static str),

    #[error("scheduling error: {0}")]
    Scheduling(&'static str),

    #[error(transparent)]
    Entity(#[from] entity::Error),

    #[error("database error: {0}")]
    Database(#[from] repository::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::warn!(err = %self);

        match self {
            Error::NotificationNotExist | Error::NoPendingDispatch => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Scheduling(_) | Error::Entity(_) | Error::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
        .into_response()
    }
}
