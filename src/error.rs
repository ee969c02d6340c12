use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    actions::ActionError,
    data::{ApiError, StoreError},
    html,
};

/// Everything a request handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Action(ActionError::Validation { line, reason }) => {
                let back = (line > 0).then_some(line);
                let alert = html::alert(&reason.to_string(), back);
                (StatusCode::UNPROCESSABLE_ENTITY, alert).into_response()
            }
            AppError::Action(ActionError::Api(e)) | AppError::Api(e) => api_failure(e),
            AppError::Action(ActionError::Store(e)) | AppError::Store(e) => store_failure(e),
        }
    }
}

fn api_failure(e: ApiError) -> Response {
    tracing::error!(error = %e, "comment backend request failed");
    let message = match &e {
        ApiError::Status { status, body, .. } => {
            format!("The comment server answered {status}: {body}")
        }
        ApiError::Transport(_) => "The comment server could not be reached.".to_owned(),
    };
    (StatusCode::BAD_GATEWAY, html::failure(&message)).into_response()
}

fn store_failure(e: StoreError) -> Response {
    tracing::error!(error = %e, "local store failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        html::failure("Local comments could not be stored."),
    )
        .into_response()
}
