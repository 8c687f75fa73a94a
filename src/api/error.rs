use crate::application::{
    catalogue::SearchError, registration::RegistrationError, returns::ReturnError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Registration(RegistrationError),
    Return(ReturnError),
    Search(SearchError),
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        ApiError::Registration(err)
    }
}

impl From<ReturnError> for ApiError {
    fn from(err: ReturnError) -> Self {
        ApiError::Return(err)
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError::Search(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 404 Not Found - リクエストされたリソースが存在しない
            ApiError::Registration(RegistrationError::PatronNotFound) => (
                StatusCode::NOT_FOUND,
                "PATRON_NOT_FOUND",
                "Patron not found",
            ),
            ApiError::Registration(RegistrationError::EventNotFound) => {
                (StatusCode::NOT_FOUND, "EVENT_NOT_FOUND", "Event not found")
            }
            ApiError::Return(ReturnError::CheckoutNotFound) => (
                StatusCode::NOT_FOUND,
                "CHECKOUT_NOT_FOUND",
                "Checkout not found",
            ),

            // 409 Conflict - 既存の記録と衝突する
            ApiError::Registration(RegistrationError::AlreadyRegistered) => (
                StatusCode::CONFLICT,
                "ALREADY_REGISTERED",
                "Patron is already registered for this event",
            ),
            ApiError::Registration(RegistrationError::ScheduleConflict(_)) => (
                StatusCode::CONFLICT,
                "SCHEDULE_CONFLICT",
                "Event overlaps an existing registration",
            ),
            ApiError::Return(ReturnError::AlreadyReturned) => (
                StatusCode::CONFLICT,
                "ALREADY_RETURNED",
                "Checkout has already been returned",
            ),

            // 422 Unprocessable Entity - 所蔵状況の不変条件違反
            ApiError::Return(ReturnError::NotCatalogued) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NOT_CATALOGUED",
                "Holding is not catalogued at the branch",
            ),
            ApiError::Return(ReturnError::CatalogueCapacityExceeded) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CATALOGUE_CAPACITY_EXCEEDED",
                "Returning would exceed the number of copies held",
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Registration(RegistrationError::StoreError(ref e))
            | ApiError::Return(ReturnError::StoreError(ref e))
            | ApiError::Search(SearchError::StoreError(ref e)) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "An unexpected error occurred",
                )
            }
        };

        if status.is_client_error() {
            tracing::warn!(error_type, "Request rejected: {}", message);
        }

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
