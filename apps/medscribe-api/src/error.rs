use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;

use medscribe_service::Error as ServiceError;

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	pub fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}

	pub fn bad_request(message: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
	}

	pub fn payload_too_large(message: impl Into<String>) -> Self {
		Self::new(StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", message)
	}

	pub fn rate_limited(message: impl Into<String>) -> Self {
		Self::new(StatusCode::TOO_MANY_REQUESTS, "rate_limited", message)
	}

	/// Client errors keep their message. Server errors are logged and replaced by `fallback`.
	pub fn from_service(err: ServiceError, fallback: &str) -> Self {
		match err {
			ServiceError::Validation { message } => Self::bad_request(message),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::SecurityRejection { message } =>
				Self::new(StatusCode::BAD_REQUEST, "security_rejection", message),
			ServiceError::ExternalService { message } => {
				tracing::error!(error = %message, operation = fallback, "External service failure.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "external_service_error", fallback)
			},
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, operation = fallback, "Storage failure.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", fallback)
			},
		}
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		Self::from_service(err, "Internal server error")
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, error: self.message };

		(self.status, Json(body)).into_response()
	}
}
