use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::DispatchError;

/// Error body returned by every route
///
/// ```json
/// { "detail": "Invalid tool name" }
/// { "detail": [{ "type": "missing", "loc": ["vehicleType"], "msg": "Field required", "input": {} }] }
/// ```
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub detail: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<Value>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                detail: detail.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &Value {
        &self.body.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnknownTool(_) => Self::bad_request("Invalid tool name"),
            DispatchError::Validation(errors) => match serde_json::to_value(&errors) {
                Ok(detail) => Self::unprocessable(detail),
                Err(_) => Self::unprocessable(errors.to_string()),
            },
            DispatchError::Processing(message) => Self::unprocessable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ValidationErrors;
    use serde_json::json;

    #[test]
    fn test_unknown_tool_is_bad_request() {
        let err = ApiError::from(DispatchError::UnknownTool("x".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), &json!("Invalid tool name"));
    }

    #[test]
    fn test_validation_is_structured() {
        let errors = ValidationErrors::whole_payload("expected an object", json!(3));
        let err = ApiError::from(DispatchError::Validation(errors));

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail()[0]["msg"], "expected an object");
        assert_eq!(err.detail()[0]["type"], "value_error");
    }

    #[test]
    fn test_processing_is_string_detail() {
        let err = ApiError::from(DispatchError::Processing("upstream down".to_string()));

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail(), &json!("upstream down"));
    }
}
