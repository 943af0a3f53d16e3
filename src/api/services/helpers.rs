//! API response helpers

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::AgentHubError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// Build a JSON response
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// Build a success response
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// Build a success response with a human-readable message
pub fn success_with_message<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, message, Some(data))
}

/// Build an error response
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// Build an error response from AgentHubError (maps HTTP status and ErrorCode)
pub fn error_from_hub(err: &AgentHubError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err);
    error_response(status, error_code, err.message())
}

/// Unified Result -> HttpResponse conversion
///
/// 200 OK + JSON data on success; AgentHubError mapping otherwise.
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<AgentHubError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: AgentHubError = e.into();
            error_from_hub(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_status() {
        let response = success_response("data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Something went wrong",
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_from_hub_maps_status() {
        let err = AgentHubError::not_found("Agent not found");
        let response = error_from_hub(&err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let err = AgentHubError::validation("bad input");
        let response = error_from_hub(&err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let err = AgentHubError::database_operation("boom");
        let response = error_from_hub(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_result_ok() {
        let result: Result<&str, AgentHubError> = Ok("fine");
        let response = api_result(result);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_api_result_err() {
        let result: Result<(), AgentHubError> = Err(AgentHubError::forbidden("no"));
        let response = api_result(result);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
