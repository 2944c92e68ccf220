/// Success envelope for content-api
///
/// Every successful response is wrapped in the same shape:
/// `{statusCode, data, message, success: true}`. Building from the actual
/// `StatusCode` keeps the success flag and the code from disagreeing.
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.is_success(),
        }
    }

    /// 200 OK with the envelope
    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(StatusCode::OK, data, message))
    }

    /// 201 Created with the envelope
    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Created().json(Self::new(StatusCode::CREATED, data, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = ApiResponse::new(
            StatusCode::OK,
            serde_json::json!({"id": 1}),
            "Fetched successfully",
        );
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["data"]["id"], 1);
        assert_eq!(json["message"], "Fetched successfully");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_created_sets_201() {
        let envelope = ApiResponse::new(StatusCode::CREATED, (), "Created");
        assert_eq!(envelope.status_code, 201);
        assert!(envelope.success);
    }
}
