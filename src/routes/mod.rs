use actix_web::HttpResponse;
use serde_json::json;

use crate::services::ServiceError;

pub mod eligibility;
pub mod payments;
pub mod quotes;
pub mod webhooks;

/// Map a service error to its HTTP response.
pub(crate) fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Conflict(message) => {
            HttpResponse::Conflict().json(json!({ "error": message }))
        }
        ServiceError::Form(message) => {
            HttpResponse::UnprocessableEntity().json(json!({ "error": message }))
        }
        ServiceError::Configuration(message) => {
            log::error!("configuration error: {message}");
            HttpResponse::InternalServerError().finish()
        }
        ServiceError::Gateway(err) => {
            log::error!("gateway error: {err}");
            HttpResponse::BadGateway().json(json!({
                "error": "payment gateway unavailable, please retry"
            }))
        }
        ServiceError::Repository(err) => {
            log::error!("repository error: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
