use actix_web::{HttpRequest, HttpResponse, Responder, post, web};

use crate::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::webhooks;

/// Header the gateway carries its HMAC hex digest in.
const SIGNATURE_HEADER: &str = "Webhook-Signature";

/// Inbound event batch from the gateway. Authenticated by signature, not by
/// session; always answers quickly so the gateway does not retry storms.
#[post("/webhooks/gateway")]
pub async fn gateway_webhook(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    body: web::Bytes,
) -> impl Responder {
    let Some(signature) = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return HttpResponse::Unauthorized().finish();
    };

    match webhooks::ingest_webhook(repo.get_ref(), &body, signature, &config.webhook_secret) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response(err),
    }
}
