use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::payments::{CompleteRedirectQuery, SetupPaymentForm};
use crate::gateway::rest::RestDirectDebitGateway;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::payments;

#[post("/bookings/{booking_id}/payment/setup")]
pub async fn setup_payment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<RestDirectDebitGateway>,
    config: web::Data<ServerConfig>,
    path: web::Path<i32>,
    form: web::Json<SetupPaymentForm>,
) -> impl Responder {
    let details = match form.into_inner().into_customer_details() {
        Ok(details) => details,
        Err(err) => {
            return HttpResponse::UnprocessableEntity().json(json!({ "error": err.to_string() }));
        }
    };

    match payments::start_payment_setup(
        repo.get_ref(),
        gateway.get_ref(),
        &user,
        path.into_inner(),
        details,
        &config.return_base_url,
    )
    .await
    {
        Ok(setup) => HttpResponse::Ok().json(setup),
        Err(err) => error_response(err),
    }
}

#[get("/bookings/{booking_id}/payment/complete")]
pub async fn complete_payment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<RestDirectDebitGateway>,
    path: web::Path<i32>,
    query: web::Query<CompleteRedirectQuery>,
) -> impl Responder {
    match payments::complete_redirect(
        repo.get_ref(),
        gateway.get_ref(),
        &user,
        path.into_inner(),
        &query.redirect_flow_id,
    )
    .await
    {
        Ok(booking) => HttpResponse::Ok().json(booking),
        Err(err) => error_response(err),
    }
}

#[post("/bookings/{booking_id}/payment/reconcile")]
pub async fn reconcile_payment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<RestDirectDebitGateway>,
    path: web::Path<i32>,
) -> impl Responder {
    match payments::reconcile_booking(repo.get_ref(), gateway.get_ref(), &user, path.into_inner())
        .await
    {
        Ok(booking) => HttpResponse::Ok().json(booking),
        Err(err) => error_response(err),
    }
}
