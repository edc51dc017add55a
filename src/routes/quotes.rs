use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::forms::quotes::QuoteForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::quotes;

#[post("/quotes/price")]
pub async fn price_quote(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<QuoteForm>,
) -> impl Responder {
    let (selection, design_fee_cents, _) = match form.into_inner().into_selection() {
        Ok(converted) => converted,
        Err(err) => {
            return HttpResponse::UnprocessableEntity().json(json!({ "error": err.to_string() }));
        }
    };

    match quotes::price_quote(repo.get_ref(), &selection, design_fee_cents) {
        Ok(Some(quote)) => HttpResponse::Ok().json(quote),
        // Not computable yet: the client keeps collecting selections.
        Ok(None) => HttpResponse::Ok().json(json!({ "computable": false })),
        Err(err) => error_response(err),
    }
}

#[post("/quotes")]
pub async fn save_quote(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<QuoteForm>,
) -> impl Responder {
    let (selection, design_fee_cents, reference) = match form.into_inner().into_selection() {
        Ok(converted) => converted,
        Err(err) => {
            return HttpResponse::UnprocessableEntity().json(json!({ "error": err.to_string() }));
        }
    };

    match quotes::save_quote(repo.get_ref(), &user, selection, design_fee_cents, reference) {
        Ok(booking) => HttpResponse::Created().json(booking),
        Err(err) => error_response(err),
    }
}

#[get("/bookings/{booking_id}")]
pub async fn show_booking(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    match quotes::load_booking(repo.get_ref(), &user, path.into_inner()) {
        Ok(booking) => HttpResponse::Ok().json(booking),
        Err(err) => error_response(err),
    }
}
