use actix_web::{HttpResponse, Responder, post, web};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::forms::eligibility::EligibilityForm;
use crate::services::eligibility::{EligibilityGuard, HttpIpResolver, RestPromoEligibilityApi};

type Guard = EligibilityGuard<HttpIpResolver, RestPromoEligibilityApi>;

#[post("/eligibility")]
pub async fn check_eligibility(
    _user: AuthenticatedUser,
    guard: web::Data<Guard>,
    form: web::Json<EligibilityForm>,
) -> impl Responder {
    let request = match form.into_inner().into_request() {
        Ok(request) => request,
        Err(err) => {
            return HttpResponse::UnprocessableEntity().json(json!({ "error": err.to_string() }));
        }
    };

    match guard.check(&request).await {
        Some(outcome) => HttpResponse::Ok().json(outcome),
        // No contact details yet: nothing was checked and nothing will be
        // until the client supplies an email or phone number.
        None => HttpResponse::Ok().json(json!({ "checked": false })),
    }
}
