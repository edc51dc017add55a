use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

/// Logged-in user resolved from the identity cookie.
///
/// The auth service stores this struct as the identity payload at login;
/// handlers receive it as an extractor and get 401 when it is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Unique identifier of the user.
    pub id: i32,
    /// Email the user logged in with.
    pub email: String,
    /// Display name of the user.
    pub name: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload).into_inner();

        let user = identity
            .and_then(|identity| {
                identity
                    .id()
                    .map_err(|_| ErrorUnauthorized("login required"))
            })
            .and_then(|raw| {
                serde_json::from_str::<AuthenticatedUser>(&raw)
                    .map_err(|_| ErrorUnauthorized("invalid identity payload"))
            });

        ready(user)
    }
}
