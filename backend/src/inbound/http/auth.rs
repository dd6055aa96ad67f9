//! Caller identity extraction.
//!
//! An upstream auth proxy authenticates the caller and forwards the numeric
//! user id in the `x-user-id` header. Handlers take [`AuthenticatedUser`] as
//! an argument to require it.

use std::future::{Ready, ready};
use std::str::FromStr;

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::{Error, UserId};

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller resolved from [`USER_ID_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// The caller's user id.
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

fn user_id_from_headers(headers: &HeaderMap) -> Result<UserId, Error> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| Error::invalid_request("missing authenticated user id"))?
        .to_str()
        .map_err(|_| Error::invalid_request("authenticated user id is not ASCII"))?;
    UserId::from_str(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(user_id_from_headers(req.headers()).map(Self))
    }
}
