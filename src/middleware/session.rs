use axum::{
    extract::{Request, State},
    http::{header::SET_COOKIE, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::services::session_store::{SessionHandle, SessionStore};

pub const SESSION_COOKIE: &str = "assessment_sid";

/// The caller's session, inserted into request extensions by [`session_middleware`].
#[derive(Clone)]
pub struct CurrentSession(pub SessionHandle);

pub async fn session_middleware(
    State(store): State<SessionStore>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let presented = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let session = store.get_or_create(presented.as_deref()).await;
    req.extensions_mut()
        .insert(CurrentSession(session.handle.clone()));

    let mut response = next.run(req).await;
    if session.created {
        let cookie = Cookie::build((SESSION_COOKIE, session.id))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .build();
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Could not encode session cookie"),
        }
    }
    response
}
