use auth::IssuedSession;
use auth::SessionClaims;
use auth::SESSION_LIFETIME_HOURS;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Cookie carrying the signed session token.
pub const SESSION_COOKIE_NAME: &str = "_token";

/// Validated session claims, stored in request extensions by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionClaims);

/// Session token presented with the request, if any.
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE_NAME).map(|cookie| cookie.value())
}

/// Middleware that validates the session cookie and adds the claims to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = state
        .authenticator
        .validate_session(session_token(&jar))
        .map_err(|e| {
            tracing::warn!(
                error = %e,
                method = %req.method(),
                uri = %req.uri(),
                "Session rejected"
            );
            ApiError::from(e)
        })?;

    tracing::debug!(user_id = claims.id, admin = claims.admin, "Session accepted");
    req.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(req).await)
}

/// Build the cookie that delivers a freshly issued session.
///
/// `Secure` is not set, so browsers also send it over plain HTTP.
pub fn session_cookie(session: &IssuedSession) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(false)
        .max_age(time::Duration::hours(SESSION_LIFETIME_HOURS))
        .build()
}
