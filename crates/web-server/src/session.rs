use crate::{error::AppError, AppState};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// The authenticated user of a request, resolved from the session cookie.
///
/// Using this extractor is what makes a handler require a login.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.settings.session.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AppError::Unauthorized)?;

        let session = state
            .db_repo
            .find_session(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.is_expired(Utc::now()) {
            state.db_repo.delete_session(&token).await?;
            return Err(AppError::Unauthorized);
        }

        Ok(CurrentUser(session.username))
    }
}

/// Opens a new session for `username` and returns the jar carrying its cookie.
pub async fn start_session(
    state: &AppState,
    jar: CookieJar,
    username: &str,
) -> Result<CookieJar, AppError> {
    let lifetime_days = state.settings.session.lifetime_days;
    let lifetime = TimeDelta::try_days(lifetime_days)
        .ok_or_else(|| AppError::Session(format!("invalid lifetime of {lifetime_days} days")))?;
    let expires_at = Utc::now()
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::Session(format!("lifetime of {lifetime_days} days overflows")))?;

    let token = Uuid::new_v4().simple().to_string();
    state
        .db_repo
        .create_session(&token, username, expires_at)
        .await?;

    let cookie = Cookie::build((state.settings.session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(state.settings.session.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(lifetime.num_seconds()));
    Ok(jar.add(cookie))
}

/// Ends the session named by the request cookie, if any, and clears the cookie.
pub async fn end_session(state: &AppState, jar: CookieJar) -> Result<CookieJar, AppError> {
    let name = state.settings.session.cookie_name.clone();
    if let Some(cookie) = jar.get(&name) {
        state.db_repo.delete_session(cookie.value()).await?;
    }
    Ok(jar.remove(Cookie::build((name, "")).path("/")))
}
