use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use super::Role;
use crate::app::AppState;
use crate::errors::AppError;

/// The resolved, coherent representation of the current caller.
///
/// Identity lives in two places: the bearer token (the authenticated
/// principal) and the server-side session it references. A context is only
/// produced when both agree on the user id.
#[derive(Debug, Clone)]
pub struct IdentityContext {
    pub user_id: Uuid,
    pub role: Role,
    pub name: String,
    pub session_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for IdentityContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::unauthorized("Please log in"))?;

        let claims = state
            .jwt
            .decode(token)
            .map_err(|_| AppError::unauthorized("Please log in"))?;

        let session = state
            .sessions
            .get(claims.sid)
            .ok_or_else(|| AppError::unauthorized("Please log in"))?;

        if session.user_id != claims.sub {
            // Stale or tampered state must not carry privileges forward:
            // drop the session and force a fresh login.
            state.sessions.close(claims.sid);
            tracing::warn!(
                session_user = %session.user_id,
                token_user = %claims.sub,
                "session/principal mismatch, session cleared"
            );
            return Err(AppError::session_expired("Session expired, please log in again"));
        }

        Ok(IdentityContext {
            user_id: session.user_id,
            role: session.role,
            name: session.name,
            session_id: claims.sid,
        })
    }
}
