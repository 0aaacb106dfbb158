//! Resolution of the acting user.
//!
//! Authentication itself happens upstream; the identity layer forwards the
//! authenticated user id in a trusted header (see `Config::actor_header`).

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName};

use crate::models::ActorId;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Extractor for the authenticated user of the current request.
#[derive(Debug, Clone)]
pub struct Actor(pub ActorId);

pub fn resolve_actor(headers: &HeaderMap, header: &HeaderName) -> Result<ActorId, AppError> {
    let value = headers
        .get(header)
        .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))?;

    let id = value
        .to_str()
        .map_err(|_| AppError::AuthError("Malformed actor identity".to_string()))?
        .trim();

    if id.is_empty() {
        return Err(AppError::AuthError("Authentication required".to_string()));
    }

    Ok(ActorId::new(id))
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_actor(&parts.headers, &state.actor_header).map(Actor)
    }
}
