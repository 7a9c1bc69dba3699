use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use brainshelf_core::domain::Identity;
use brainshelf_core::ports::bearer_token;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated は検証済みの呼び出し元
///
/// 本文より先に取り出されるので、トークンが無いリクエストは
/// 本文が壊れていても 401 になる。
pub struct Authenticated(pub Identity);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = bearer_token(header)?;
        let identity = state.verifier.verify(token).await?;
        Ok(Self(identity))
    }
}
