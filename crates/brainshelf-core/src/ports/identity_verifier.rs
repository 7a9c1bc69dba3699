//! IdentityVerifier port - bearer トークンの検証
//!
//! identity provider そのものはこのリポジトリの外にある。
//! ここでは「トークン → Identity」の検証だけを抽象化する。
//!
//! # 実装
//! - **JwtIdentityVerifier**: HS256 の JWT を検証する参照実装

use async_trait::async_trait;

use crate::domain::{AuthError, Identity};

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// `Authorization` ヘッダ値から bearer トークンを取り出す
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::missing(None)]
    #[case::wrong_scheme(Some("Basic abc"))]
    #[case::empty(Some("Bearer "))]
    fn bearer_token_rejects(#[case] header: Option<&str>) {
        assert_eq!(bearer_token(header), Err(AuthError::Missing));
    }

    #[test]
    fn bearer_token_extracts() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Ok("abc.def"));
    }
}
