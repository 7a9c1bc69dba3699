//! Errors - エラー型と分類
//!
//! # 分類
//! - Validation: クライアントが直せる入力エラー（400）
//! - Unauthorized: トークン欠落・期限切れ・不正（401）
//! - Forbidden: 所有者以外の操作（403）
//! - NotFound / Conflict: 対象なし（404）・競合でリトライ上限（409）
//! - Store: バックエンド障害（500、詳細はログのみ）

use thiserror::Error;

/// StoreError は CatalogStore の操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    /// CAS の version 不一致
    #[error("version conflict on {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// AuthError は IdentityVerifier の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Unauthorized: Missing or invalid token")]
    Missing,

    #[error("Unauthorized: Token expired or invalid")]
    Expired,

    #[error("Unauthorized: Token expired or invalid")]
    Invalid,
}

/// CatalogError は CatalogService が返すドメインエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("too many concurrent updates to {0}, try again")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => CatalogError::NotFound(what),
            StoreError::Conflict(what) => CatalogError::Conflict(what),
            other => CatalogError::Store(other),
        }
    }
}
