//! Domain identifiers (strongly-typed IDs).
//!
//! ULID ベースの ID を Phantom type パターンで型付けします。
//!
//! ## ULID の特性
//! - **時刻でソート可能**: 生成順序 = 作成順序（一覧の tie-break に使う）
//! - **分散生成可能**: ストアに採番を頼らなくてよい
//!
//! ## 表現
//! - Display / wire 形式は `<prefix><ulid>`（例: `app-01HV...`）
//! - パスパラメータからは `FromStr` で復元する

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"app-", "comment-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `AppId` と `CommentId` は異なる型なので混同できない。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// ULID から Id を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// ParseIdError は `FromStr` の失敗
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id '{0}'")]
pub struct ParseIdError(pub String);

impl<T: IdMarker> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix(T::prefix())
            .ok_or_else(|| ParseIdError(s.to_string()))?;
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// App（カタログの 1 エントリ）のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum App {}

impl IdMarker for App {
    fn prefix() -> &'static str {
        "app-"
    }
}

/// Comment のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Comment {}

impl IdMarker for Comment {
    fn prefix() -> &'static str {
        "comment-"
    }
}

pub type AppId = Id<App>;
pub type CommentId = Id<Comment>;

/// UserId は外部 identity provider が発行する uid
///
/// こちらで採番しないので ULID ではなく文字列のまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefix() {
        let app_id = AppId::from_ulid(Ulid::new());
        let comment_id = CommentId::from_ulid(Ulid::new());

        assert!(app_id.to_string().starts_with("app-"));
        assert!(comment_id.to_string().starts_with("comment-"));
    }

    #[test]
    fn parse_accepts_own_prefix_only() {
        let app_id = AppId::from_ulid(Ulid::new());
        let text = app_id.to_string();

        assert_eq!(text.parse::<AppId>().unwrap(), app_id);
        // comment- のプレフィックスで AppId は作れない
        let err = text.replacen("app-", "comment-", 1).parse::<AppId>();
        assert!(err.is_err());
        assert!("app-not-a-ulid".parse::<AppId>().is_err());
    }

    #[test]
    fn serializes_as_display_string() {
        let app_id = AppId::from_ulid(Ulid::new());
        let json = serde_json::to_value(app_id).unwrap();
        assert_eq!(json, serde_json::Value::String(app_id.to_string()));

        let back: AppId = serde_json::from_value(json).unwrap();
        assert_eq!(back, app_id);
    }
}
