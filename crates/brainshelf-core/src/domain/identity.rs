//! Identity - 検証済みの呼び出し元
//!
//! 外部 identity provider が発行したトークンを `IdentityVerifier` が検証した結果。

use super::ids::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: UserId,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: UserId::new(uid),
            name: None,
            picture: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    /// 表示名（未設定なら "Anonymous"）
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "Anonymous".to_string())
    }
}
