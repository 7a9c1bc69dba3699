//! Liveness - URL の到達性判定と差分
//!
//! # 判定
//! - 2xx のレスポンス → reachable
//! - それ以外のステータス、タイムアウト、通信エラー → unreachable
//!
//! # 差分
//! - 判定結果と保存済みの `active` が異なるときだけ `ActiveUpdate` を作る
//! - `active` が未設定のレコードは常に「異なる」扱い（初回 sweep で埋まる）

use chrono::{DateTime, Utc};

use super::app::AppRecord;
use super::ids::AppId;

/// ProbeOutcome は 1 回の probe の観測結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// HTTP レスポンスを受け取った
    Status(u16),
    /// タイムアウト
    TimedOut,
    /// 接続失敗・不正な URL など
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Status(code) if (200..=299).contains(code))
    }
}

/// ActiveUpdate は batch commit に積まれる 1 件分の更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUpdate {
    pub app_id: AppId,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

/// 観測結果と保存済み状態を比べ、変化があれば更新を返す
pub fn diff_active(
    record: &AppRecord,
    outcome: &ProbeOutcome,
    now: DateTime<Utc>,
) -> Option<ActiveUpdate> {
    let is_active = outcome.is_reachable();
    if record.active == Some(is_active) {
        return None;
    }
    Some(ActiveUpdate {
        app_id: record.id,
        active: is_active,
        updated_at: now,
    })
}
