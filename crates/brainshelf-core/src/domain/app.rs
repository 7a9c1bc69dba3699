//! App record - カタログの 1 エントリ
//!
//! # 不変条件
//! - `rating_sum` / `rating_count` は常にペアで更新される（平均値の分子・分母）
//! - `comment_count` は best-effort の増減で維持される（実数とずれることがある）
//! - `active` は Option: フィールドが無いレコードも表現できるようにする
//! - `version` はストアが書き込みごとに進める CAS トークン（クライアントには出さない）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::CatalogError;
use super::identity::Identity;
use super::ids::{AppId, UserId};

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_PRICING: &str = "Free";

/// クライアントが選択肢として表示するカテゴリ
pub const KNOWN_CATEGORIES: &[&str] = &[
    "Note-taking",
    "PKM",
    "Task Management",
    "Whiteboard",
    "Writing",
    "All-in-one",
    "Other",
];

/// クライアントが選択肢として表示する価格帯
pub const KNOWN_PRICING: &[&str] = &["Free", "Freemium", "Paid"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: AppId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    pub pricing: String,
    #[serde(default)]
    pub rating_sum: i64,
    #[serde(default)]
    pub rating_count: i64,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub submitted_by: UserId,
    pub submitted_by_name: String,
    #[serde(default)]
    pub submitted_by_photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub version: u64,
}

impl AppRecord {
    /// 提出内容から新しいレコードを作る
    ///
    /// カウンタは 0、`active` は true で初期化する。
    pub fn new(id: AppId, fields: AppFields, submitter: &Identity, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            website_url: fields.website_url,
            tags: fields.tags,
            category: fields.category,
            pricing: fields.pricing,
            rating_sum: 0,
            rating_count: 0,
            comment_count: 0,
            active: Some(true),
            submitted_by: submitter.uid.clone(),
            submitted_by_name: submitter.display_name(),
            submitted_by_photo: submitter.picture.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Average rating, 0.0 when nobody has rated yet.
    pub fn average_rating(&self) -> f64 {
        if self.rating_count > 0 {
            self.rating_sum as f64 / self.rating_count as f64
        } else {
            0.0
        }
    }

    pub fn is_owned_by(&self, uid: &UserId) -> bool {
        &self.submitted_by == uid
    }

    /// owner edit の反映（集計値と active には触れない）
    pub fn apply_edit(&mut self, fields: AppFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.description = fields.description;
        self.website_url = fields.website_url;
        self.tags = fields.tags;
        self.category = fields.category;
        self.pricing = fields.pricing;
        self.updated_at = now;
    }
}

/// クライアントから届く未検証の入力（submission / edit 共通）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub pricing: Option<String>,
}

/// 検証・正規化済みのフィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppFields {
    pub name: String,
    pub description: String,
    pub website_url: String,
    pub tags: Vec<String>,
    pub category: String,
    pub pricing: String,
}

impl AppDraft {
    /// 検証と正規化
    ///
    /// - name / description は必須（空白のみも不可）
    /// - 文字列は trim する
    /// - tags は trim 後の空要素と重複を落とす（順序は保つ）
    /// - category / pricing は未指定・空白なら既定値
    pub fn validate(self) -> Result<AppFields, CatalogError> {
        let name = non_blank(self.name)
            .ok_or_else(|| CatalogError::Validation("App name is required.".to_string()))?;
        let description = non_blank(self.description).ok_or_else(|| {
            CatalogError::Validation("App description is required.".to_string())
        })?;

        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags.unwrap_or_default() {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        Ok(AppFields {
            name,
            description,
            website_url: self
                .website_url
                .map(|u| u.trim().to_string())
                .unwrap_or_default(),
            tags,
            category: non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            pricing: non_blank(self.pricing).unwrap_or_else(|| DEFAULT_PRICING.to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
