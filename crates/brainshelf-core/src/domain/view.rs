//! View - 一覧の絞り込みと並び替え
//!
//! 一覧（createdAt 降順）はフィルタをかけずに全件を返す。
//! 絞り込み・並び替えは [`CatalogQuery`] で一覧に後からかける。

use serde::{Deserialize, Serialize};

use super::app::AppRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// 一覧の順序のまま（新しい順）
    #[default]
    Newest,
    /// 平均評価の高い順
    TopRated,
    /// 評価件数の多い順
    MostReviewed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// name / description の部分一致（大文字小文字を区別しない）
    pub search: Option<String>,
    /// カテゴリの完全一致。`None` と `"All"` は絞り込みなし
    pub category: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl CatalogQuery {
    pub fn apply<'a>(&self, apps: &'a [AppRecord]) -> Vec<&'a AppRecord> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = self.category.as_deref().filter(|c| *c != "All");

        let mut out: Vec<&AppRecord> = apps
            .iter()
            .filter(|app| match &needle {
                Some(n) => {
                    app.name.to_lowercase().contains(n)
                        || app.description.to_lowercase().contains(n)
                }
                None => true,
            })
            .filter(|app| category.is_none_or(|c| app.category == c))
            .collect();

        // 安定ソート: 同点は新しい順のまま
        match self.sort {
            SortOrder::Newest => {}
            SortOrder::TopRated => {
                out.sort_by(|a, b| b.average_rating().total_cmp(&a.average_rating()))
            }
            SortOrder::MostReviewed => out.sort_by(|a, b| b.rating_count.cmp(&a.rating_count)),
        }
        out
    }
}
