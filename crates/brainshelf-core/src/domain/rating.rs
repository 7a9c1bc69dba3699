//! Rating - 1 ユーザー 1 アプリにつき 1 件の評価
//!
//! # 集計ルール
//! - 初回の評価: sum += rating, count += 1
//! - 再評価: sum += (new - old), count は据え置き
//!
//! 集計の読み取り・書き込みは `CatalogService::rate` の楽観ロックループで行う。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::CatalogError;
use super::ids::UserId;

/// Stars は 1..=5 に検証済みの評価値
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Stars(u8);

impl Stars {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn value(self) -> i64 {
        self.0 as i64
    }
}

impl TryFrom<i64> for Stars {
    type Error = CatalogError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CatalogError::Validation(format!(
                "Rating must be between {} and {}.",
                Self::MIN,
                Self::MAX
            )))
        }
    }
}

impl From<Stars> for i64 {
    fn from(stars: Stars) -> Self {
        stars.value()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub rating: Stars,
    pub user_id: UserId,
    pub user_name: String,
    pub updated_at: DateTime<Utc>,
}

/// RatingSnapshot はトランザクション開始時点の読み取り結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSnapshot {
    /// App レコードの version（CAS トークン）
    pub version: u64,
    pub rating_sum: i64,
    pub rating_count: i64,
    pub prior: Option<Stars>,
}

/// RatingAggregate は App 側に書き戻す分子・分母
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingAggregate {
    pub rating_sum: i64,
    pub rating_count: i64,
}

impl RatingSnapshot {
    /// 新しい評価を反映した集計値を計算
    pub fn apply(&self, rating: Stars) -> RatingAggregate {
        match self.prior {
            Some(old) => RatingAggregate {
                rating_sum: self.rating_sum - old.value() + rating.value(),
                rating_count: self.rating_count,
            },
            None => RatingAggregate {
                rating_sum: self.rating_sum + rating.value(),
                rating_count: self.rating_count + 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn stars(v: i64) -> Stars {
        Stars::try_from(v).unwrap()
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-3)]
    fn stars_out_of_range_is_rejected(#[case] value: i64) {
        assert!(matches!(
            Stars::try_from(value),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn first_rating_increments_count() {
        let snapshot = RatingSnapshot {
            version: 3,
            rating_sum: 7,
            rating_count: 2,
            prior: None,
        };

        let agg = snapshot.apply(stars(4));
        assert_eq!(agg.rating_sum, 11);
        assert_eq!(agg.rating_count, 3);
    }

    #[test]
    fn re_rating_shifts_sum_by_delta() {
        // 4 -> 5 の再評価: count は据え置き、sum は +1
        let snapshot = RatingSnapshot {
            version: 1,
            rating_sum: 4,
            rating_count: 1,
            prior: Some(stars(4)),
        };

        let agg = snapshot.apply(stars(5));
        assert_eq!(agg.rating_sum, 5);
        assert_eq!(agg.rating_count, 1);
    }

    #[test]
    fn stars_deserialize_validates() {
        assert!(serde_json::from_str::<Stars>("5").is_ok());
        assert!(serde_json::from_str::<Stars>("9").is_err());
    }
}
