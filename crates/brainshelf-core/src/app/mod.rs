//! App - アプリケーション層
//!
//! ports を組み合わせてアプリケーションロジックを実装する。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **CatalogService**: 登録・一覧・編集・評価・コメント
//! - **LivenessSweep**: websiteUrl の probe と `active` の一括更新
//! - **SweepLoop**: DailySchedule に従って sweep を回す

pub mod builder;
pub mod catalog;
pub mod liveness_sweep;
pub mod schedule;
pub mod sweep_loop;

pub use self::builder::{App, AppBuilder, BuildError};
pub use self::catalog::{CatalogService, MAX_RATING_ATTEMPTS};
pub use self::liveness_sweep::{
    DEFAULT_MAX_CONCURRENT_PROBES, LivenessSweep, SweepConfig, SweepError, SweepReport,
};
pub use self::schedule::{DailySchedule, ScheduleError};
pub use self::sweep_loop::SweepLoop;
