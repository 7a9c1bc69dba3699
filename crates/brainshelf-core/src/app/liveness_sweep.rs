//! LivenessSweep - websiteUrl の定期 probe と `active` の突き合わせ
//!
//! # フロー
//! 1. CatalogStore::apps_with_website() で対象を取得
//! 2. 各 URL を UrlProber で probe（1 件ごとにタイムアウト、最大 N 件並行）
//! 3. 2xx なら reachable、それ以外（タイムアウト・通信エラー含む）は unreachable
//! 4. 保存済みの `active` と異なるものだけ ActiveUpdate を積む
//! 5. 全 probe の完了後（barrier）、1 回の batch commit で書き込む（0 件なら書かない）
//!
//! # 失敗の扱い
//! - 1 件の probe 失敗は他のレコードに影響しない（unreachable と判定されるだけ）
//! - 取得・commit の失敗は run 全体の失敗（SweepError）。リトライは次回のスケジュール

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{ActiveUpdate, AppRecord, CatalogEvent, ProbeOutcome, StoreError, diff_active};
use crate::impls::DEFAULT_PROBE_TIMEOUT;
use crate::ports::{CatalogStore, Clock, EventSink, UrlProber};

pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 16;

#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// probe 1 件あたりの上限
    pub probe_timeout: Duration,
    /// 同時に走らせる probe の数
    pub max_concurrent_probes: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
        }
    }
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to fetch apps: {0}")]
    Fetch(#[source] StoreError),

    #[error("failed to commit {count} active updates: {source}")]
    Commit {
        count: usize,
        #[source]
        source: StoreError,
    },
}

/// SweepReport は 1 回の run の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// probe した件数
    pub scanned: usize,
    pub reachable: usize,
    pub unreachable: usize,
    /// batch commit に含めた件数
    pub updated: usize,
}

pub struct LivenessSweep {
    store: Arc<dyn CatalogStore>,
    prober: Arc<dyn UrlProber>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    config: SweepConfig,
}

impl LivenessSweep {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        prober: Arc<dyn UrlProber>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        config: SweepConfig,
    ) -> Self {
        Self {
            store,
            prober,
            clock,
            events,
            config,
        }
    }

    /// sweep を 1 回実行
    pub async fn run_once(&self) -> Result<SweepReport, SweepError> {
        let apps = self
            .store
            .apps_with_website()
            .await
            .map_err(SweepError::Fetch)?;

        let targets: Vec<AppRecord> = apps
            .into_iter()
            .filter(|app| !app.website_url.is_empty())
            .collect();

        let limit = self.config.max_concurrent_probes.max(1);
        let this = self;
        let observed: Vec<(AppRecord, ProbeOutcome)> = stream::iter(targets)
            .map(move |app| async move {
                let outcome = this.probe(&app.website_url).await;
                (app, outcome)
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        // barrier: ここから先は全 probe 完了後
        let mut report = SweepReport {
            scanned: observed.len(),
            ..SweepReport::default()
        };
        let mut staged: Vec<ActiveUpdate> = Vec::new();
        for (app, outcome) in &observed {
            if outcome.is_reachable() {
                report.reachable += 1;
            } else {
                report.unreachable += 1;
                debug!(app_id = %app.id, url = %app.website_url, ?outcome, "app unreachable");
            }
            if let Some(update) = diff_active(app, outcome, self.clock.now()) {
                staged.push(update);
            }
        }

        if staged.is_empty() {
            info!(scanned = report.scanned, "liveness sweep: no status changes");
            return Ok(report);
        }

        self.store
            .commit_active_batch(&staged)
            .await
            .map_err(|source| SweepError::Commit {
                count: staged.len(),
                source,
            })?;
        report.updated = staged.len();

        for update in &staged {
            self.events.emit(CatalogEvent::ActiveChanged {
                app_id: update.app_id,
                active: update.active,
            });
        }

        info!(
            scanned = report.scanned,
            reachable = report.reachable,
            unreachable = report.unreachable,
            updated = report.updated,
            "liveness sweep committed"
        );
        Ok(report)
    }

    async fn probe(&self, url: &str) -> ProbeOutcome {
        match tokio::time::timeout(self.config.probe_timeout, self.prober.probe(url)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(url, "probe exceeded timeout");
                ProbeOutcome::TimedOut
            }
        }
    }
}
