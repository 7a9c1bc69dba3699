//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - store / prober / verifier は必須。未設定なら build() が BuildError を返す
//! - clock / events / id generator / sweep 設定 / schedule には既定値がある
//! - 同時 probe 数 0 や probe タイムアウト 0 のような起動しても意味のない設定もここで弾く

use std::sync::Arc;

use thiserror::Error;

use super::catalog::CatalogService;
use super::liveness_sweep::{LivenessSweep, SweepConfig};
use super::schedule::DailySchedule;
use super::sweep_loop::SweepLoop;
use crate::impls::NoopEventSink;
use crate::ports::{
    CatalogStore, Clock, EventSink, IdGenerator, IdentityVerifier, SystemClock, UlidGenerator,
    UrlProber,
};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .store(Arc::new(InMemoryCatalogStore::new()))
///     .prober(Arc::new(HttpUrlProber::new(DEFAULT_PROBE_TIMEOUT)?))
///     .verifier(Arc::new(JwtIdentityVerifier::new(&secret)))
///     .build()?;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    store: Option<Arc<dyn CatalogStore>>,
    prober: Option<Arc<dyn UrlProber>>,
    verifier: Option<Arc<dyn IdentityVerifier>>,
    clock: Option<Arc<dyn Clock>>,
    events: Option<Arc<dyn EventSink>>,
    ids: Option<Arc<dyn IdGenerator>>,
    sweep_config: SweepConfig,
    schedule: DailySchedule,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Missing component: {0}. Call AppBuilder::{0}() before build().")]
    MissingComponent(&'static str),

    #[error("max_concurrent_probes must be at least 1")]
    NoProbeConcurrency,

    #[error("probe_timeout must be greater than zero")]
    ZeroProbeTimeout,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn CatalogStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn prober(mut self, prober: Arc<dyn UrlProber>) -> Self {
        self.prober = Some(prober);
        self
    }

    pub fn verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// 既定は SystemClock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// 既定は NoopEventSink
    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// 既定は clock を使う UlidGenerator
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn sweep_config(mut self, config: SweepConfig) -> Self {
        self.sweep_config = config;
        self
    }

    pub fn schedule(mut self, schedule: DailySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// AppBuilder を構築して App を生成
    pub fn build(self) -> Result<App, BuildError> {
        let store = self.store.ok_or(BuildError::MissingComponent("store"))?;
        let prober = self.prober.ok_or(BuildError::MissingComponent("prober"))?;
        let verifier = self
            .verifier
            .ok_or(BuildError::MissingComponent("verifier"))?;
        if self.sweep_config.max_concurrent_probes == 0 {
            return Err(BuildError::NoProbeConcurrency);
        }
        if self.sweep_config.probe_timeout.is_zero() {
            return Err(BuildError::ZeroProbeTimeout);
        }

        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let events: Arc<dyn EventSink> = self.events.unwrap_or_else(|| Arc::new(NoopEventSink));
        let ids: Arc<dyn IdGenerator> = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(clock.clone())));

        let catalog = CatalogService::new(store.clone(), ids, clock.clone(), events.clone());
        let sweep = LivenessSweep::new(store, prober, clock.clone(), events, self.sweep_config);

        Ok(App {
            catalog: Arc::new(catalog),
            sweep: Arc::new(sweep),
            verifier,
            schedule: self.schedule,
            clock,
        })
    }
}

/// App はワイヤリング済みのサービス一式
#[derive(Clone)]
pub struct App {
    pub catalog: Arc<CatalogService>,
    pub sweep: Arc<LivenessSweep>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub schedule: DailySchedule,
    pub clock: Arc<dyn Clock>,
}

impl App {
    /// スケジュールどおりに sweep を回すループを起動
    pub fn spawn_sweep_loop(&self) -> SweepLoop {
        SweepLoop::spawn(self.sweep.clone(), self.schedule, self.clock.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::liveness_sweep::tests::FakeProber;
    use crate::domain::{AppDraft, Identity};
    use crate::impls::{InMemoryCatalogStore, JwtIdentityVerifier};

    fn complete() -> AppBuilder {
        AppBuilder::new()
            .store(Arc::new(InMemoryCatalogStore::new()))
            .prober(Arc::new(FakeProber::default()))
            .verifier(Arc::new(JwtIdentityVerifier::new("test-secret")))
    }

    #[test]
    fn test_build_success() {
        assert!(complete().build().is_ok());
    }

    #[test]
    fn test_build_missing_store() {
        let result = AppBuilder::new()
            .prober(Arc::new(FakeProber::default()))
            .verifier(Arc::new(JwtIdentityVerifier::new("test-secret")))
            .build();
        assert_eq!(result.err(), Some(BuildError::MissingComponent("store")));
    }

    #[test]
    fn test_build_missing_verifier() {
        let result = AppBuilder::new()
            .store(Arc::new(InMemoryCatalogStore::new()))
            .prober(Arc::new(FakeProber::default()))
            .build();
        assert_eq!(result.err(), Some(BuildError::MissingComponent("verifier")));
    }

    #[test]
    fn test_build_rejects_zero_concurrency() {
        let result = complete()
            .sweep_config(SweepConfig {
                max_concurrent_probes: 0,
                ..SweepConfig::default()
            })
            .build();
        assert_eq!(result.err(), Some(BuildError::NoProbeConcurrency));
    }

    #[test]
    fn test_build_rejects_zero_timeout() {
        let result = complete()
            .sweep_config(SweepConfig {
                probe_timeout: std::time::Duration::ZERO,
                ..SweepConfig::default()
            })
            .build();
        assert_eq!(result.err(), Some(BuildError::ZeroProbeTimeout));
    }

    #[tokio::test]
    async fn test_built_services_share_store() {
        let store = InMemoryCatalogStore::new();
        let app = complete().store(Arc::new(store.clone())).build().unwrap();

        let draft = AppDraft {
            name: Some("Anytype".to_string()),
            description: Some("Local-first objects".to_string()),
            website_url: Some("https://anytype.io".to_string()),
            ..AppDraft::default()
        };
        app.catalog
            .submit(&Identity::new("u1"), draft)
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);

        // FakeProber は未登録 URL を Failed にする → active が false に落ちる
        let report = app.sweep.run_once().await.unwrap();
        assert_eq!(report.scanned, 1);
        assert_eq!(report.updated, 1);
    }
}
