//! SweepLoop - LivenessSweep をスケジュールどおりに回す
//!
//! # フロー
//! 1. DailySchedule から次回発火時刻を計算
//! 2. その時刻まで sleep（shutdown と select で競合させる）
//! 3. LivenessSweep::run_once() を実行し、結果をログに残す
//! 4. 失敗してもリトライしない（次回の発火がリトライ）

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::liveness_sweep::LivenessSweep;
use super::schedule::DailySchedule;
use crate::ports::Clock;

/// SweepLoop handle.
/// - `shutdown_and_join()` でループを止めて終了を待つ
/// - 実行中の sweep は中断しない（次の待機に入った時点で抜ける）
pub struct SweepLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SweepLoop {
    pub fn spawn(
        sweep: Arc<LivenessSweep>,
        schedule: DailySchedule,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(run(sweep, schedule, clock, shutdown_rx));
        Self { shutdown_tx, join }
    }

    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn run(
    sweep: Arc<LivenessSweep>,
    schedule: DailySchedule,
    clock: Arc<dyn Clock>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut last_fire: Option<DateTime<Utc>> = None;
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // 時計が止まっていても同じ時刻で二度発火しないよう、前回の発火時刻以降で計算
        let now = clock.now();
        let base = last_fire.map_or(now, |fired| fired.max(now));
        let next = schedule.next_after(base);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next_run = %next, "liveness sweep scheduled");

        tokio::select! {
            changed = shutdown_rx.changed() => {
                // handle dropped without shutdown
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = tokio::time::sleep(wait) => {}
        }

        last_fire = Some(next);
        match sweep.run_once().await {
            Ok(report) => info!(
                scanned = report.scanned,
                updated = report.updated,
                "liveness sweep finished"
            ),
            Err(e) => error!(error = %e, "liveness sweep failed"),
        }
    }
    info!("liveness sweep loop stopped");
}
