//! HttpUrlProber - reqwest による HEAD probe
//!
//! # 学習ポイント
//! - Client は使い回す（接続プールを共有）
//! - タイムアウトは Client 単位で設定し、reqwest のエラー種別で分類する

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::ProbeOutcome;
use crate::ports::UrlProber;

/// 既定の probe タイムアウト
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpUrlProber {
    client: Client,
}

impl HttpUrlProber {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("brainshelf-liveness/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UrlProber for HttpUrlProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.head(url).send().await {
            Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
            Err(e) if e.is_timeout() => ProbeOutcome::TimedOut,
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}
