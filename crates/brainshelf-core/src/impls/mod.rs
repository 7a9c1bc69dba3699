//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryCatalogStore**: 開発・テスト用の正本
//! - **HttpUrlProber**: reqwest による HEAD probe
//! - **JwtIdentityVerifier**: HS256 JWT の検証
//! - **BroadcastEventSink** / **NoopEventSink**: イベント配送

pub mod broadcast_events;
pub mod http_prober;
pub mod inmem_store;
pub mod jwt_verifier;

pub use self::broadcast_events::{BroadcastEventSink, NoopEventSink};
pub use self::http_prober::{DEFAULT_PROBE_TIMEOUT, HttpUrlProber};
pub use self::inmem_store::InMemoryCatalogStore;
pub use self::jwt_verifier::{Claims, JwtIdentityVerifier};
