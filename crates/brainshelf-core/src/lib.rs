//! brainshelf-core
//!
//! Core building blocks for the Brainshelf catalog of second-brain apps.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, app, rating, comment, liveness, view, errors, events）
//! - **ports**: 抽象化レイヤー（CatalogStore, UrlProber, IdentityVerifier, Clock, など）
//! - **app**: アプリケーションロジック（builder, catalog, liveness_sweep, sweep_loop）
//! - **impls**: 実装（InMemoryCatalogStore, HttpUrlProber, JwtIdentityVerifier, など）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
