//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。外部システム（ドキュメント DB、
//! identity provider、外部サイトへの HTTP）への依存はすべてここを通し、
//! sweep やサービスは fake を差し込んでテストできるようにする。

pub mod catalog_store;
pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod identity_verifier;
pub mod url_prober;

pub use self::catalog_store::CatalogStore;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::identity_verifier::{IdentityVerifier, bearer_token};
pub use self::url_prober::UrlProber;
