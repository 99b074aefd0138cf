//! glance-core
//!
//! Core building blocks for the Glance vision service: one expensive,
//! lazily loaded inference context shared by many concurrent callers, with
//! every invocation serialized through a single lock and a FIFO queue.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（operation, payload, envelope）
//! - **ports**: 抽象化レイヤー（VisionEngine, PayloadCodec, Clock）
//! - **impls**: 実装（Base64Codec, StubEngine は開発用）
//! - **manager**: モデルのライフサイクル + 直列化（1ロック方針）
//! - **queue / worker**: FIFO 受付と単一コンシューマループ
//! - **reaper**: アイドル時アンロードの定期チェック
//! - **service**: 配線・admission path・shutdown
//!
//! HTTP transport はこの crate には含まれない（glance-server 側）。

pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod manager;
pub mod ports;
pub mod queue;
pub mod reaper;
pub mod service;
pub mod worker;

pub use config::ServiceConfig;
pub use error::GlanceError;
pub use manager::ModelManager;
pub use service::{ServiceTasks, VisionService};
