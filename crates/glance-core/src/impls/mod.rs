//! Implementations of the ports (development-grade).
//!
//! - Base64Codec: 本番でもこのまま使う
//! - StubEngine: 開発用（実バックエンドが入るまでの代役）

pub mod base64_codec;
pub mod stub_engine;

pub use base64_codec::Base64Codec;
pub use stub_engine::StubEngine;
