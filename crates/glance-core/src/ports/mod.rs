//! Ports - 抽象化レイヤー
//!
//! - **VisionEngine / EngineSession**: 計算本体（opaque operation）
//! - **PayloadCodec**: wire payload のデコード
//! - **Clock**: 時刻（テストで差し替え可能）

pub mod clock;
pub mod codec;
pub mod engine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{DecodeError, PayloadCodec};
pub use engine::{EngineError, EngineSession, VisionEngine};
