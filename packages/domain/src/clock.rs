//! # Clock（時刻プロバイダ）
//!
//! ユーザーの `createdAt`（起動時のシードユーザーを含む）を決める時刻源。
//! テストでは [`FixedClock`] で時刻を固定する。
//!
//! ## 精度
//!
//! API は `createdAt` をミリ秒精度の ISO 8601 で返す。ストアに保持する値と
//! クライアントが受け取る値を一致させるため、[`SystemClock`] はミリ秒未満を切り捨てる。

use chrono::{DateTime, SubsecRound, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// システム時刻をミリ秒精度で返す実装
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now().trunc_subsecs(3)
   }
}

/// 固定時刻を返すテスト用実装
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
   now: DateTime<Utc>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self { now }
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.now
   }
}
