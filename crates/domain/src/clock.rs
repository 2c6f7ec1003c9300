//! # Clock（時刻プロバイダ）
//!
//! `created_at` やメール本文の受付日時は `Utc::now()` を直接呼ばず、
//! このトレイト経由で取得する。テストでは固定時刻を注入する。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// システム時刻
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 常に同じ時刻を返す実装（テスト用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// UNIX 秒から固定時刻を作る
    ///
    /// 範囲外の値はエポックに丸める。
    pub fn from_timestamp(secs: i64) -> Self {
        Self::new(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clockは呼び出し前後の時刻の間を返す() {
        let before = Utc::now();
        let now = SystemClock.now();
        let after = Utc::now();

        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_fixed_clockは何度呼んでも同じ時刻を返す() {
        let clock = FixedClock::from_timestamp(1_700_000_000);

        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp(), 1_700_000_000);
    }
}
