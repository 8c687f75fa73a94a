use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::HoldingType;

/// 延滞料金
///
/// 浮動小数点の丸め誤差を避けるため、内部ではセント単位の整数で保持する。
/// 不変条件：負にならない
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64")]
pub struct Fine(i64);

impl From<i64> for Fine {
    fn from(cents: i64) -> Self {
        Self::from_cents(cents)
    }
}

impl Fine {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(cents.max(0))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// ドル単位の金額
    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// 返却時の延滞料金の査定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineAssessment {
    pub due_date: DateTime<Utc>,
    pub overdue_days: i64,
    pub fine: Fine,
}

/// 返却期限を計算する（純粋な関数）
pub fn due_date(holding_type: HoldingType, checked_out_at: DateTime<Utc>) -> DateTime<Utc> {
    checked_out_at + holding_type.loan_policy().loan_period()
}

/// 延滞料金を査定する（純粋な関数）
///
/// ビジネスルール：
/// - 返却期限は資料種別の貸出期間から決まる
/// - 延滞日数は経過した丸1日の数で、期限内の返却は0日
/// - 料金 = 延滞日数 × 種別ごとの日額
pub fn assess_fine(
    holding_type: HoldingType,
    checked_out_at: DateTime<Utc>,
    returned_at: DateTime<Utc>,
) -> FineAssessment {
    let due_date = due_date(holding_type, checked_out_at);
    let overdue_days = (returned_at - due_date).num_days().max(0);
    let fine = Fine::from_cents(overdue_days * holding_type.loan_policy().daily_fine_cents);

    FineAssessment {
        due_date,
        overdue_days,
        fine,
    }
}
