use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::UnknownHoldingType;

/// 資料種別（holding.htype）
///
/// スキーマで固定された閉じた列挙。貸出期間と延滞料金はこの種別から決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldingType {
    Books,
    Audiobooks,
    Movies,
    Music,
    MagazinesAndNewspapers,
}

/// 貸出ポリシー（貸出期間と1日あたりの延滞料金）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    /// 貸出日から返却期限までの日数
    pub loan_period_days: i64,
    /// 延滞1日あたりの料金（セント）
    pub daily_fine_cents: i64,
}

impl LoanPolicy {
    pub fn loan_period(&self) -> Duration {
        Duration::days(self.loan_period_days)
    }
}

/// 書籍・オーディオブック: 21日、1日 $0.50
const LONG_LOAN: LoanPolicy = LoanPolicy {
    loan_period_days: 21,
    daily_fine_cents: 50,
};

/// その他の種別: 7日、1日 $1.00
const SHORT_LOAN: LoanPolicy = LoanPolicy {
    loan_period_days: 7,
    daily_fine_cents: 100,
};

impl HoldingType {
    /// スキーマ上の文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldingType::Books => "books",
            HoldingType::Audiobooks => "audiobooks",
            HoldingType::Movies => "movies",
            HoldingType::Music => "music",
            HoldingType::MagazinesAndNewspapers => "magazines and newspapers",
        }
    }

    /// 種別ごとの貸出ポリシー
    pub fn loan_policy(&self) -> LoanPolicy {
        match self {
            HoldingType::Books | HoldingType::Audiobooks => LONG_LOAN,
            HoldingType::Movies | HoldingType::Music | HoldingType::MagazinesAndNewspapers => {
                SHORT_LOAN
            }
        }
    }
}

impl std::str::FromStr for HoldingType {
    type Err = UnknownHoldingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "books" => Ok(HoldingType::Books),
            "audiobooks" => Ok(HoldingType::Audiobooks),
            "movies" => Ok(HoldingType::Movies),
            "music" => Ok(HoldingType::Music),
            "magazines and newspapers" => Ok(HoldingType::MagazinesAndNewspapers),
            _ => Err(UnknownHoldingType(s.to_string())),
        }
    }
}
