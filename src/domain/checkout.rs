use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BranchCode, CardNumber, CheckoutId, HoldingId, HoldingType};

/// 貸出記録
///
/// checkout を、貸し出された複製（libraryholding）と資料（holding）に
/// 結合した読み取り専用のビュー。返却処理に必要な情報をすべて持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRecord {
    pub checkout_id: CheckoutId,
    pub card_number: CardNumber,
    pub holding_id: HoldingId,
    pub holding_type: HoldingType,
    pub branch: BranchCode,
    pub checked_out_at: DateTime<Utc>,
}
