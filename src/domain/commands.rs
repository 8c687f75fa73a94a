use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CardNumber, CheckoutId, EventId};

/// コマンド：イベントに申し込む
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForEvent {
    pub card_number: CardNumber,
    pub event_id: EventId,
}

/// コマンド：貸出中の資料を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnItem {
    pub checkout_id: CheckoutId,
    pub returned_at: DateTime<Utc>,
}
