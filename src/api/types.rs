use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::returns::ReturnReceipt;
use crate::domain::{CardNumber, EventId, commands::RegisterForEvent};

/// 資料検索のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct SearchHoldingsQuery {
    /// 著作者の姓
    pub last_name: String,
    /// 分館コード
    pub branch: String,
}

/// 検索結果の1件
#[derive(Debug, Serialize, Deserialize)]
pub struct HoldingResponse {
    pub holding_id: i32,
    pub title: String,
}

/// イベント申込のリクエスト（POST /events/:event_id/signups）
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub card_number: String,
}

impl RegisterRequest {
    pub fn to_command(&self, event_id: i32) -> RegisterForEvent {
        RegisterForEvent {
            card_number: CardNumber::new(self.card_number.clone()),
            event_id: EventId::new(event_id),
        }
    }
}

/// 申込完了レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub card_number: String,
    pub event_id: i32,
}

/// 返却完了レスポンス（POST /checkouts/:checkout_id/return）
#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnResponse {
    pub checkout_id: i32,
    pub returned_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub overdue_days: i64,
    /// 延滞料金（ドル）
    pub fine: f64,
}

impl From<ReturnReceipt> for ReturnResponse {
    fn from(receipt: ReturnReceipt) -> Self {
        Self {
            checkout_id: receipt.checkout_id.value(),
            returned_at: receipt.returned_at,
            due_date: receipt.due_date,
            overdue_days: receipt.overdue_days,
            fine: receipt.fine.as_dollars(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
