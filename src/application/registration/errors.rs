use crate::domain::ScheduleConflict;
use thiserror::Error;

/// イベント申込のエラー
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// 利用者が存在しない
    #[error("Patron not found")]
    PatronNotFound,

    /// イベントが存在しない（開催回が1つもない）
    #[error("Event not found")]
    EventNotFound,

    /// 既に同じイベントに申込済み
    #[error("Patron is already registered for this event")]
    AlreadyRegistered,

    /// 申込済みのイベントと時間帯が重なる
    #[error("Event overlaps an existing registration")]
    ScheduleConflict(ScheduleConflict),

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// イベント申込の Result型
pub type Result<T> = std::result::Result<T, RegistrationError>;
