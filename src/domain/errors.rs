use thiserror::Error;

/// 所蔵冊数のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// 利用可能冊数が所蔵冊数を超える
    #[error("Copies available would exceed the number of holdings")]
    CapacityExceeded,
}

/// 未知の資料種別
///
/// スキーマのCHECK制約の外にある値がDBから読まれた場合に発生する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown holding type: {0}")]
pub struct UnknownHoldingType(pub String);
