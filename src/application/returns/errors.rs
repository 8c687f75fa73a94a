use thiserror::Error;

/// 返却のエラー
#[derive(Debug, Error)]
pub enum ReturnError {
    /// 貸出が存在しない
    #[error("Checkout not found")]
    CheckoutNotFound,

    /// 既に返却済み
    #[error("Checkout has already been returned")]
    AlreadyReturned,

    /// 返却された複製の分館に所蔵状況が登録されていない
    #[error("Holding is not catalogued at the branch")]
    NotCatalogued,

    /// 返却すると利用可能冊数が所蔵冊数を超える
    #[error("Returning would exceed the number of copies held")]
    CatalogueCapacityExceeded,

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 返却の Result型
pub type Result<T> = std::result::Result<T, ReturnError>;
