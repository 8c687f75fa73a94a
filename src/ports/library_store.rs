use crate::domain::{
    BranchCode, CardNumber, CatalogueEntry, CheckoutId, CheckoutRecord, EventId, HoldingTitle,
    Occurrence,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 図書館データストアポート
///
/// 業務操作ごとに1つのトランザクションを開始する入口。
/// ストア自体は共有状態を持たず、カーソルやトランザクションは
/// `begin()`が返すオブジェクトの寿命に閉じ込められる。
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// 新しいトランザクションを開始する
    async fn begin(&self) -> Result<Box<dyn LibraryTransaction>>;

    /// 指定した分館にある、姓が一致する著作者の資料タイトルを検索する
    ///
    /// 資料IDで重複を除くため、同じタイトルの別資料はそれぞれ返される。
    async fn search_titles(&self, last_name: &str, branch: &BranchCode)
    -> Result<Vec<HoldingTitle>>;
}

/// トランザクションポート
///
/// `commit()`を呼ばずに破棄された場合、すべての変更はロールバックされる。
/// これにより、エラーで早期リターンした経路でも書き込みが残らない。
#[async_trait]
pub trait LibraryTransaction: Send {
    // ------------------------------------------------------------------
    // イベント申込
    // ------------------------------------------------------------------

    /// 利用者が存在するか確認し、存在する場合はその行をロックする
    ///
    /// 同じ利用者に対する申込処理を直列化し、重なり判定の競合を防ぐ。
    async fn lock_patron(&mut self, card_number: &CardNumber) -> Result<bool>;

    /// イベントに開催回が1つ以上登録されているか
    async fn event_exists(&mut self, event_id: EventId) -> Result<bool>;

    /// 利用者が既にイベントに申し込んでいるか
    async fn signup_exists(&mut self, card_number: &CardNumber, event_id: EventId)
    -> Result<bool>;

    /// 利用者が申込済みのすべてのイベントの開催回
    async fn signed_up_occurrences(&mut self, card_number: &CardNumber)
    -> Result<Vec<Occurrence>>;

    /// イベントのすべての開催回
    async fn event_occurrences(&mut self, event_id: EventId) -> Result<Vec<Occurrence>>;

    /// 申込を記録する
    ///
    /// 一意制約に阻まれて記録されなかった場合は`false`を返す。
    async fn insert_signup(&mut self, card_number: &CardNumber, event_id: EventId)
    -> Result<bool>;

    // ------------------------------------------------------------------
    // 返却
    // ------------------------------------------------------------------

    /// 貸出記録を取得し、存在する場合はその行をロックする
    async fn lock_checkout(&mut self, checkout_id: CheckoutId) -> Result<Option<CheckoutRecord>>;

    /// 返却記録が既に存在するか
    async fn return_exists(&mut self, checkout_id: CheckoutId) -> Result<bool>;

    /// 分館の所蔵状況を取得し、その行をロックする
    async fn lock_catalogue_entry(
        &mut self,
        record: &CheckoutRecord,
    ) -> Result<Option<CatalogueEntry>>;

    /// 返却記録を作成する
    ///
    /// 一意制約に阻まれて記録されなかった場合は`false`を返す。
    async fn insert_return(
        &mut self,
        checkout_id: CheckoutId,
        returned_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// 所蔵状況の利用可能冊数を保存する
    async fn save_catalogue_entry(&mut self, entry: &CatalogueEntry) -> Result<()>;

    /// トランザクションをコミットする
    async fn commit(self: Box<Self>) -> Result<()>;
}
