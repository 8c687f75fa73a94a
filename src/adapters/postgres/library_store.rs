use crate::domain::{
    BranchCode, CardNumber, CatalogueEntry, CheckoutId, CheckoutRecord, EventId, HoldingId,
    HoldingTitle, HoldingType, Occurrence,
};
use crate::ports::library_store::{
    LibraryStore as LibraryStoreTrait, LibraryTransaction, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

/// PostgreSQLの行データをOccurrenceに変換する
fn map_row_to_occurrence(row: &PgRow) -> Result<Occurrence> {
    Ok(Occurrence {
        event_id: EventId::new(row.try_get("event")?),
        date: row.try_get("edate")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
    })
}

/// PostgreSQLの行データをCheckoutRecordに変換する
///
/// htypeの文字列から資料種別への変換でエラーハンドリングを行う。
fn map_row_to_checkout(row: &PgRow) -> Result<CheckoutRecord> {
    let htype: String = row.try_get("htype")?;
    let holding_type: HoldingType = htype.parse()?;

    Ok(CheckoutRecord {
        checkout_id: CheckoutId::new(row.try_get("id")?),
        card_number: CardNumber::new(row.try_get::<String, _>("patron")?),
        holding_id: HoldingId::new(row.try_get("holding")?),
        holding_type,
        branch: BranchCode::new(row.try_get::<String, _>("library")?),
        checked_out_at: row.try_get("checkout_time")?,
    })
}

/// LibraryStoreのPostgreSQL実装
///
/// プールのみを保持し、業務操作ごとにトランザクションを払い出す。
pub struct LibraryStore {
    pool: PgPool,
}

impl LibraryStore {
    /// PostgreSQLコネクションプールから新しいLibraryStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryStoreTrait for LibraryStore {
    async fn begin(&self) -> Result<Box<dyn LibraryTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTransaction { tx }))
    }

    /// 資料タイトルを検索
    ///
    /// 資料ID単位でDISTINCTを取るため、同名の別資料は両方とも返る。
    async fn search_titles(
        &self,
        last_name: &str,
        branch: &BranchCode,
    ) -> Result<Vec<HoldingTitle>> {
        let mut rows = sqlx::query(
            r#"
            SELECT DISTINCT h.id, h.title
            FROM holding AS h
            JOIN holdingcontributor AS hc ON h.id = hc.holding
            JOIN contributor AS c ON hc.contributor = c.id
            JOIN libraryholding AS lh ON h.id = lh.holding
            WHERE c.last_name = $1 AND lh.library = $2
            ORDER BY h.title, h.id
            "#,
        )
        .bind(last_name)
        .bind(branch.as_str())
        .fetch(&self.pool);

        let mut titles = Vec::new();
        while let Some(row) = rows.try_next().await? {
            titles.push(HoldingTitle {
                holding_id: HoldingId::new(row.try_get("id")?),
                title: row.try_get("title")?,
            });
        }

        Ok(titles)
    }
}

/// PostgreSQLのトランザクション
///
/// sqlxのTransactionはcommitされずにドロップされるとロールバックされる。
struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LibraryTransaction for PostgresTransaction {
    async fn lock_patron(&mut self, card_number: &CardNumber) -> Result<bool> {
        let row = sqlx::query("SELECT card_number FROM patron WHERE card_number = $1 FOR UPDATE")
            .bind(card_number.as_str())
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.is_some())
    }

    async fn event_exists(&mut self, event_id: EventId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM eventschedule WHERE event = $1)",
        )
        .bind(event_id.value())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn signup_exists(
        &mut self,
        card_number: &CardNumber,
        event_id: EventId,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM eventsignup WHERE patron = $1 AND event = $2)",
        )
        .bind(card_number.as_str())
        .bind(event_id.value())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn signed_up_occurrences(
        &mut self,
        card_number: &CardNumber,
    ) -> Result<Vec<Occurrence>> {
        let rows = sqlx::query(
            r#"
            SELECT esc.event, esc.edate, esc.start_time, esc.end_time
            FROM eventsignup AS esi
            JOIN eventschedule AS esc ON esi.event = esc.event
            WHERE esi.patron = $1
            ORDER BY esc.edate, esc.start_time
            "#,
        )
        .bind(card_number.as_str())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(map_row_to_occurrence).collect()
    }

    async fn event_occurrences(&mut self, event_id: EventId) -> Result<Vec<Occurrence>> {
        let rows = sqlx::query(
            r#"
            SELECT event, edate, start_time, end_time
            FROM eventschedule
            WHERE event = $1
            ORDER BY edate, start_time
            "#,
        )
        .bind(event_id.value())
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(map_row_to_occurrence).collect()
    }

    /// 申込を記録
    ///
    /// (patron, event) の主キーに衝突した場合は何もせずfalseを返す。
    async fn insert_signup(
        &mut self,
        card_number: &CardNumber,
        event_id: EventId,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO eventsignup (patron, event) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(card_number.as_str())
        .bind(event_id.value())
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn lock_checkout(&mut self, checkout_id: CheckoutId) -> Result<Option<CheckoutRecord>> {
        let row = sqlx::query(
            r#"
            SELECT
                c.id,
                c.patron,
                c.checkout_time,
                lh.library,
                lh.holding,
                h.htype::text AS htype
            FROM checkout AS c
            JOIN libraryholding AS lh ON c.copy = lh.barcode
            JOIN holding AS h ON lh.holding = h.id
            WHERE c.id = $1
            FOR UPDATE OF c
            "#,
        )
        .bind(checkout_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_checkout).transpose()
    }

    async fn return_exists(&mut self, checkout_id: CheckoutId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM return WHERE checkout = $1)",
        )
        .bind(checkout_id.value())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn lock_catalogue_entry(
        &mut self,
        record: &CheckoutRecord,
    ) -> Result<Option<CatalogueEntry>> {
        let row = sqlx::query(
            r#"
            SELECT library, holding, num_holdings, copies_available
            FROM librarycatalogue
            WHERE library = $1 AND holding = $2
            FOR UPDATE
            "#,
        )
        .bind(record.branch.as_str())
        .bind(record.holding_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(CatalogueEntry {
            branch: BranchCode::new(row.try_get::<String, _>("library")?),
            holding_id: HoldingId::new(row.try_get("holding")?),
            num_holdings: row.try_get("num_holdings")?,
            copies_available: row.try_get("copies_available")?,
        }))
    }

    /// 返却記録を作成
    ///
    /// return.checkout の主キーに衝突した場合は何もせずfalseを返す。
    async fn insert_return(
        &mut self,
        checkout_id: CheckoutId,
        returned_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO return (checkout, return_time) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(checkout_id.value())
        .bind(returned_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// 利用可能冊数を保存
    ///
    /// 所蔵冊数を超える値はテーブルのCHECK制約でも拒否される。
    async fn save_catalogue_entry(&mut self, entry: &CatalogueEntry) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE librarycatalogue
            SET copies_available = $3
            WHERE library = $1 AND holding = $2
            "#,
        )
        .bind(entry.branch.as_str())
        .bind(entry.holding_id.value())
        .bind(entry.copies_available)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
