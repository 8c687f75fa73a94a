use chrono::{DateTime, Utc};

use crate::application::ServiceDependencies;
use crate::domain::{self, CapacityError, CheckoutId, Fine, commands::ReturnItem};

use super::errors::{ReturnError, Result};

/// 返却の控え
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub checkout_id: CheckoutId,
    pub returned_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub overdue_days: i64,
    pub fine: Fine,
}

/// 資料を返却する
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 既に返却済みでないこと
/// - 返却により利用可能冊数が所蔵冊数を超えないこと
/// - 延滞料金は資料種別ごとの返却期限と日額から計算する
///
/// # 一貫性保証
///
/// 返却記録の作成と所蔵状況の更新は同じトランザクションでコミットされる。
/// どの段階で失敗しても、コミット前にトランザクションが破棄されるため
/// 部分的な書き込みは残らない。
pub async fn return_item(deps: &ServiceDependencies, cmd: ReturnItem) -> Result<ReturnReceipt> {
    let mut tx = deps.store.begin().await.map_err(ReturnError::StoreError)?;

    // 1. 貸出の存在確認（行ロック）
    let record = tx
        .lock_checkout(cmd.checkout_id)
        .await
        .map_err(ReturnError::StoreError)?
        .ok_or(ReturnError::CheckoutNotFound)?;

    // 2. 返却済みの確認
    let already_returned = tx
        .return_exists(cmd.checkout_id)
        .await
        .map_err(ReturnError::StoreError)?;

    if already_returned {
        return Err(ReturnError::AlreadyReturned);
    }

    // 3. 延滞料金の査定（純粋関数）
    let assessment =
        domain::assess_fine(record.holding_type, record.checked_out_at, cmd.returned_at);

    // 4. 所蔵状況の更新（不変条件の確認）
    let entry = tx
        .lock_catalogue_entry(&record)
        .await
        .map_err(ReturnError::StoreError)?
        .ok_or(ReturnError::NotCatalogued)?;

    let updated = entry.return_copy().map_err(|e| match e {
        CapacityError::CapacityExceeded => ReturnError::CatalogueCapacityExceeded,
    })?;

    // 5. 返却記録の作成
    let inserted = tx
        .insert_return(cmd.checkout_id, cmd.returned_at)
        .await
        .map_err(ReturnError::StoreError)?;

    if !inserted {
        return Err(ReturnError::AlreadyReturned);
    }

    tx.save_catalogue_entry(&updated)
        .await
        .map_err(ReturnError::StoreError)?;

    // 6. コミット
    tx.commit().await.map_err(ReturnError::StoreError)?;

    tracing::info!(
        checkout_id = %cmd.checkout_id,
        overdue_days = assessment.overdue_days,
        fine_cents = assessment.fine.cents(),
        "Return recorded"
    );

    Ok(ReturnReceipt {
        checkout_id: cmd.checkout_id,
        returned_at: cmd.returned_at,
        due_date: assessment.due_date,
        overdue_days: assessment.overdue_days,
        fine: assessment.fine,
    })
}
