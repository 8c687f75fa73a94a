use crate::application::ServiceDependencies;
use crate::domain::{self, commands::RegisterForEvent};

use super::errors::{RegistrationError, Result};

/// イベントに申し込む
///
/// ビジネスルール：
/// - 利用者が存在すること
/// - イベントに開催回が登録されていること
/// - 同じイベントに申込済みでないこと
/// - 申込済みのイベントと同じ日に時間帯が重ならないこと（連続は可）
///
/// # 一貫性保証
///
/// すべての確認と書き込みは1つのトランザクション内で行われる。
/// 失敗した場合はトランザクションが破棄され、DBは変更されない。
/// 利用者行のロックと申込表の一意制約により、並行した申込でも
/// 重複・重なりは発生しない。
pub async fn register_for_event(deps: &ServiceDependencies, cmd: RegisterForEvent) -> Result<()> {
    let mut tx = deps
        .store
        .begin()
        .await
        .map_err(RegistrationError::StoreError)?;

    // 1. 利用者の存在確認（行ロック）
    let patron_exists = tx
        .lock_patron(&cmd.card_number)
        .await
        .map_err(RegistrationError::StoreError)?;

    if !patron_exists {
        return Err(RegistrationError::PatronNotFound);
    }

    // 2. イベントの存在確認
    let event_exists = tx
        .event_exists(cmd.event_id)
        .await
        .map_err(RegistrationError::StoreError)?;

    if !event_exists {
        return Err(RegistrationError::EventNotFound);
    }

    // 3. 重複申込の確認
    let already_registered = tx
        .signup_exists(&cmd.card_number, cmd.event_id)
        .await
        .map_err(RegistrationError::StoreError)?;

    if already_registered {
        return Err(RegistrationError::AlreadyRegistered);
    }

    // 4. 開催回の取得
    let existing = tx
        .signed_up_occurrences(&cmd.card_number)
        .await
        .map_err(RegistrationError::StoreError)?;

    let requested = tx
        .event_occurrences(cmd.event_id)
        .await
        .map_err(RegistrationError::StoreError)?;

    // 5. 時間帯の重なり判定（純粋関数）
    if let Some(conflict) = domain::find_conflict(&existing, &requested) {
        return Err(RegistrationError::ScheduleConflict(conflict));
    }

    // 6. 申込を記録してコミット
    let inserted = tx
        .insert_signup(&cmd.card_number, cmd.event_id)
        .await
        .map_err(RegistrationError::StoreError)?;

    if !inserted {
        return Err(RegistrationError::AlreadyRegistered);
    }

    tx.commit().await.map_err(RegistrationError::StoreError)?;

    tracing::info!(
        card_number = %cmd.card_number,
        event_id = %cmd.event_id,
        "Event signup recorded"
    );

    Ok(())
}
