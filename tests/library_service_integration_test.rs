use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rusty_library_access::adapters::mock::{LibraryStore as InMemoryLibraryStore, WriteOperation};
use rusty_library_access::application::ServiceDependencies;
use rusty_library_access::application::catalogue::search_titles;
use rusty_library_access::application::registration::{RegistrationError, register_for_event};
use rusty_library_access::application::returns::{ReturnError, return_item};
use rusty_library_access::domain::commands::*;
use rusty_library_access::domain::*;
use std::sync::Arc;

// ============================================================================
// テスト用のヘルパー関数
// ============================================================================

const PATRON: &str = "02953575718";
const BRANCH: &str = "DM";

fn setup() -> (Arc<InMemoryLibraryStore>, ServiceDependencies) {
    let store = Arc::new(InMemoryLibraryStore::new());
    store.add_patron(CardNumber::new(PATRON));
    let deps = ServiceDependencies::new(store.clone());
    (store, deps)
}

fn occurrence(event: i32, day: u32, start: (u32, u32), end: (u32, u32)) -> Occurrence {
    Occurrence {
        event_id: EventId::new(event),
        date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
    }
}

fn register_cmd(card_number: &str, event_id: i32) -> RegisterForEvent {
    RegisterForEvent {
        card_number: CardNumber::new(card_number),
        event_id: EventId::new(event_id),
    }
}

fn checkout_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 14, 0, 0).unwrap()
}

/// 貸出と所蔵状況を登録する
fn add_checkout(
    store: &InMemoryLibraryStore,
    checkout_id: i32,
    holding_id: i32,
    holding_type: HoldingType,
    num_holdings: i32,
    copies_available: i32,
) {
    store.add_checkout(CheckoutRecord {
        checkout_id: CheckoutId::new(checkout_id),
        card_number: CardNumber::new(PATRON),
        holding_id: HoldingId::new(holding_id),
        holding_type,
        branch: BranchCode::new(BRANCH),
        checked_out_at: checkout_time(),
    });
    store.set_catalogue_entry(CatalogueEntry {
        branch: BranchCode::new(BRANCH),
        holding_id: HoldingId::new(holding_id),
        num_holdings,
        copies_available,
    });
}

fn return_cmd(checkout_id: i32, days_after_checkout: i64) -> ReturnItem {
    ReturnItem {
        checkout_id: CheckoutId::new(checkout_id),
        returned_at: checkout_time() + Duration::days(days_after_checkout),
    }
}

// ============================================================================
// イベント申込
// ============================================================================

#[tokio::test]
async fn test_register_records_signup() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(77, 10, (14, 0), (16, 0)));

    register_for_event(&deps, register_cmd(PATRON, 77))
        .await
        .expect("registration should succeed");

    assert!(store.has_signup(&CardNumber::new(PATRON), EventId::new(77)));
    assert_eq!(store.signup_count(), 1);
}

#[tokio::test]
async fn test_register_twice_is_rejected() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(77, 10, (14, 0), (16, 0)));

    register_for_event(&deps, register_cmd(PATRON, 77))
        .await
        .unwrap();
    let result = register_for_event(&deps, register_cmd(PATRON, 77)).await;

    assert!(matches!(result, Err(RegistrationError::AlreadyRegistered)));
    assert_eq!(store.signup_count(), 1);
}

#[tokio::test]
async fn test_register_unknown_patron_is_rejected() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(77, 10, (14, 0), (16, 0)));

    let result = register_for_event(&deps, register_cmd("00000000000000000001", 77)).await;

    assert!(matches!(result, Err(RegistrationError::PatronNotFound)));
    assert_eq!(store.signup_count(), 0);
}

#[tokio::test]
async fn test_register_unknown_event_is_rejected() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(77, 10, (14, 0), (16, 0)));

    let result = register_for_event(&deps, register_cmd(PATRON, 200)).await;

    assert!(matches!(result, Err(RegistrationError::EventNotFound)));
    assert_eq!(store.signup_count(), 0);
}

#[tokio::test]
async fn test_register_back_to_back_events() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(1, 10, (9, 0), (10, 0)));
    store.add_occurrence(occurrence(2, 10, (10, 0), (11, 0)));

    register_for_event(&deps, register_cmd(PATRON, 1))
        .await
        .unwrap();
    register_for_event(&deps, register_cmd(PATRON, 2))
        .await
        .expect("adjacent events should not conflict");

    assert_eq!(store.signup_count(), 2);
}

#[tokio::test]
async fn test_register_overlapping_event_is_rejected() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(1, 10, (9, 0), (10, 30)));
    store.add_occurrence(occurrence(2, 10, (10, 0), (11, 0)));

    register_for_event(&deps, register_cmd(PATRON, 1))
        .await
        .unwrap();
    let result = register_for_event(&deps, register_cmd(PATRON, 2)).await;

    match result {
        Err(RegistrationError::ScheduleConflict(conflict)) => {
            assert_eq!(conflict.requested.event_id, EventId::new(2));
            assert_eq!(conflict.existing.event_id, EventId::new(1));
        }
        other => panic!("expected schedule conflict, got {:?}", other),
    }
    assert!(!store.has_signup(&CardNumber::new(PATRON), EventId::new(2)));
    assert_eq!(store.signup_count(), 1);
}

#[tokio::test]
async fn test_register_conflict_on_any_occurrence() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(1, 12, (13, 0), (15, 0)));
    // イベント2は2回開催され、2回目だけが重なる
    store.add_occurrence(occurrence(2, 11, (13, 0), (15, 0)));
    store.add_occurrence(occurrence(2, 12, (14, 0), (16, 0)));

    register_for_event(&deps, register_cmd(PATRON, 1))
        .await
        .unwrap();
    let result = register_for_event(&deps, register_cmd(PATRON, 2)).await;

    assert!(matches!(result, Err(RegistrationError::ScheduleConflict(_))));
    assert_eq!(store.signup_count(), 1);
}

#[tokio::test]
async fn test_register_same_time_on_different_dates() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(1, 10, (9, 0), (11, 0)));
    store.add_occurrence(occurrence(2, 11, (9, 0), (11, 0)));

    register_for_event(&deps, register_cmd(PATRON, 1))
        .await
        .unwrap();
    register_for_event(&deps, register_cmd(PATRON, 2))
        .await
        .expect("events on different dates should not conflict");

    assert_eq!(store.signup_count(), 2);
}

#[tokio::test]
async fn test_register_ignores_other_patrons_signups() {
    let (store, deps) = setup();
    store.add_patron(CardNumber::new("5309015788"));
    store.add_occurrence(occurrence(1, 10, (9, 0), (11, 0)));
    store.add_occurrence(occurrence(2, 10, (10, 0), (12, 0)));
    store.add_signup(CardNumber::new("5309015788"), EventId::new(1));

    register_for_event(&deps, register_cmd(PATRON, 2))
        .await
        .expect("another patron's schedule is irrelevant");

    assert_eq!(store.signup_count(), 2);
}

#[tokio::test]
async fn test_register_store_failure_leaves_no_signup() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(77, 10, (14, 0), (16, 0)));
    store.fail_on(WriteOperation::InsertSignup);

    let result = register_for_event(&deps, register_cmd(PATRON, 77)).await;

    assert!(matches!(result, Err(RegistrationError::StoreError(_))));
    assert_eq!(store.signup_count(), 0);
}

#[tokio::test]
async fn test_register_commit_failure_leaves_no_signup() {
    let (store, deps) = setup();
    store.add_occurrence(occurrence(77, 10, (14, 0), (16, 0)));
    store.fail_on(WriteOperation::Commit);

    let result = register_for_event(&deps, register_cmd(PATRON, 77)).await;

    assert!(matches!(result, Err(RegistrationError::StoreError(_))));
    assert_eq!(store.signup_count(), 0);
}

// ============================================================================
// 返却
// ============================================================================

#[tokio::test]
async fn test_return_overdue_book() {
    let (store, deps) = setup();
    add_checkout(&store, 10, 1, HoldingType::Books, 3, 1);

    let receipt = return_item(&deps, return_cmd(10, 25)).await.unwrap();

    assert_eq!(receipt.overdue_days, 4);
    assert_eq!(receipt.fine.as_dollars(), 2.0);
    assert_eq!(receipt.due_date, checkout_time() + Duration::days(21));
    assert_eq!(
        store.returned_at(CheckoutId::new(10)),
        Some(checkout_time() + Duration::days(25))
    );

    let entry = store
        .catalogue_entry(&BranchCode::new(BRANCH), HoldingId::new(1))
        .unwrap();
    assert_eq!(entry.copies_available, 2);
    assert_eq!(entry.num_holdings, 3);
}

#[tokio::test]
async fn test_return_movie_early_has_no_fine() {
    let (store, deps) = setup();
    add_checkout(&store, 11, 2, HoldingType::Movies, 1, 0);

    let receipt = return_item(&deps, return_cmd(11, 5)).await.unwrap();

    assert_eq!(receipt.overdue_days, 0);
    assert_eq!(receipt.fine, Fine::zero());
    assert_eq!(store.return_count(), 1);
}

#[tokio::test]
async fn test_return_overdue_magazine() {
    let (store, deps) = setup();
    add_checkout(&store, 12, 3, HoldingType::MagazinesAndNewspapers, 2, 1);

    let receipt = return_item(&deps, return_cmd(12, 10)).await.unwrap();

    assert_eq!(receipt.overdue_days, 3);
    assert_eq!(receipt.fine.as_dollars(), 3.0);
}

#[tokio::test]
async fn test_return_unknown_checkout_is_rejected() {
    let (store, deps) = setup();

    let result = return_item(&deps, return_cmd(1, 3)).await;

    assert!(matches!(result, Err(ReturnError::CheckoutNotFound)));
    assert_eq!(store.return_count(), 0);
}

#[tokio::test]
async fn test_return_already_returned_is_rejected() {
    let (store, deps) = setup();
    add_checkout(&store, 94, 1, HoldingType::Books, 3, 2);
    store.add_return(CheckoutId::new(94), checkout_time() + Duration::days(3));

    let result = return_item(&deps, return_cmd(94, 4)).await;

    assert!(matches!(result, Err(ReturnError::AlreadyReturned)));
    let entry = store
        .catalogue_entry(&BranchCode::new(BRANCH), HoldingId::new(1))
        .unwrap();
    assert_eq!(entry.copies_available, 2);
}

#[tokio::test]
async fn test_return_twice_only_counts_once() {
    let (store, deps) = setup();
    add_checkout(&store, 20, 1, HoldingType::Music, 2, 0);

    return_item(&deps, return_cmd(20, 1)).await.unwrap();
    let second = return_item(&deps, return_cmd(20, 2)).await;

    assert!(matches!(second, Err(ReturnError::AlreadyReturned)));
    let entry = store
        .catalogue_entry(&BranchCode::new(BRANCH), HoldingId::new(1))
        .unwrap();
    assert_eq!(entry.copies_available, 1);
    assert_eq!(
        store.returned_at(CheckoutId::new(20)),
        Some(checkout_time() + Duration::days(1))
    );
}

#[tokio::test]
async fn test_return_rejected_when_catalogue_is_full() {
    let (store, deps) = setup();
    add_checkout(&store, 30, 1, HoldingType::Books, 2, 2);

    let result = return_item(&deps, return_cmd(30, 25)).await;

    assert!(matches!(
        result,
        Err(ReturnError::CatalogueCapacityExceeded)
    ));
    assert_eq!(store.return_count(), 0);
    let entry = store
        .catalogue_entry(&BranchCode::new(BRANCH), HoldingId::new(1))
        .unwrap();
    assert_eq!(entry.copies_available, 2);
}

#[tokio::test]
async fn test_return_rejected_when_not_catalogued() {
    let (store, deps) = setup();
    store.add_checkout(CheckoutRecord {
        checkout_id: CheckoutId::new(40),
        card_number: CardNumber::new(PATRON),
        holding_id: HoldingId::new(9),
        holding_type: HoldingType::Audiobooks,
        branch: BranchCode::new(BRANCH),
        checked_out_at: checkout_time(),
    });

    let result = return_item(&deps, return_cmd(40, 2)).await;

    assert!(matches!(result, Err(ReturnError::NotCatalogued)));
    assert_eq!(store.return_count(), 0);
}

#[tokio::test]
async fn test_return_failure_after_insert_is_rolled_back() {
    let (store, deps) = setup();
    add_checkout(&store, 50, 1, HoldingType::Books, 3, 1);
    store.fail_on(WriteOperation::SaveCatalogueEntry);

    let result = return_item(&deps, return_cmd(50, 25)).await;

    // 料金ではなく拒否として報告され、返却記録も残らない
    assert!(matches!(result, Err(ReturnError::StoreError(_))));
    assert_eq!(store.returned_at(CheckoutId::new(50)), None);
    let entry = store
        .catalogue_entry(&BranchCode::new(BRANCH), HoldingId::new(1))
        .unwrap();
    assert_eq!(entry.copies_available, 1);
}

// ============================================================================
// 資料検索
// ============================================================================

#[tokio::test]
async fn test_search_returns_each_holding_once() {
    let (store, deps) = setup();
    store.add_holding(
        HoldingId::new(1),
        "Willy Wonka and the chocolate factory",
        &["Stuart"],
        &["DM", "TP"],
    );
    store.add_holding(HoldingId::new(2), "Collected Poems", &["Stuart"], &["DM"]);
    store.add_holding(HoldingId::new(3), "Collected Poems", &["Stuart", "Bishop"], &["DM"]);
    store.add_holding(HoldingId::new(4), "Elsewhere", &["Stuart"], &["TP"]);
    store.add_holding(HoldingId::new(5), "Unrelated", &["Other"], &["DM"]);

    let titles = search_titles(&deps, "Stuart", &BranchCode::new("DM"))
        .await
        .unwrap();

    let ids: Vec<i32> = titles.iter().map(|t| t.holding_id.value()).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(titles[0].title, titles[1].title);
}

#[tokio::test]
async fn test_search_without_matches_is_empty() {
    let (_store, deps) = setup();

    let titles = search_titles(&deps, "Nobody", &BranchCode::new("DM"))
        .await
        .unwrap();

    assert!(titles.is_empty());
}
