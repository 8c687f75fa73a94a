use crate::application::{
    ServiceDependencies,
    catalogue::search_titles,
    registration::register_for_event as execute_register_for_event,
    returns::return_item as execute_return_item,
};
use crate::domain::{BranchCode, CheckoutId, commands::ReturnItem};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        HoldingResponse, RegisterRequest, ReturnResponse, SearchHoldingsQuery, SignupResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /events/:event_id/signups - イベントに申し込む
///
/// 強制されるビジネスルール:
/// - 利用者とイベントが存在すること
/// - 同じイベントに申込済みでないこと
/// - 申込済みのイベントと時間帯が重ならないこと
pub async fn register_for_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i32>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let cmd = req.to_command(event_id);

    execute_register_for_event(&state.service_deps, cmd.clone()).await?;

    let response = SignupResponse {
        card_number: cmd.card_number.as_str().to_string(),
        event_id: cmd.event_id.value(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /checkouts/:checkout_id/return - 資料を返却
///
/// 現在時刻で返却を記録し、延滞料金を返す。
///
/// 強制されるビジネスルール:
/// - 貸出が存在すること
/// - 既に返却済みでないこと
/// - 利用可能冊数が所蔵冊数を超えないこと
pub async fn return_item(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<i32>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let cmd = ReturnItem {
        checkout_id: CheckoutId::new(checkout_id),
        returned_at: chrono::Utc::now(),
    };

    let receipt = execute_return_item(&state.service_deps, cmd).await?;

    Ok(Json(ReturnResponse::from(receipt)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /holdings - 著作者の姓と分館で資料を検索
pub async fn search_holdings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchHoldingsQuery>,
) -> Result<Json<Vec<HoldingResponse>>, ApiError> {
    let branch = BranchCode::new(query.branch);

    let titles = search_titles(&state.service_deps, &query.last_name, &branch).await?;

    Ok(Json(
        titles
            .into_iter()
            .map(|t| HoldingResponse {
                holding_id: t.holding_id.value(),
                title: t.title,
            })
            .collect(),
    ))
}
