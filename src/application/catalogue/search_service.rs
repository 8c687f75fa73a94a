use thiserror::Error;

use crate::application::ServiceDependencies;
use crate::domain::{BranchCode, HoldingTitle};

/// 資料検索のエラー
#[derive(Debug, Error)]
pub enum SearchError {
    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 著作者の姓と分館で資料を検索する
///
/// 一致がなければ空のリストを返す。
pub async fn search_titles(
    deps: &ServiceDependencies,
    last_name: &str,
    branch: &BranchCode,
) -> Result<Vec<HoldingTitle>, SearchError> {
    let titles = deps
        .store
        .search_titles(last_name, branch)
        .await
        .map_err(SearchError::StoreError)?;

    tracing::debug!(last_name, branch = %branch, matches = titles.len(), "Catalogue searched");

    Ok(titles)
}
