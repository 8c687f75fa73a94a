use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use crate::adapters::postgres::{self, PostgresLibraryStore};
use crate::application::{
    ServiceDependencies,
    catalogue::{SearchError, search_titles},
    registration::{RegistrationError, register_for_event},
    returns::{ReturnError, ReturnReceipt, return_item},
};
use crate::config::DatabaseConfig;
use crate::domain::{
    BranchCode, CardNumber, CheckoutId, EventId, HoldingTitle,
    commands::{RegisterForEvent, ReturnItem},
};

/// 返却が拒否されたことを表す値
pub const RETURN_REJECTED: f64 = -1.0;

/// 図書館操作のエラー
#[derive(Debug, Error)]
pub enum LibraryError {
    /// データベースに接続していない
    #[error("Not connected to a database")]
    NotConnected,

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Return(#[from] ReturnError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// 図書館データベースへの接続ハンドル
///
/// `connect`・`disconnect`・`search`・`register`・`return_item`は決してエラーを
/// 送出せず、成否を真偽値・`RETURN_REJECTED`・空リストで返す。
/// 失敗の理由はここでログに記録される。理由を値として受け取りたい場合は
/// `try_`で始まる版を使う。
///
/// ハンドル自体はカーソルを保持しない。各操作は自分のトランザクションを開き、
/// すべての終了経路でそれを解放する。
pub struct Library {
    /// `None`の場合は接続時に環境変数から読み込む
    config: Option<DatabaseConfig>,
    pool: Option<PgPool>,
    deps: Option<ServiceDependencies>,
}

impl Library {
    /// 未接続のハンドルを作成する
    ///
    /// 接続先は`connect`の時点で`LIBRARY_DB_*`環境変数から読み込む。
    pub fn new() -> Self {
        Self {
            config: None,
            pool: None,
            deps: None,
        }
    }

    /// 接続先の設定を指定して未接続のハンドルを作成する
    pub fn with_config(config: DatabaseConfig) -> Self {
        Self {
            config: Some(config),
            pool: None,
            deps: None,
        }
    }

    /// 任意のストアに接続済みのハンドルを作成する
    pub fn with_dependencies(deps: ServiceDependencies) -> Self {
        Self {
            config: None,
            pool: None,
            deps: Some(deps),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.deps.is_some()
    }

    /// データベースに接続する
    ///
    /// 検索パスを `library, public` に設定する。
    /// 環境変数の値が不正な場合を含め、失敗した場合は`false`を返し、
    /// 既存の接続はそのまま残す。
    pub async fn connect(&mut self, database_name: &str, username: &str, password: &str) -> bool {
        let config = match self.config.clone() {
            Some(config) => config,
            None => match DatabaseConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(database_name, username, "Invalid configuration: {}", e);
                    return false;
                }
            },
        };

        match postgres::connect(&config, database_name, username, password).await {
            Ok(pool) => {
                if let Some(previous) = self.pool.replace(pool.clone()) {
                    previous.close().await;
                }
                self.deps = Some(ServiceDependencies::new(Arc::new(
                    PostgresLibraryStore::new(pool),
                )));
                tracing::info!(database_name, username, "Connected to library database");
                true
            }
            Err(e) => {
                tracing::error!(database_name, username, "Failed to connect: {}", e);
                false
            }
        }
    }

    /// 接続を閉じる
    ///
    /// 冪等。未接続や切断済みのハンドルに対しても`true`を返す。
    pub async fn disconnect(&mut self) -> bool {
        self.deps = None;
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            tracing::info!("Disconnected from library database");
        }
        true
    }

    fn deps(&self) -> Result<&ServiceDependencies, LibraryError> {
        self.deps.as_ref().ok_or(LibraryError::NotConnected)
    }

    /// 分館`branch`にある、姓が`last_name`の著作者の資料タイトルを返す
    ///
    /// 同じタイトルの別資料はそれぞれ返す。エラー時は空のリストを返す。
    pub async fn search(&self, last_name: &str, branch: &str) -> Vec<String> {
        match self.try_search(last_name, branch).await {
            Ok(titles) => titles.into_iter().map(|t| t.title).collect(),
            Err(e) => {
                tracing::error!(last_name, branch, "Search failed: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_search(
        &self,
        last_name: &str,
        branch: &str,
    ) -> Result<Vec<HoldingTitle>, LibraryError> {
        let deps = self.deps()?;
        Ok(search_titles(deps, last_name, &BranchCode::new(branch)).await?)
    }

    /// 利用者`card_number`のイベント`event_id`への申込を記録する
    ///
    /// 申込が記録された場合に限り`true`を返す。
    pub async fn register(&self, card_number: &str, event_id: i32) -> bool {
        match self.try_register(card_number, event_id).await {
            Ok(()) => true,
            Err(e) => {
                log_rejection("Registration", &e);
                false
            }
        }
    }

    pub async fn try_register(
        &self,
        card_number: &str,
        event_id: i32,
    ) -> Result<(), LibraryError> {
        let deps = self.deps()?;
        let cmd = RegisterForEvent {
            card_number: CardNumber::new(card_number),
            event_id: EventId::new(event_id),
        };
        Ok(register_for_event(deps, cmd).await?)
    }

    /// 貸出`checkout`の資料を現在時刻で返却し、延滞料金（ドル）を返す
    ///
    /// 返却できなかった場合はDBを変更せず`RETURN_REJECTED`を返す。
    pub async fn return_item(&self, checkout: i32) -> f64 {
        match self.try_return_item(checkout).await {
            Ok(receipt) => receipt.fine.as_dollars(),
            Err(e) => {
                log_rejection("Return", &e);
                RETURN_REJECTED
            }
        }
    }

    pub async fn try_return_item(&self, checkout: i32) -> Result<ReturnReceipt, LibraryError> {
        let deps = self.deps()?;
        let cmd = ReturnItem {
            checkout_id: CheckoutId::new(checkout),
            returned_at: Utc::now(),
        };
        Ok(return_item(deps, cmd).await?)
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

/// 拒否の理由をログに記録する
///
/// ビジネスルール違反はwarn、ストアの障害はerrorとする。
fn log_rejection(operation: &str, error: &LibraryError) {
    let is_store_failure = matches!(
        error,
        LibraryError::Registration(RegistrationError::StoreError(_))
            | LibraryError::Return(ReturnError::StoreError(_))
            | LibraryError::Search(SearchError::StoreError(_))
    );

    if is_store_failure {
        let source = std::error::Error::source(error)
            .map(|e| e.to_string())
            .unwrap_or_default();
        tracing::error!("{} failed: {}: {}", operation, error, source);
    } else {
        tracing::warn!("{} rejected: {}", operation, error);
    }
}
