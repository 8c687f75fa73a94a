use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::time::Duration;

use crate::config::DatabaseConfig;

/// セッションの検索パス
///
/// スキーマ修飾のないテーブル参照を library スキーマ、次に public スキーマで解決する。
pub const SEARCH_PATH: &str = "library,public";

/// 接続オプションを構築する
///
/// 接続先（ホスト・ポート）は設定から、資格情報は引数から取る。
/// すべてのプール接続に検索パスが設定される。
pub fn connect_options(
    config: &DatabaseConfig,
    database_name: &str,
    username: &str,
    password: &str,
) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(database_name)
        .username(username)
        .password(password)
        .options([("search_path", SEARCH_PATH)])
}

/// コネクションプールを作成する
///
/// 最初の接続を即座に確立するため、認証やネットワークの失敗はここでエラーになる。
pub async fn connect(
    config: &DatabaseConfig,
    database_name: &str,
    username: &str,
    password: &str,
) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(config, database_name, username, password);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(options)
        .await
}
