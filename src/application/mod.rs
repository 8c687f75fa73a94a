pub mod catalogue;
pub mod registration;
pub mod returns;

use crate::ports::LibraryStore;
use std::sync::Arc;

/// サービスの依存関係
///
/// 振る舞いを持たないデータ構造として定義し、各業務操作の関数に引数で渡す。
/// ストアは操作ごとにトランザクションを開くため、クローンして共有してよい。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub store: Arc<dyn LibraryStore>,
}

impl ServiceDependencies {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }
}
