pub mod connection;
pub mod library_store;

// パブリックに型を再エクスポート
pub use connection::{SEARCH_PATH, connect, connect_options};
pub use library_store::LibraryStore as PostgresLibraryStore;
