//! Outbound ポート: アプリが外界（メモの取得元・環境変数）を使うための trait

pub mod env_resolver;
pub mod memo_source;

pub use env_resolver::EnvResolver;
pub use memo_source::MemoSource;
