//! memosync 共通ライブラリ
//!
//! エラー型と、ファイル I/O・ログの Outbound ポートおよび標準アダプターを提供します。

/// エラーハンドリング
pub mod error;

/// Ports & Adapters のポート定義
pub mod ports;

/// ポートの標準実装
pub mod adapter;

#[doc(hidden)]
pub use serde_json;
