//! アダプター（Outbound ポートの標準実装）
//!
//! usecase は ports の trait 経由でのみファイル・ログに触れる。
//! 実装は標準実装（Std*）やテスト用のものを注入する。

pub mod file_json_log;
pub mod std_fs;

pub use file_json_log::{FileJsonLog, NoopLog, StderrLog, TeeLog};
pub use std_fs::StdFileSystem;
