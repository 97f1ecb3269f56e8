//! Ports & Adapters のポート定義
//!
//! - inbound: CLI がアプリを呼び出す入口
//! - outbound: アプリが外界（メモの取得元）に依頼するための trait。FS とログは common のものを使う。

pub mod inbound;
pub mod outbound;
