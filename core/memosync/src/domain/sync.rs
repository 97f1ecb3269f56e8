//! 同期の設定値と結果

use chrono::{DateTime, Local};
use serde::Deserialize;
use std::str::FromStr;

/// 添付ファイルの失敗をどう扱うか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentPolicy {
    /// 1 件でも失敗したらブロック全体を失敗にする
    #[default]
    Abort,
    /// 失敗した添付は注記行にしてブロックを書き込む
    BestEffort,
}

impl FromStr for AttachmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            other => Err(format!(
                "unknown attachment policy '{}' (expected abort or best_effort)",
                other
            )),
        }
    }
}

/// sync コマンドの実行条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub page_size: u32,
    /// これより前に作成されたメモはディスクに触れずに飛ばす
    pub since: Option<DateTime<Local>>,
    /// 1 件の失敗でバッチ全体を止める
    pub fail_fast: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: 50,
            since: None,
            fail_fast: false,
        }
    }
}

/// メモ単位の失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoFailure {
    pub memo_id: String,
    pub message: String,
}

/// 1 回の同期の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub written: usize,
    pub already_present: usize,
    pub filtered: usize,
    pub failures: Vec<MemoFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
