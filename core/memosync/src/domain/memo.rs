//! メモと添付ファイル記述子
//!
//! 取得元から渡される値で、この crate からは変更しない。

use chrono::{DateTime, Local};

/// 添付ファイルの記述子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// 取得元での識別子（例: `resources/45`）
    pub name: String,
    /// 表示名。拡張子で画像かどうかを判定する。
    pub filename: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
        }
    }
}

/// 1 件のメモ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo {
    pub id: String,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
    pub content: String,
    /// PUBLIC / PRIVATE / PROTECTED など。文字列のまま保持する。
    pub visibility: String,
    pub resources: Vec<Resource>,
}

/// 一覧取得の 1 ページ
#[derive(Debug, Clone, Default)]
pub struct MemoPage {
    pub memos: Vec<Memo>,
    /// 次ページのトークン。None なら最終ページ。
    pub next_page_token: Option<String>,
}
