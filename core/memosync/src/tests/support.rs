//! テスト用の MemoSource・メモ生成・組み立てヘルパー

use chrono::{Local, TimeZone};
use common::adapter::{NoopLog, StdFileSystem};
use common::error::Error;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::domain::{AttachmentPolicy, BucketLayout, Memo, MemoPage, Resource};
use crate::ports::outbound::MemoSource;
use crate::usecase::{JournalWriter, SyncUseCase};
use crate::wiring::{wire_journal_writer, wire_sync};

/// 添付の取得結果
#[derive(Clone)]
pub enum Blob {
    Bytes(Vec<u8>),
    Missing,
    Unreachable,
}

/// ページと添付をメモリ上に持つ MemoSource
#[derive(Default)]
pub struct StubMemoSource {
    pages: Vec<MemoPage>,
    blobs: HashMap<String, Blob>,
    list_fails: bool,
    pub downloads: Mutex<Vec<String>>,
    pub page_requests: Mutex<Vec<Option<String>>>,
}

impl StubMemoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1 ページ追加する。最後のページ以外には次ページのトークンが付く。
    pub fn page(mut self, memos: Vec<Memo>) -> Self {
        let n = self.pages.len();
        if let Some(prev) = self.pages.last_mut() {
            prev.next_page_token = Some(format!("page-{}", n));
        }
        self.pages.push(MemoPage {
            memos,
            next_page_token: None,
        });
        self
    }

    /// 最後のページのトークンを固定値にする（同じトークンが繰り返される状況用）
    pub fn looping_token(mut self, token: &str) -> Self {
        if let Some(last) = self.pages.last_mut() {
            last.next_page_token = Some(token.to_string());
        }
        self
    }

    pub fn blob(mut self, resource_name: &str, blob: Blob) -> Self {
        self.blobs.insert(resource_name.to_string(), blob);
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }
}

impl MemoSource for StubMemoSource {
    fn list_memos(&self, _page_size: u32, page_token: Option<&str>) -> Result<MemoPage, Error> {
        self.page_requests
            .lock()
            .unwrap()
            .push(page_token.map(str::to_string));
        if self.list_fails {
            return Err(Error::http("HTTP request failed: connection refused"));
        }
        let index = match page_token {
            None => 0,
            Some(t) => t
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(self.pages.len().saturating_sub(1)),
        };
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    fn download_resource(&self, resource: &Resource) -> Result<Option<Vec<u8>>, Error> {
        self.downloads.lock().unwrap().push(resource.name.clone());
        match self.blobs.get(&resource.name) {
            Some(Blob::Bytes(b)) => Ok(Some(b.clone())),
            Some(Blob::Missing) | None => Ok(None),
            Some(Blob::Unreachable) => Err(Error::fetch(format!("{}: connection reset", resource.name))),
        }
    }
}

/// ローカル時刻で作成・更新されたメモ
pub fn memo_at(id: &str, (y, mo, d): (i32, u32, u32), (h, mi): (u32, u32), content: &str) -> Memo {
    let ts = Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap();
    Memo {
        id: id.to_string(),
        create_time: ts,
        update_time: ts,
        content: content.to_string(),
        visibility: "PRIVATE".to_string(),
        resources: Vec::new(),
    }
}

pub fn with_resources(mut memo: Memo, resources: &[(&str, &str)]) -> Memo {
    memo.resources = resources
        .iter()
        .map(|(name, filename)| Resource::new(*name, *filename))
        .collect();
    memo
}

pub fn layout(root: &Path) -> BucketLayout {
    BucketLayout::new(root, "resources")
}

pub fn writer(root: &Path, source: Arc<StubMemoSource>, policy: AttachmentPolicy) -> JournalWriter {
    wire_journal_writer(
        Arc::new(StdFileSystem),
        source,
        Arc::new(NoopLog),
        layout(root),
        policy,
    )
}

pub fn sync_use_case(root: &Path, source: Arc<StubMemoSource>) -> SyncUseCase {
    wire_sync(
        Arc::new(StdFileSystem),
        source,
        Arc::new(NoopLog),
        layout(root),
        AttachmentPolicy::Abort,
    )
}

/// 識別行の出現回数
pub fn marker_count(text: &str, memo_id: &str) -> usize {
    let marker = format!("> - ID: {}", memo_id);
    text.lines().filter(|l| *l == marker).count()
}
