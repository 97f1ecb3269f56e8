//! ジャーナルへの追記
//!
//! 1. create_time からバケットファイルを決める
//! 2. 書き込み済みなら何もしない
//! 3. バケットのディレクトリを用意する
//! 4. ブロックを組み立てる（ここで添付を取得・保存する）
//! 5. 既存の内容を読む（無ければ空）
//! 6. 既存の内容の末尾にブロックを繋げる
//! 7. 既存ファイルなら内容を置き換え、無ければ新規作成する
//!
//! 2〜7 はバケット単位のロックを持ったまま行う。書き込む内容はすべてメモリ上で作ってから 1 回で書く。

use common::error::Error;
use common::log_fields;
use common::ports::outbound::{FileSystem, ScopedLog};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::bucket_lock::{acquire, BucketLocks};
use super::formatter::BlockFormatter;
use super::idempotency::IdempotencyGuard;
use crate::domain::naming::canonical_date;
use crate::domain::preview::preview;
use crate::domain::{BucketLayout, Memo};

const LOG_PREVIEW_CHARS: usize = 40;

/// write の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { bucket: PathBuf },
    /// 同じ ID の識別行が既にバケットにある
    AlreadyPresent { bucket: PathBuf },
}

pub struct JournalWriter {
    fs: Arc<dyn FileSystem>,
    layout: BucketLayout,
    guard: IdempotencyGuard,
    formatter: BlockFormatter,
    locks: BucketLocks,
    log: ScopedLog,
}

impl JournalWriter {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        layout: BucketLayout,
        guard: IdempotencyGuard,
        formatter: BlockFormatter,
        log: ScopedLog,
    ) -> Self {
        Self {
            fs,
            layout,
            guard,
            formatter,
            locks: BucketLocks::new(),
            log,
        }
    }

    pub fn write(&self, memo: &Memo) -> Result<WriteOutcome, Error> {
        let bucket = self.layout.bucket_file(&memo.create_time);
        let lock = self.locks.lock_for(&bucket);
        let result = {
            let _held = acquire(&lock);
            self.write_locked(memo, bucket.clone())
        };
        self.locks.release(&bucket, lock);
        result
    }

    /// バケットのロックを持った状態で呼ぶ
    fn write_locked(&self, memo: &Memo, bucket: PathBuf) -> Result<WriteOutcome, Error> {
        if self.guard.exists_in(&memo.id, &bucket) {
            self.log.info(
                "memo already in journal, skipped",
                log_fields! { "memo_id" => memo.id, "bucket" => bucket.to_string_lossy() },
            );
            return Ok(WriteOutcome::AlreadyPresent { bucket });
        }

        self.ensure_bucket_dir(&bucket)?;
        let block = self.formatter.build(memo, &bucket)?;

        let existed = self.fs.exists(&bucket);
        let prior = if existed {
            self.fs.read_to_string(&bucket)?
        } else {
            String::new()
        };
        let mut merged = String::with_capacity(prior.len() + block.len());
        merged.push_str(&prior);
        merged.push_str(&block);

        let persisted = if existed {
            self.fs.replace(&bucket, &merged)
        } else {
            self.fs.create_new(&bucket, &merged)
        };
        persisted.map_err(|e| with_bucket_context(&bucket, e))?;

        self.log.info(
            "memo written",
            log_fields! {
                "memo_id" => memo.id,
                "bucket" => bucket.to_string_lossy(),
                "date" => canonical_date(&memo.create_time),
                "mode" => if existed { "replace" } else { "create" },
                "attachments" => memo.resources.len(),
                "preview" => preview(&memo.content, LOG_PREVIEW_CHARS),
            },
        );
        Ok(WriteOutcome::Written { bucket })
    }

    fn ensure_bucket_dir(&self, bucket: &Path) -> Result<(), Error> {
        match bucket.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !self.fs.is_dir(dir) => self
                .fs
                .create_dir_all(dir)
                .map_err(|e| with_bucket_context(bucket, e)),
            _ => Ok(()),
        }
    }
}

/// バケットファイルのパスを含む Write エラーにする（既に Write ならそのまま）
fn with_bucket_context(bucket: &Path, e: Error) -> Error {
    match e {
        Error::Write { .. } => e,
        other => Error::write(bucket, other),
    }
}
