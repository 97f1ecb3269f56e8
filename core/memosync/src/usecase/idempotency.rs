//! 書き込み済みかどうかの判定
//!
//! バケットファイル 1 つを読んで識別行を探すだけ。索引は持たない。
//! 読み込みに失敗したときは「未書き込み」とみなす（取りこぼすより再書き込みを選ぶ）。

use chrono::{DateTime, Local};
use common::log_fields;
use common::ports::outbound::{FileSystem, ScopedLog};
use std::path::Path;
use std::sync::Arc;

use crate::domain::block::contains_marker;
use crate::domain::BucketLayout;

pub struct IdempotencyGuard {
    fs: Arc<dyn FileSystem>,
    layout: BucketLayout,
    log: ScopedLog,
}

impl IdempotencyGuard {
    pub fn new(fs: Arc<dyn FileSystem>, layout: BucketLayout, log: ScopedLog) -> Self {
        Self { fs, layout, log }
    }

    /// create_time からバケットを求めて判定する
    pub fn exists(&self, memo_id: &str, create_time: &DateTime<Local>) -> bool {
        let bucket = self.layout.bucket_file(create_time);
        self.exists_in(memo_id, &bucket)
    }

    /// バケットファイルを指定して判定する
    pub fn exists_in(&self, memo_id: &str, bucket_file: &Path) -> bool {
        if !self.fs.exists(bucket_file) {
            return false;
        }
        match self.fs.read_to_string(bucket_file) {
            Ok(text) => contains_marker(&text, memo_id),
            Err(e) => {
                self.log.error(
                    "bucket read failed, treating memo as not yet written",
                    log_fields! {
                        "memo_id" => memo_id,
                        "bucket" => bucket_file.to_string_lossy(),
                        "error" => e.to_string(),
                    },
                );
                false
            }
        }
    }
}
