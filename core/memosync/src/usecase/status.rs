//! status コマンドのユースケース
//!
//! バケットファイルごとに識別行の数（= 取り込み済みメモ数）を数える。

use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::PathBuf;
use std::sync::Arc;

use super::journal_scan::JournalScanner;
use crate::domain::block::marker_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketStatus {
    pub path: PathBuf,
    pub memo_count: usize,
}

pub struct StatusUseCase {
    fs: Arc<dyn FileSystem>,
    scanner: JournalScanner,
}

impl StatusUseCase {
    pub fn new(fs: Arc<dyn FileSystem>, scanner: JournalScanner) -> Self {
        Self { fs, scanner }
    }

    pub fn run(&self) -> Result<Vec<BucketStatus>, Error> {
        let mut out = Vec::new();
        for path in self.scanner.walk() {
            let path = path?;
            let text = self.fs.read_to_string(&path)?;
            let memo_count = text
                .lines()
                .filter(|l| marker_id(l).is_some())
                .count();
            out.push(BucketStatus { path, memo_count });
        }
        Ok(out)
    }
}
