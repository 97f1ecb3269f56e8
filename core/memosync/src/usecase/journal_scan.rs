//! 同期先ルート以下のバケットファイルを遅延で列挙する
//!
//! 書き込み経路からは使わない（status や将来の突き合わせ用）。
//! walk() を呼ぶたびに先頭からやり直す。

use common::error::Error;
use common::ports::outbound::FileSystem;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::naming::is_bucket_file_name;
use crate::domain::BucketLayout;

pub struct JournalScanner {
    fs: Arc<dyn FileSystem>,
    layout: BucketLayout,
}

impl JournalScanner {
    pub fn new(fs: Arc<dyn FileSystem>, layout: BucketLayout) -> Self {
        Self { fs, layout }
    }

    pub fn walk(&self) -> JournalWalk {
        let root = self.layout.sync_root().to_path_buf();
        let dirs = if self.fs.is_dir(&root) { vec![root] } else { Vec::new() };
        JournalWalk {
            fs: Arc::clone(&self.fs),
            resource_dir_name: self.layout.resource_dir_name().to_string(),
            dirs,
            files: VecDeque::new(),
        }
    }
}

/// 深さ優先・名前順でバケットファイルを返すイテレータ
pub struct JournalWalk {
    fs: Arc<dyn FileSystem>,
    resource_dir_name: String,
    dirs: Vec<PathBuf>,
    files: VecDeque<PathBuf>,
}

impl Iterator for JournalWalk {
    type Item = Result<PathBuf, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(f) = self.files.pop_front() {
                return Some(Ok(f));
            }
            let dir = self.dirs.pop()?;
            let entries = match self.fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => return Some(Err(e)),
            };
            let mut subdirs = Vec::new();
            for entry in entries {
                let Some(name) = entry.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                    continue;
                };
                if self.fs.is_dir(&entry) {
                    if name != self.resource_dir_name && !name.starts_with('.') {
                        subdirs.push(entry);
                    }
                } else if is_bucket_file_name(&name) {
                    self.files.push_back(entry);
                }
            }
            // pop で名前順に取り出せるよう逆順で積む
            subdirs.sort();
            self.dirs.extend(subdirs.into_iter().rev());
        }
    }
}
