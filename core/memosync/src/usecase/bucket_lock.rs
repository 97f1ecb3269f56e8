//! バケットファイル単位のプロセス内ロック
//!
//! 同じバケットへの読み込み〜書き込みを直列化する。別プロセスとの排他は扱わない。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
pub struct BucketLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl BucketLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// バケットのロックを取り出す（無ければ作る）
    pub fn lock_for(&self, bucket_file: &Path) -> Arc<Mutex<()>> {
        // 中身が () なので poison しても状態は壊れていない
        let mut map = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        map.entry(bucket_file.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// lock_for で得たロックを返す。他に持ち主がいなければ表から消す。
    pub fn release(&self, bucket_file: &Path, lock: Arc<Mutex<()>>) {
        let mut map = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        drop(lock);
        // 表の 1 本だけが残っていれば誰も待っていない
        if map
            .get(bucket_file)
            .is_some_and(|held| Arc::strong_count(held) == 1)
        {
            map.remove(bucket_file);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

/// lock_for で得たロックを取る
pub fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(|p| p.into_inner())
}
