//! ファイルシステム Outbound ポート
//!
//! usecase はこの trait 経由でのみファイル I/O を行う。

use crate::error::Error;
use std::path::{Path, PathBuf};

/// ファイルメタデータ（取れれば存在する）
#[derive(Debug, Clone)]
pub struct FileMetadata {
    is_dir: bool,
}

impl FileMetadata {
    pub fn new(is_dir: bool) -> Self {
        Self { is_dir }
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// ファイルシステム抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdFileSystem` やテスト用のラッパなど。
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, Error>;
    /// バイト列を書き込む（既存なら上書き）
    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<(), Error>;
    /// 新規ファイルを作成して書き込む。既に存在する場合はエラー。
    fn create_new(&self, path: &Path, contents: &str) -> Result<(), Error>;
    /// 既存ファイルの内容を丸ごと置き換える（途中状態を残さない）
    fn replace(&self, path: &Path, contents: &str) -> Result<(), Error>;
    /// 1 階層だけディレクトリを作る。既に存在する場合は成功扱い。
    fn create_dir(&self, path: &Path) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error>;
    /// ディレクトリ直下のエントリのフルパス一覧
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Error>;

    /// パスが存在するか（metadata が取れれば true）
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }

    /// パスがディレクトリか
    fn is_dir(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }
}
