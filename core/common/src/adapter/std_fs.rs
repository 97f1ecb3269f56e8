//! 標準ファイルシステム実装（std::fs を委譲）

use crate::error::Error;
use crate::ports::outbound::{FileMetadata, FileSystem};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 置き換え時の一時ファイルに付ける接尾辞
const REPLACE_TMP_SUFFIX: &str = ".memosync-tmp";

/// 標準ライブラリの fs をそのまま委譲する FileSystem 実装
#[derive(Debug, Clone, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        std::fs::read_to_string(path).map_err(|e| Error::read(path, e))
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<(), Error> {
        std::fs::write(path, contents).map_err(|e| Error::write(path, e))
    }

    fn create_new(&self, path: &Path, contents: &str) -> Result<(), Error> {
        let mut f = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| Error::write(path, e))?;
        f.write_all(contents.as_bytes())
            .map_err(|e| Error::write(path, e))?;
        f.sync_all().map_err(|e| Error::write(path, e))?;
        Ok(())
    }

    fn replace(&self, path: &Path, contents: &str) -> Result<(), Error> {
        // 同じディレクトリの一時ファイルへ書いてから rename する（旧内容か新内容のどちらかだけが見える）
        let file_name = path
            .file_name()
            .ok_or_else(|| Error::write(path, "path has no file name"))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(REPLACE_TMP_SUFFIX);
        let tmp = path.with_file_name(tmp_name);

        let result = (|| {
            let mut f = std::fs::File::create(&tmp).map_err(|e| Error::write(&tmp, e))?;
            f.write_all(contents.as_bytes())
                .map_err(|e| Error::write(&tmp, e))?;
            f.sync_all().map_err(|e| Error::write(&tmp, e))?;
            std::fs::rename(&tmp, path).map_err(|e| Error::write(path, e))
        })();
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result
    }

    fn create_dir(&self, path: &Path) -> Result<(), Error> {
        if self.is_dir(path) {
            return Ok(());
        }
        match std::fs::create_dir(path) {
            Ok(()) => Ok(()),
            // exists を確認してから create するまでの間に他者が作った場合
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && self.is_dir(path) => Ok(()),
            Err(e) => Err(Error::io_msg(format!(
                "Failed to create directory '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
        std::fs::create_dir_all(path).map_err(|e| {
            Error::io_msg(format!("Failed to create directory '{}': {}", path.display(), e))
        })
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error> {
        let m = std::fs::metadata(path).map_err(|e| {
            Error::io_msg(format!(
                "Failed to get metadata for '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(FileMetadata::new(m.is_dir()))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Error> {
        let entries = std::fs::read_dir(path).map_err(|e| {
            Error::io_msg(format!(
                "Failed to read directory '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::io_msg(format!("Failed to read directory entry: {}", e))
            })?;
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }
}
