//! 環境変数解決 Outbound ポート
//!
//! 設定の読み込みはこの trait 経由でのみ環境変数を見る。

use common::error::Error;
use std::path::PathBuf;

pub trait EnvResolver: Send + Sync {
    /// 空文字列は未設定とみなす
    fn var(&self, key: &str) -> Option<String>;

    /// ホームディレクトリ（config.json とログの置き場所）を解決する
    ///
    /// 優先順位:
    /// 1. MEMOSYNC_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/memosync（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/memosync
    fn resolve_home_dir(&self) -> Result<PathBuf, Error> {
        if let Some(home) = self.var("MEMOSYNC_HOME") {
            return Ok(PathBuf::from(home));
        }
        let config_base = self
            .var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| self.var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok_or_else(|| Error::env("HOME is not set"))?;
        Ok(config_base.join("memosync"))
    }
}
