//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。CLI は `exit_code()` で終了コードを決める。

use std::path::{Path, PathBuf};

/// 共通エラー型
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 汎用 I/O エラー
    #[error("{0}")]
    Io(String),

    /// JSON のシリアライズ・パース失敗
    #[error("{0}")]
    Json(String),

    /// HTTP 通信・ステータス異常
    #[error("{0}")]
    Http(String),

    /// 環境変数の不足など
    #[error("{0}")]
    Env(String),

    /// 引数不正（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),

    /// 設定ファイル・設定値の不正
    #[error("config error: {0}")]
    Config(String),

    /// 添付ファイルの取得失敗（取得元に到達できない）
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// バケットファイルの読み込み失敗
    #[error("read failed for '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// バケットファイルへの書き込み失敗
    #[error("write failed for '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// ブロック整形の失敗（通常は発生しない）
    #[error("format error: {0}")]
    Format(String),

    /// その他のシステムエラー
    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// 読み込み失敗にパスの文脈を付ける
    pub fn read(path: &Path, cause: impl std::fmt::Display) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }

    /// 書き込み失敗にパスの文脈を付ける
    pub fn write(path: &Path, cause: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }

    /// usage 表示が必要なエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// sysexits.h に寄せた終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Json(_) | Self::Config(_) => 65,
            Self::Env(_) => 78,
            Self::Io(_) | Self::Read { .. } | Self::Write { .. } => 74,
            Self::Http(_) | Self::Fetch(_) => 75,
            Self::Format(_) | Self::System(_) => 70,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
