//! 構造化ログ Outbound ポート
//!
//! 各コンポーネントは `ScopedLog` をコンストラクタで受け取り、自分の名前付きでログを出す。
//! プロセス全体で共有するグローバルなロガーは持たない。

use crate::error::Error;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 現在時刻を ISO8601 (RFC3339) で返す。LogRecord の `ts` に使う。
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// 追加フィールド（キー順を固定するため BTreeMap）
pub type LogFields = BTreeMap<String, serde_json::Value>;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// 1 行分のログレコード（JSONL の 1 行に対応）
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// ISO8601 形式のタイムスタンプ
    pub ts: String,
    pub level: LogLevel,
    pub message: String,
    /// 例: cli, usecase, adapter, wiring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// コンポーネント名。例: journal_writer, idempotency, attachment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<LogFields>,
}

/// 構造化ログを出力する Outbound ポート
///
/// 実装は common::adapter::FileJsonLog（ファイルへ JSONL 追記）や NoopLog（テスト用）など。
pub trait Log: Send + Sync {
    fn log(&self, record: &LogRecord) -> Result<(), Error>;
}

/// layer / kind を固定したロガー
///
/// ログ出力の失敗は呼び出し元に返さない（本処理を止めない）。
#[derive(Clone)]
pub struct ScopedLog {
    inner: Arc<dyn Log>,
    layer: &'static str,
    component: &'static str,
}

impl ScopedLog {
    pub fn new(inner: Arc<dyn Log>, layer: &'static str, component: &'static str) -> Self {
        Self {
            inner,
            layer,
            component,
        }
    }

    pub fn emit(&self, level: LogLevel, message: &str, fields: LogFields) {
        let _ = self.inner.log(&LogRecord {
            ts: now_iso8601(),
            level,
            message: message.to_string(),
            layer: Some(self.layer.to_string()),
            kind: Some(self.component.to_string()),
            fields: if fields.is_empty() { None } else { Some(fields) },
        });
    }

    pub fn error(&self, message: &str, fields: LogFields) {
        self.emit(LogLevel::Error, message, fields);
    }

    pub fn warn(&self, message: &str, fields: LogFields) {
        self.emit(LogLevel::Warn, message, fields);
    }

    pub fn info(&self, message: &str, fields: LogFields) {
        self.emit(LogLevel::Info, message, fields);
    }

    pub fn debug(&self, message: &str, fields: LogFields) {
        self.emit(LogLevel::Debug, message, fields);
    }
}

/// `log_fields! { "key" => value, ... }` で LogFields を組み立てる
#[macro_export]
macro_rules! log_fields {
    () => { $crate::ports::outbound::LogFields::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut m = $crate::ports::outbound::LogFields::new();
        $( m.insert($key.to_string(), $crate::serde_json::json!($value)); )+
        m
    }};
}
