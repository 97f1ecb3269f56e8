//! Log の標準実装
//!
//! - FileJsonLog: ファイルへ JSONL 追記
//! - StderrLog: -v 指定時に人間向けの 1 行を stderr へ
//! - TeeLog: 複数の Log へ同じレコードを流す
//! - NoopLog: テスト用

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// ファイルへ JSONL を追記する Log 実装
pub struct FileJsonLog {
    path: PathBuf,
    // 同一プロセス内の並行書き込みで行が混ざらないようにする
    lock: Mutex<()>,
}

impl FileJsonLog {
    /// ログファイルパスへ追記する logger を生成する。
    /// 親ディレクトリが無ければ作成する（初回書き込み時）。
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }
}

impl Log for FileJsonLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::system("log lock poisoned"))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
        }
        let mut w = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::write(&self.path, e))?;
        let mut line = serde_json::to_string(record).map_err(|e| Error::json(e.to_string()))?;
        line.push('\n');
        w.write_all(line.as_bytes())
            .map_err(|e| Error::write(&self.path, e))?;
        Ok(())
    }
}

/// stderr へ要点のみ出力する Log 実装
pub struct StderrLog {
    max_level: LogLevel,
}

impl StderrLog {
    pub fn new(max_level: LogLevel) -> Self {
        Self { max_level }
    }
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if record.level > self.max_level {
            return Ok(());
        }
        let mut line = format!(
            "[{}] {}: {}",
            record.level.as_str(),
            record.kind.as_deref().unwrap_or("-"),
            record.message
        );
        if let Some(fields) = &record.fields {
            for (k, v) in fields {
                match v {
                    serde_json::Value::String(s) => line.push_str(&format!(" {}={}", k, s)),
                    other => line.push_str(&format!(" {}={}", k, other)),
                }
            }
        }
        eprintln!("{}", line);
        Ok(())
    }
}

/// 複数の Log へ流す。最初に失敗したものを返すが、残りにも必ず流す。
pub struct TeeLog {
    sinks: Vec<Arc<dyn Log>>,
}

impl TeeLog {
    pub fn new(sinks: Vec<Arc<dyn Log>>) -> Self {
        Self { sinks }
    }
}

impl Log for TeeLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.log(record) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// 何も出力しない Log 実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _record: &LogRecord) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::now_iso8601;
    use tempfile::tempdir;

    fn record(message: &str) -> LogRecord {
        LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: message.to_string(),
            layer: None,
            kind: None,
            fields: None,
        }
    }

    #[test]
    fn test_noop_log() {
        assert!(NoopLog.log(&record("test")).is_ok());
    }

    #[test]
    fn test_file_json_log_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("memosync.log.jsonl");
        let log = FileJsonLog::new(&path);
        log.log(&record("first")).unwrap();
        log.log(&record("second")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let v: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(v["message"], "second");
    }

    #[test]
    fn test_tee_log_reaches_every_sink() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jsonl");
        let b = dir.path().join("b.jsonl");
        let tee = TeeLog::new(vec![
            Arc::new(FileJsonLog::new(&a)),
            Arc::new(NoopLog),
            Arc::new(FileJsonLog::new(&b)),
        ]);
        tee.log(&record("x")).unwrap();
        assert!(a.exists());
        assert!(b.exists());
    }
}
