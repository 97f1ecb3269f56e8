//! 設定の読み込み（adapter 層）
//!
//! 優先順位（後勝ち）: 既定値 → `<home>/config.json` → 環境変数 → CLI オプション

use common::error::Error;
use common::ports::outbound::FileSystem;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::naming::sanitize_name;
use crate::domain::AttachmentPolicy;
use crate::ports::outbound::EnvResolver;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_RESOURCE_DIR: &str = "resources";
const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const LOG_FILENAME: &str = "memosync.log.jsonl";

/// 解決済みの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub home_dir: PathBuf,
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub sync_root: Option<PathBuf>,
    pub resource_dir: String,
    pub page_size: u32,
    pub attachment_policy: AttachmentPolicy,
    pub log_file: PathBuf,
    pub timeout_secs: u64,
}

impl AppConfig {
    /// sync に必要な base_url
    pub fn require_base_url(&self) -> Result<&str, Error> {
        self.base_url.as_deref().ok_or_else(|| {
            Error::config("base_url is not set (config.json, MEMOSYNC_BASE_URL or --base-url)")
        })
    }

    /// sync / status に必要な同期先ルート
    pub fn require_sync_root(&self) -> Result<&Path, Error> {
        self.sync_root.as_deref().ok_or_else(|| {
            Error::config("sync_root is not set (config.json, MEMOSYNC_ROOT or --root)")
        })
    }
}

/// config.json の中身（すべて省略可）
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    access_token: Option<String>,
    sync_root: Option<String>,
    resource_dir: Option<String>,
    page_size: Option<u32>,
    attachment_policy: Option<AttachmentPolicy>,
    log_file: Option<String>,
    timeout_secs: Option<u64>,
}

/// CLI から渡される上書き値
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub home_dir: Option<String>,
    pub base_url: Option<String>,
    pub sync_root: Option<String>,
    pub page_size: Option<u32>,
    pub attachment_policy: Option<AttachmentPolicy>,
}

/// `~/` で始まるパスを HOME で展開する
fn expand_home(raw: &str, env: &dyn EnvResolver) -> PathBuf {
    match (raw.strip_prefix("~/"), env.var("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(raw),
    }
}

fn read_file_config(fs: &dyn FileSystem, path: &Path) -> Result<FileConfig, Error> {
    if !fs.exists(path) {
        return Ok(FileConfig::default());
    }
    let text = fs.read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
}

pub fn load_app_config(
    env: &dyn EnvResolver,
    fs: &dyn FileSystem,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, Error> {
    let home_dir = match &overrides.home_dir {
        Some(h) => expand_home(h, env),
        None => env.resolve_home_dir()?,
    };
    let file = read_file_config(fs, &home_dir.join(CONFIG_FILENAME))?;

    let base_url = overrides
        .base_url
        .clone()
        .or_else(|| env.var("MEMOSYNC_BASE_URL"))
        .or(file.base_url)
        .filter(|s| !s.is_empty());
    let access_token = env
        .var("MEMOSYNC_TOKEN")
        .or(file.access_token)
        .filter(|s| !s.is_empty());
    let sync_root = overrides
        .sync_root
        .clone()
        .or_else(|| env.var("MEMOSYNC_ROOT"))
        .or(file.sync_root)
        .filter(|s| !s.is_empty())
        .map(|s| expand_home(&s, env));

    let resource_dir = file
        .resource_dir
        .unwrap_or_else(|| DEFAULT_RESOURCE_DIR.to_string());
    if resource_dir == ".." || resource_dir == "." || sanitize_name(&resource_dir) != resource_dir {
        return Err(Error::config(format!(
            "resource_dir must be a plain directory name, got '{}'",
            resource_dir
        )));
    }

    let page_size = overrides
        .page_size
        .or(file.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err(Error::config("page_size must be at least 1"));
    }

    let attachment_policy = overrides
        .attachment_policy
        .or(file.attachment_policy)
        .unwrap_or_default();
    let log_file = file
        .log_file
        .map(|s| expand_home(&s, env))
        .unwrap_or_else(|| home_dir.join("log").join(LOG_FILENAME));

    Ok(AppConfig {
        home_dir,
        base_url,
        access_token,
        sync_root,
        resource_dir,
        page_size,
        attachment_policy,
        log_file,
        timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::std_env_resolver::tests::MapEnv;
    use common::adapter::StdFileSystem;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempdir().unwrap();
        let home = dir.path().to_string_lossy().to_string();
        let env = MapEnv::with(&[("MEMOSYNC_HOME", home.as_str())]);
        let cfg = load_app_config(&env, &StdFileSystem, &ConfigOverrides::default()).unwrap();
        assert_eq!(cfg.home_dir, dir.path());
        assert_eq!(cfg.resource_dir, "resources");
        assert_eq!(cfg.page_size, 50);
        assert_eq!(cfg.attachment_policy, AttachmentPolicy::Abort);
        assert_eq!(cfg.log_file, dir.path().join("log").join("memosync.log.jsonl"));
        assert!(cfg.require_base_url().is_err());
        assert!(cfg.require_sync_root().is_err());
    }

    #[test]
    fn test_layering_file_env_cli() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{
                "base_url": "https://file.example",
                "access_token": "file-token",
                "sync_root": "~/journal",
                "page_size": 10,
                "attachment_policy": "best_effort"
            }"#,
        )
        .unwrap();
        let home = dir.path().to_string_lossy().to_string();
        let env = MapEnv::with(&[
            ("MEMOSYNC_HOME", home.as_str()),
            ("HOME", "/home/u"),
            ("MEMOSYNC_BASE_URL", "https://env.example"),
        ]);
        let overrides = ConfigOverrides {
            page_size: Some(5),
            ..Default::default()
        };
        let cfg = load_app_config(&env, &StdFileSystem, &overrides).unwrap();
        assert_eq!(cfg.require_base_url().unwrap(), "https://env.example");
        assert_eq!(cfg.access_token.as_deref(), Some("file-token"));
        assert_eq!(cfg.require_sync_root().unwrap(), Path::new("/home/u/journal"));
        assert_eq!(cfg.page_size, 5);
        assert_eq!(cfg.attachment_policy, AttachmentPolicy::BestEffort);

        let overrides = ConfigOverrides {
            base_url: Some("https://cli.example".to_string()),
            sync_root: Some("/tmp/j".to_string()),
            ..Default::default()
        };
        let cfg = load_app_config(&env, &StdFileSystem, &overrides).unwrap();
        assert_eq!(cfg.require_base_url().unwrap(), "https://cli.example");
        assert_eq!(cfg.require_sync_root().unwrap(), Path::new("/tmp/j"));
    }

    #[test]
    fn test_invalid_config_values() {
        let dir = tempdir().unwrap();
        let home = dir.path().to_string_lossy().to_string();
        let env = MapEnv::with(&[("MEMOSYNC_HOME", home.as_str())]);

        std::fs::write(dir.path().join("config.json"), r#"{"resource_dir": "../x"}"#).unwrap();
        let err = load_app_config(&env, &StdFileSystem, &ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        std::fs::write(dir.path().join("config.json"), r#"{"page_size": 0}"#).unwrap();
        assert!(load_app_config(&env, &StdFileSystem, &ConfigOverrides::default()).is_err());

        std::fs::write(dir.path().join("config.json"), r#"{"unknown_key": 1}"#).unwrap();
        assert!(load_app_config(&env, &StdFileSystem, &ConfigOverrides::default()).is_err());
    }
}
