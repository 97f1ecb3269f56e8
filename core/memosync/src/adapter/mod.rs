//! アダプター（Outbound ポートの実装と設定の読み込み）

pub mod config;
pub mod http_memo_source;
pub mod std_env_resolver;

pub use config::{load_app_config, AppConfig, ConfigOverrides};
pub use http_memo_source::HttpMemoSource;
pub use std_env_resolver::StdEnvResolver;
