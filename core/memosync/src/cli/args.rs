use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;

use crate::adapter::{AppConfig, ConfigOverrides};
use crate::domain::{AttachmentPolicy, Command, SyncOptions};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: ログを stderr にも出す
    pub verbose: bool,
    /// -d / --home-dir: config.json とログの置き場所
    pub home_dir: Option<String>,
    pub base_url: Option<String>,
    /// -r / --root: 同期先ルート
    pub root: Option<String>,
    pub page_size: Option<u32>,
    /// --since YYYY-MM-DD: この日より前に作成されたメモは取り込まない
    pub since: Option<String>,
    pub attachment_policy: Option<AttachmentPolicy>,
    /// --fail-fast: 1 件の失敗で sync 全体を止める
    pub fail_fast: bool,
    pub command: Option<String>,
}

impl Config {
    /// 設定の読み込みに渡す上書き値
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            home_dir: self.home_dir.clone(),
            base_url: self.base_url.clone(),
            sync_root: self.root.clone(),
            page_size: self.page_size,
            attachment_policy: self.attachment_policy,
        }
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("memosync")
        .about("Append memos into a day-partitioned Markdown journal")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also print log records to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("home-dir")
                .short('d')
                .long("home-dir")
                .value_name("directory")
                .help("Directory holding config.json and logs")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("base-url")
                .long("base-url")
                .value_name("url")
                .help("Memos server base URL")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("root")
                .short('r')
                .long("root")
                .value_name("directory")
                .help("Journal root directory")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("page-size")
                .long("page-size")
                .value_name("n")
                .help("Memos fetched per page")
                .value_parser(value_parser!(u32).range(1..))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("since")
                .long("since")
                .value_name("YYYY-MM-DD")
                .help("Skip memos created before this local date")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("attachment-policy")
                .long("attachment-policy")
                .value_name("policy")
                .help("abort (default) or best_effort")
                .value_parser(|s: &str| s.parse::<AttachmentPolicy>())
                .num_args(1),
        )
        .arg(
            clap::Arg::new("fail-fast")
                .long("fail-fast")
                .help("Stop the sync at the first memo that fails")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("command")
                .index(1)
                .value_name("command")
                .help("sync | status")
                .num_args(1),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        home_dir: matches.get_one::<String>("home-dir").cloned(),
        base_url: matches.get_one::<String>("base-url").cloned(),
        root: matches.get_one::<String>("root").cloned(),
        page_size: matches.get_one::<u32>("page-size").copied(),
        since: matches.get_one::<String>("since").cloned(),
        attachment_policy: matches
            .get_one::<AttachmentPolicy>("attachment-policy")
            .copied(),
        fail_fast: matches.get_flag("fail-fast"),
        command: matches.get_one::<String>("command").cloned(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "memosync", &mut std::io::stdout());
}

/// `YYYY-MM-DD` をその日のローカル 0 時にする
fn parse_since(raw: &str) -> Result<DateTime<Local>, Error> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| Error::invalid_argument(format!("--since '{}': {}", raw, e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::invalid_argument(format!("--since '{}': invalid date", raw)))?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| Error::invalid_argument(format!("--since '{}': no such local time", raw)))
}

/// Config と解決済み設定から Command を作る
pub fn config_to_command(config: &Config, app: &AppConfig) -> Result<Command, Error> {
    if config.help {
        return Ok(Command::Help);
    }
    match config.command.as_deref() {
        None => Ok(Command::Help),
        Some("sync") => Ok(Command::Sync(SyncOptions {
            page_size: app.page_size,
            since: config.since.as_deref().map(parse_since).transpose()?,
            fail_fast: config.fail_fast,
        })),
        Some("status") => Ok(Command::Status),
        Some(other) => Err(Error::invalid_argument(format!(
            "Command '{}' is not implemented.",
            other
        ))),
    }
}
