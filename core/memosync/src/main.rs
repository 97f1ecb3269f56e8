mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;

use adapter::{load_app_config, StdEnvResolver};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::adapter::StdFileSystem;
use common::error::Error;
use common::log_fields;
use domain::{Command, SyncReport};
use ports::inbound::UseCaseRunner;
use usecase::BucketStatus;
use wiring::{wire_memosync, App};

/// 失敗したメモがあったときの終了コード
const EXIT_PARTIAL_FAILURE: i32 = 1;

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner;

impl Runner {
    fn dispatch(&self, app: &App, command: Command) -> Result<i32, Error> {
        match command {
            Command::Help => {
                print_help();
                Ok(0)
            }
            Command::Sync(options) => {
                let report = app.sync_use_case()?.run(&options)?;
                print_sync_report(&report);
                Ok(if report.is_success() { 0 } else { EXIT_PARTIAL_FAILURE })
            }
            Command::Status => {
                let buckets = app.status_use_case()?.run()?;
                print_status(&buckets);
                Ok(0)
            }
        }
    }
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        if config.help || config.command.is_none() {
            print_help();
            return Ok(0);
        }
        let app_config = load_app_config(&StdEnvResolver, &StdFileSystem, &config.overrides())?;
        let command = config_to_command(&config, &app_config)?;
        let app = wire_memosync(app_config, config.verbose);
        let log = app.cli_log();
        log.info(
            "command started",
            log_fields! { "command" => config.command.as_deref().unwrap_or("") },
        );

        let result = self.dispatch(&app, command);
        match &result {
            Ok(code) => log.info("command finished", log_fields! { "exit_code" => code }),
            Err(e) => log.error(
                "command failed",
                log_fields! { "error" => e.to_string(), "exit_code" => e.exit_code() },
            ),
        }
        result
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("memosync: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn print_usage() {
    eprintln!("Usage: memosync [-h] [-v] [-d|--home-dir directory] [-r|--root directory] [--base-url url] <command>");
}

fn print_help() {
    println!("Usage: memosync [-h] [-v] [-d|--home-dir directory] [-r|--root directory] [--base-url url] <command>");
    println!("  -h, --help                 Display this help message.");
    println!("  -v, --verbose              Also print log records to stderr.");
    println!("  -d, --home-dir             Directory holding config.json and logs.");
    println!("  -r, --root                 Journal root directory (one <YYYY-MM-DD>.md per day).");
    println!("  --base-url                 Memos server base URL.");
    println!("  --page-size <n>            Memos fetched per page (default 50).");
    println!("  --since <YYYY-MM-DD>       Skip memos created before this local date.");
    println!("  --attachment-policy <p>    abort (default) or best_effort.");
    println!("  --fail-fast                Stop at the first memo that fails.");
    println!("  --generate <shell>         Generate shell completion script (bash, zsh, fish).");
    println!();
    println!("Environment:");
    println!("  MEMOSYNC_HOME      Home directory. Default: $XDG_CONFIG_HOME/memosync or ~/.config/memosync.");
    println!("  MEMOSYNC_BASE_URL  Memos server base URL.");
    println!("  MEMOSYNC_TOKEN     Access token sent as a bearer token.");
    println!("  MEMOSYNC_ROOT      Journal root directory.");
    println!();
    println!("Commands:");
    println!("  sync     Fetch memos and append the ones not yet in the journal.");
    println!("  status   List journal files and the number of memos in each.");
}

fn print_sync_report(report: &SyncReport) {
    println!(
        "written: {}, already present: {}, filtered: {}, failed: {}",
        report.written,
        report.already_present,
        report.filtered,
        report.failures.len()
    );
    for f in &report.failures {
        eprintln!("  {}: {}", f.memo_id, f.message);
    }
}

fn print_status(buckets: &[BucketStatus]) {
    if buckets.is_empty() {
        println!("(no journal files)");
        return;
    }
    let total: usize = buckets.iter().map(|b| b.memo_count).sum();
    for b in buckets {
        println!("{:>5}  {}", b.memo_count, b.path.display());
    }
    println!("{:>5}  total in {} file(s)", total, buckets.len());
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    Runner.run(config)
}
