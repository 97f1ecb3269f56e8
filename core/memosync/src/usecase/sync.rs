//! sync コマンドのユースケース
//!
//! 取得元の一覧をページ順にたどり、メモを 1 件ずつ順番に JournalWriter へ渡す。
//! 一覧の取得に失敗したらその時点で Err。メモ単位の失敗は fail_fast でなければ記録して続ける。

use common::error::Error;
use common::log_fields;
use common::ports::outbound::ScopedLog;
use std::collections::HashSet;
use std::sync::Arc;

use super::journal_writer::{JournalWriter, WriteOutcome};
use crate::domain::{MemoFailure, SyncOptions, SyncReport};
use crate::ports::outbound::MemoSource;

pub struct SyncUseCase {
    source: Arc<dyn MemoSource>,
    writer: JournalWriter,
    log: ScopedLog,
}

impl SyncUseCase {
    pub fn new(source: Arc<dyn MemoSource>, writer: JournalWriter, log: ScopedLog) -> Self {
        Self { source, writer, log }
    }

    pub fn run(&self, options: &SyncOptions) -> Result<SyncReport, Error> {
        if options.page_size == 0 {
            return Err(Error::invalid_argument("page size must be at least 1"));
        }
        let mut report = SyncReport::default();
        let mut token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let page = self.source.list_memos(options.page_size, token.as_deref())?;
            self.log.debug(
                "page fetched",
                log_fields! { "count" => page.memos.len(), "token" => token },
            );

            for memo in &page.memos {
                if let Some(since) = &options.since {
                    if memo.create_time < *since {
                        report.filtered += 1;
                        continue;
                    }
                }
                match self.writer.write(memo) {
                    Ok(WriteOutcome::Written { .. }) => report.written += 1,
                    Ok(WriteOutcome::AlreadyPresent { .. }) => report.already_present += 1,
                    Err(e) => {
                        self.log.error(
                            "memo write failed",
                            log_fields! { "memo_id" => memo.id, "error" => e.to_string() },
                        );
                        if options.fail_fast {
                            return Err(e);
                        }
                        report.failures.push(MemoFailure {
                            memo_id: memo.id.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => {
                    if !seen_tokens.insert(next.clone()) {
                        self.log.warn(
                            "page token repeated, stopping",
                            log_fields! { "token" => next },
                        );
                        break;
                    }
                    token = Some(next);
                }
                None => break,
            }
        }

        self.log.info(
            "sync finished",
            log_fields! {
                "written" => report.written,
                "already_present" => report.already_present,
                "filtered" => report.filtered,
                "failed" => report.failures.len(),
            },
        );
        Ok(report)
    }
}
