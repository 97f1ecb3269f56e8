//! 依存の組み立て（標準アダプターを usecase に注入する）
//!
//! ロガーはここで 1 つ作り、各コンポーネントには名前付きの ScopedLog として渡す。

use common::adapter::{FileJsonLog, StderrLog, StdFileSystem, TeeLog};
use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogLevel, ScopedLog};
use std::sync::Arc;
use std::time::Duration;

use crate::adapter::{AppConfig, HttpMemoSource};
use crate::domain::{AttachmentPolicy, BucketLayout};
use crate::ports::outbound::MemoSource;
use crate::usecase::{
    AttachmentMaterializer, BlockFormatter, IdempotencyGuard, JournalScanner, JournalWriter,
    StatusUseCase, SyncUseCase,
};

pub struct App {
    pub config: AppConfig,
    pub fs: Arc<dyn FileSystem>,
    pub logger: Arc<dyn Log>,
}

impl App {
    /// cli 層から使うロガー
    pub fn cli_log(&self) -> ScopedLog {
        ScopedLog::new(Arc::clone(&self.logger), "cli", "main")
    }

    fn layout(&self) -> Result<BucketLayout, Error> {
        Ok(BucketLayout::new(
            self.config.require_sync_root()?,
            self.config.resource_dir.clone(),
        ))
    }

    pub fn sync_use_case(&self) -> Result<SyncUseCase, Error> {
        let source: Arc<dyn MemoSource> = Arc::new(HttpMemoSource::new(
            self.config.require_base_url()?,
            self.config.access_token.clone(),
            Duration::from_secs(self.config.timeout_secs),
        )?);
        Ok(wire_sync(
            Arc::clone(&self.fs),
            source,
            Arc::clone(&self.logger),
            self.layout()?,
            self.config.attachment_policy,
        ))
    }

    pub fn status_use_case(&self) -> Result<StatusUseCase, Error> {
        let scanner = JournalScanner::new(Arc::clone(&self.fs), self.layout()?);
        Ok(StatusUseCase::new(Arc::clone(&self.fs), scanner))
    }
}

/// JournalWriter を組み立てる（テストからは MemoSource を差し替えて使う）
pub fn wire_journal_writer(
    fs: Arc<dyn FileSystem>,
    source: Arc<dyn MemoSource>,
    logger: Arc<dyn Log>,
    layout: BucketLayout,
    policy: AttachmentPolicy,
) -> JournalWriter {
    let scoped = |component: &'static str| ScopedLog::new(Arc::clone(&logger), "usecase", component);
    let materializer = AttachmentMaterializer::new(
        Arc::clone(&fs),
        source,
        layout.clone(),
        scoped("attachment"),
    );
    let formatter = BlockFormatter::new(materializer, policy, scoped("formatter"));
    let guard = IdempotencyGuard::new(Arc::clone(&fs), layout.clone(), scoped("idempotency"));
    JournalWriter::new(fs, layout, guard, formatter, scoped("journal_writer"))
}

pub fn wire_sync(
    fs: Arc<dyn FileSystem>,
    source: Arc<dyn MemoSource>,
    logger: Arc<dyn Log>,
    layout: BucketLayout,
    policy: AttachmentPolicy,
) -> SyncUseCase {
    let writer = wire_journal_writer(fs, Arc::clone(&source), Arc::clone(&logger), layout, policy);
    SyncUseCase::new(source, writer, ScopedLog::new(logger, "usecase", "sync"))
}

pub fn wire_memosync(config: AppConfig, verbose: bool) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let file_log: Arc<dyn Log> = Arc::new(FileJsonLog::new(&config.log_file));
    let logger: Arc<dyn Log> = if verbose {
        Arc::new(TeeLog::new(vec![
            file_log,
            Arc::new(StderrLog::new(LogLevel::Debug)),
        ]))
    } else {
        file_log
    };
    App { config, fs, logger }
}
