pub(crate) mod attachment;
pub(crate) mod bucket_lock;
pub(crate) mod formatter;
pub(crate) mod idempotency;
pub(crate) mod journal_scan;
pub(crate) mod journal_writer;
pub(crate) mod status;
pub(crate) mod sync;

pub(crate) use attachment::AttachmentMaterializer;
pub(crate) use formatter::BlockFormatter;
pub(crate) use idempotency::IdempotencyGuard;
pub(crate) use journal_scan::JournalScanner;
pub(crate) use journal_writer::{JournalWriter, WriteOutcome};
pub(crate) use status::{BucketStatus, StatusUseCase};
pub(crate) use sync::SyncUseCase;
