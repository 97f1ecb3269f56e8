//! メモ 1 件をジャーナルブロックにする
//!
//! 添付の実体化結果を AttachmentPolicy に従って扱い、domain::block::render_block に渡す。

use common::error::Error;
use common::log_fields;
use common::ports::outbound::ScopedLog;
use std::path::Path;

use super::attachment::AttachmentMaterializer;
use crate::domain::block::render_block;
use crate::domain::{AttachmentOutcome, AttachmentPolicy, Memo};

pub struct BlockFormatter {
    materializer: AttachmentMaterializer,
    policy: AttachmentPolicy,
    log: ScopedLog,
}

impl BlockFormatter {
    pub fn new(materializer: AttachmentMaterializer, policy: AttachmentPolicy, log: ScopedLog) -> Self {
        Self {
            materializer,
            policy,
            log,
        }
    }

    /// ブロックを組み立てる。Abort のときは添付が 1 件でも失敗すれば Err（途中のブロックは返さない）。
    pub fn build(&self, memo: &Memo, bucket_file: &Path) -> Result<String, Error> {
        let results = self.materializer.materialize_each(&memo.resources, bucket_file);

        let mut outcomes = Vec::with_capacity(results.len());
        let mut first_err = None;
        for (resource, result) in results {
            match result {
                Ok(Some(link)) => outcomes.push(AttachmentOutcome::Materialized { resource, link }),
                Ok(None) => outcomes.push(AttachmentOutcome::Skipped { resource }),
                Err(e) => {
                    outcomes.push(AttachmentOutcome::Failed {
                        resource,
                        reason: e.to_string(),
                    });
                    first_err.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_err {
            if self.policy == AttachmentPolicy::Abort {
                self.log.error(
                    "block aborted by attachment failure",
                    log_fields! { "memo_id" => memo.id, "error" => e.to_string() },
                );
                return Err(e);
            }
        }
        Ok(render_block(memo, &outcomes))
    }
}
