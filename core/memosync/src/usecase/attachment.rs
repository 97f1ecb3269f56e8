//! 添付ファイルの実体化
//!
//! 取得元からバイト列を取り、バケットと同じ階層の添付ディレクトリへ書いて、
//! バケットファイルからの相対リンクを返す。

use common::error::Error;
use common::log_fields;
use common::ports::outbound::{FileSystem, ScopedLog};
use std::path::Path;
use std::sync::Arc;

use crate::domain::naming::{attachment_file_name, relative_link};
use crate::domain::{BucketLayout, Resource};
use crate::ports::outbound::MemoSource;

pub struct AttachmentMaterializer {
    fs: Arc<dyn FileSystem>,
    source: Arc<dyn MemoSource>,
    layout: BucketLayout,
    log: ScopedLog,
}

impl AttachmentMaterializer {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        source: Arc<dyn MemoSource>,
        layout: BucketLayout,
        log: ScopedLog,
    ) -> Self {
        Self {
            fs,
            source,
            layout,
            log,
        }
    }

    /// 1 件を実体化する。取得元に無ければ Ok(None)。
    pub fn materialize(&self, resource: &Resource, bucket_file: &Path) -> Result<Option<String>, Error> {
        let Some(bytes) = self.source.download_resource(resource)? else {
            self.log.warn(
                "attachment missing at source, skipped",
                log_fields! { "resource" => resource.name, "filename" => resource.filename },
            );
            return Ok(None);
        };

        let dir = self.layout.resource_dir_for(bucket_file);
        if !self.fs.is_dir(&dir) {
            self.fs.create_dir(&dir)?;
        }
        let target = dir.join(attachment_file_name(resource));
        self.fs.write_bytes(&target, &bytes)?;

        let link = relative_link(bucket_file, &target);
        self.log.debug(
            "attachment written",
            log_fields! {
                "resource" => resource.name,
                "path" => target.to_string_lossy(),
                "bytes" => bytes.len(),
            },
        );
        Ok(Some(link))
    }

    /// 全件をそれぞれ独立に試みる。1 件の失敗は他の添付に影響しない。
    pub fn materialize_each(
        &self,
        resources: &[Resource],
        bucket_file: &Path,
    ) -> Vec<(Resource, Result<Option<String>, Error>)> {
        resources
            .iter()
            .map(|r| {
                let result = self.materialize(r, bucket_file);
                if let Err(e) = &result {
                    self.log.warn(
                        "attachment failed",
                        log_fields! { "resource" => r.name, "error" => e.to_string() },
                    );
                }
                (r.clone(), result)
            })
            .collect()
    }
}
