//! 日付キー・ファイル名・相対パスの純粋関数
//!
//! ファイルシステムには触れない。パスは文字列として扱い、リンクは常に `/` 区切り。

use chrono::{DateTime, Local};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::memo::Resource;

/// sanitize_name の結果が空になったときの名前
pub const UNTITLED: &str = "untitled";

/// ファイル名に使えない・危険な文字
const ILLEGAL_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '#'];

/// バケットのキー（ローカル日付の `YYYY-MM-DD`）
pub fn canonical_date(ts: &DateTime<Local>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// ブロック先頭の時刻（`HH:MM`）
pub fn time_of_day(ts: &DateTime<Local>) -> String {
    ts.format("%H:%M").to_string()
}

/// フッターに出す表示用タイムスタンプ
pub fn display_timestamp(ts: &DateTime<Local>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// ファイル名として安全な文字列にする。空になれば `untitled`。
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars() {
        if ILLEGAL_CHARS.contains(&c) {
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    if out.is_empty() {
        UNTITLED.to_string()
    } else {
        out
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// `from_file` のあるディレクトリから `to_file` への最短の相対パス
///
/// 共通の先頭部分を除き、`from` 側の残りディレクトリ数だけ `..` を重ねて `to` 側の残りを繋げる。
pub fn relative_path(from_file: &str, to_file: &str) -> String {
    let from = from_file.replace('\\', "/");
    let to = to_file.replace('\\', "/");
    let from_segs = segments(&from);
    let to_segs = segments(&to);

    let from_dir = &from_segs[..from_segs.len().saturating_sub(1)];
    let max_common = from_dir.len().min(to_segs.len().saturating_sub(1));
    let common = from_dir
        .iter()
        .zip(to_segs.iter())
        .take(max_common)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat("..").take(from_dir.len() - common));
    parts.extend(&to_segs[common..]);
    parts.join("/")
}

/// Path 版の relative_path（OS の区切り文字に依存しない）
pub fn relative_link(from_file: &Path, to_file: &Path) -> String {
    relative_path(&from_file.to_string_lossy(), &to_file.to_string_lossy())
}

/// 取得元識別子の末尾セグメント（`resources/45` → `45`）
pub fn source_fragment(source_name: &str) -> String {
    let last = source_name
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(source_name);
    sanitize_name(last)
}

/// 添付ファイルの保存名（`<fragment>_<sanitized filename>`）
pub fn attachment_file_name(resource: &Resource) -> String {
    format!(
        "{}_{}",
        source_fragment(&resource.name),
        sanitize_name(&resource.filename)
    )
}

/// `YYYY-MM-DD.md` 形式のファイル名か
pub fn is_bucket_file_name(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\.md$").expect("static regex"))
        .is_match(name)
}

/// 同期先ルートの配置（バケットファイルと添付ディレクトリ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLayout {
    sync_root: PathBuf,
    resource_dir_name: String,
}

impl BucketLayout {
    pub fn new(sync_root: impl Into<PathBuf>, resource_dir_name: impl Into<String>) -> Self {
        Self {
            sync_root: sync_root.into(),
            resource_dir_name: resource_dir_name.into(),
        }
    }

    pub fn sync_root(&self) -> &Path {
        &self.sync_root
    }

    pub fn resource_dir_name(&self) -> &str {
        &self.resource_dir_name
    }

    /// `<sync_root>/<YYYY-MM-DD>.md`
    pub fn bucket_file(&self, ts: &DateTime<Local>) -> PathBuf {
        self.sync_root.join(format!("{}.md", canonical_date(ts)))
    }

    /// バケットファイルと同じ階層にある添付ディレクトリ
    pub fn resource_dir_for(&self, bucket_file: &Path) -> PathBuf {
        bucket_file
            .parent()
            .unwrap_or(&self.sync_root)
            .join(&self.resource_dir_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_canonical_date_and_times() {
        let ts = local(2025, 4, 20, 9, 5, 7);
        assert_eq!(canonical_date(&ts), "2025-04-20");
        assert_eq!(time_of_day(&ts), "09:05");
        assert_eq!(display_timestamp(&ts), "2025-04-20 09:05:07");
    }

    #[test]
    fn test_sanitize_name_fallbacks() {
        assert_eq!(sanitize_name(""), "untitled");
        assert_eq!(sanitize_name("####"), "untitled");
        assert_eq!(sanitize_name("   \t "), "untitled");
    }

    #[test]
    fn test_sanitize_name_removes_illegal_chars() {
        assert_eq!(sanitize_name("a/b:c"), "abc");
        assert_eq!(sanitize_name("what?<is>|this*\"\\"), "whatisthis");
    }

    #[test]
    fn test_sanitize_name_collapses_whitespace() {
        assert_eq!(sanitize_name("  \u{7}my   holiday\n photo.png  "), "my holiday photo.png");
    }

    #[test]
    fn test_relative_path_same_dir_subfolder() {
        assert_eq!(
            relative_path("2025/04/2025-04-20.md", "2025/04/resources/x.png"),
            "resources/x.png"
        );
    }

    #[test]
    fn test_relative_path_sibling_dir() {
        assert_eq!(relative_path("a/b/file.md", "a/c/img.png"), "../c/img.png");
    }

    #[test]
    fn test_relative_path_edge_cases() {
        assert_eq!(relative_path("file.md", "img.png"), "img.png");
        assert_eq!(relative_path("/root/j/2025-04-20.md", "/root/j/resources/1_a.png"), "resources/1_a.png");
        assert_eq!(relative_path("a/b/c/file.md", "x/y.png"), "../../../x/y.png");
        assert_eq!(relative_path("a\\b\\file.md", "a\\b\\r\\y.png"), "r/y.png");
    }

    #[test]
    fn test_source_fragment_and_attachment_name() {
        assert_eq!(source_fragment("resources/45"), "45");
        assert_eq!(source_fragment("attachments/ab:c/"), "abc");
        assert_eq!(source_fragment("plain"), "plain");
        let r = Resource::new("resources/45", "my photo?.PNG");
        assert_eq!(attachment_file_name(&r), "45_my photo.PNG");
    }

    #[test]
    fn test_bucket_routing() {
        let layout = BucketLayout::new("/journal", "resources");
        let morning = local(2025, 4, 20, 0, 0, 1);
        let night = local(2025, 4, 20, 23, 59, 59);
        let next = local(2025, 4, 21, 0, 0, 0);
        assert_eq!(layout.bucket_file(&morning), layout.bucket_file(&night));
        assert_ne!(layout.bucket_file(&night), layout.bucket_file(&next));
        assert_eq!(layout.bucket_file(&next), PathBuf::from("/journal/2025-04-21.md"));
        assert_eq!(
            layout.resource_dir_for(&layout.bucket_file(&next)),
            PathBuf::from("/journal/resources")
        );
    }

    #[test]
    fn test_is_bucket_file_name() {
        assert!(is_bucket_file_name("2025-04-20.md"));
        assert!(!is_bucket_file_name("2025-04-20.md.memosync-tmp"));
        assert!(!is_bucket_file_name("notes.md"));
    }
}
