//! ジャーナルブロックの整形（純粋関数）
//!
//! 添付ファイルの実体化は usecase 側で行い、ここには結果（AttachmentOutcome）だけが渡る。
//!
//! ブロックの形:
//!
//! ```text
//!
//! ### 09:30
//! 本文
//!
//! **Images**
//! ![photo.png](resources/45_photo.png)
//!
//! **Files**
//! - [notes.pdf](resources/46_notes.pdf)
//!
//! ---
//! > [!note]- Properties
//! > - Created: 2025-04-20 09:30:00
//! > - Updated: 2025-04-20 09:31:00
//! > - Type: memos
//! > - Tags: #work
//! > - ID: abc123
//! > - Visibility: public
//! ```

use regex::Regex;
use std::sync::OnceLock;

use super::memo::{Memo, Resource};
use super::naming::{display_timestamp, time_of_day};

/// 重複判定に使う行の接頭辞。外部ツールもこの形で grep するため変更しない。
pub const MARKER_PREFIX: &str = "> - ID: ";

/// フッターの Type 行に出す固定値
pub const TYPE_TAG: &str = "memos";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// メモ ID の識別行
pub fn marker_line(memo_id: &str) -> String {
    format!("{}{}", MARKER_PREFIX, memo_id)
}

/// 添付ファイルの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Other,
}

/// 表示名の拡張子で種別を判定する（大文字小文字は区別しない）
pub fn classify(filename: &str) -> AttachmentKind {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => return AttachmentKind::Other,
    };
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        AttachmentKind::Image
    } else {
        AttachmentKind::Other
    }
}

/// 添付 1 件の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentOutcome {
    /// 書き込み済み。link はバケットファイルからの相対パス。
    Materialized { resource: Resource, link: String },
    /// 取得元に存在しない
    Skipped { resource: Resource },
    /// 取得・書き込みに失敗（best_effort のときだけブロックに残る）
    Failed { resource: Resource, reason: String },
}

fn tag_rewrite_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#([^#\s]+)#").expect("static regex"))
}

fn tag_extract_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#([^#\s]+)").expect("static regex"))
}

/// `#tag#` を `#tag` に書き換える
pub fn rewrite_tags(content: &str) -> String {
    tag_rewrite_re().replace_all(content, "#$1").into_owned()
}

/// `#token` を出現順にそのまま抜き出す（重複も残す）
///
/// token は次の `#`・空白・文字列末尾で終わる。
pub fn extract_tags(content: &str) -> Vec<String> {
    tag_extract_re()
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}

/// 本文中の識別行と同じ形の行をエスケープし、他のメモの ID と誤認されないようにする
fn neutralize_marker_lines(body: &str) -> String {
    body.lines()
        .map(|line| {
            if line.trim_start().starts_with(MARKER_PREFIX) {
                format!("\\{}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown のリンク先。空白や括弧を含む場合は `<...>` で囲む。
///
/// `<` `>` は sanitize_name で落ちているのでそのまま囲める。
fn link_target(link: &str) -> String {
    if link.contains([' ', '(', ')']) {
        format!("<{}>", link)
    } else {
        link.to_string()
    }
}

/// リンクの表示テキスト（`[...]` の中）で閉じ括弧と誤認される文字をエスケープする
fn link_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// メモ 1 件分のブロックを組み立てる
///
/// outcomes は memo.resources と同じ順序で渡す。同じ入力なら常に同じ文字列を返す。
pub fn render_block(memo: &Memo, outcomes: &[AttachmentOutcome]) -> String {
    let body = neutralize_marker_lines(rewrite_tags(&memo.content).trim_end());
    let mut out = format!("\n### {}\n{}\n", time_of_day(&memo.create_time), body);

    let mut images = Vec::new();
    let mut files = Vec::new();
    for outcome in outcomes {
        match outcome {
            AttachmentOutcome::Materialized { resource, link } => {
                match classify(&resource.filename) {
                    AttachmentKind::Image => images.push(format!(
                        "![{}]({})",
                        link_label(&resource.filename),
                        link_target(link)
                    )),
                    AttachmentKind::Other => files.push(format!(
                        "- [{}]({})",
                        link_label(&resource.filename),
                        link_target(link)
                    )),
                }
            }
            AttachmentOutcome::Failed { resource, reason } => files.push(format!(
                "- ⚠ {} (attachment failed: {})",
                resource.filename, reason
            )),
            AttachmentOutcome::Skipped { .. } => {}
        }
    }
    if !images.is_empty() {
        out.push_str("\n**Images**\n");
        for line in &images {
            out.push_str(line);
            out.push('\n');
        }
    }
    if !files.is_empty() {
        out.push_str("\n**Files**\n");
        for line in &files {
            out.push_str(line);
            out.push('\n');
        }
    }

    out.push_str("\n---\n> [!note]- Properties\n");
    out.push_str(&format!("> - Created: {}\n", display_timestamp(&memo.create_time)));
    out.push_str(&format!("> - Updated: {}\n", display_timestamp(&memo.update_time)));
    out.push_str(&format!("> - Type: {}\n", TYPE_TAG));
    let tags = extract_tags(&memo.content);
    if !tags.is_empty() {
        let joined = tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("> - Tags: {}\n", joined));
    }
    out.push_str(&marker_line(&memo.id));
    out.push('\n');
    out.push_str(&format!("> - Visibility: {}\n", memo.visibility.to_lowercase()));
    out
}

/// 識別行なら、そのメモ ID を返す
///
/// 行末の `\r` 以外は削らない。ID の前後の空白も ID の一部として扱う。
pub fn marker_id(line: &str) -> Option<&str> {
    line.strip_suffix('\r')
        .unwrap_or(line)
        .strip_prefix(MARKER_PREFIX)
}

/// 本文（バケットファイル全体）に識別行があるか
///
/// 行単位で完全一致を見るため `ID: 1` が `ID: 12` に一致することはない。
pub fn contains_marker(text: &str, memo_id: &str) -> bool {
    text.lines().any(|line| marker_id(line) == Some(memo_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn memo(content: &str) -> Memo {
        Memo {
            id: "abc123".to_string(),
            create_time: Local.with_ymd_and_hms(2025, 4, 20, 9, 30, 0).unwrap(),
            update_time: Local.with_ymd_and_hms(2025, 4, 20, 9, 31, 0).unwrap(),
            content: content.to_string(),
            visibility: "PRIVATE".to_string(),
            resources: Vec::new(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("photo.PNG"), AttachmentKind::Image);
        assert_eq!(classify("a.b.JpEg"), AttachmentKind::Image);
        assert_eq!(classify("clip.webp"), AttachmentKind::Image);
        assert_eq!(classify("notes"), AttachmentKind::Other);
        assert_eq!(classify("report.pdf"), AttachmentKind::Other);
        assert_eq!(classify("trailing."), AttachmentKind::Other);
    }

    #[test]
    fn test_rewrite_and_extract_tags() {
        assert_eq!(rewrite_tags("#work# done"), "#work done");
        assert_eq!(extract_tags("#work# done"), vec!["work"]);
        assert_eq!(extract_tags("#a #b\n#a"), vec!["a", "b", "a"]);
        assert!(extract_tags("# heading only").is_empty());
    }

    #[test]
    fn test_render_block_plain() {
        let block = render_block(&memo("#work# done"), &[]);
        let expected = "\n### 09:30\n#work done\n\n---\n> [!note]- Properties\n\
> - Created: 2025-04-20 09:30:00\n> - Updated: 2025-04-20 09:31:00\n\
> - Type: memos\n> - Tags: #work\n> - ID: abc123\n> - Visibility: private\n";
        assert_eq!(block, expected);
    }

    #[test]
    fn test_render_block_without_tags_omits_tags_line() {
        let block = render_block(&memo("plain text"), &[]);
        assert!(!block.contains("Tags:"));
        assert!(block.contains("> - ID: abc123\n"));
    }

    #[test]
    fn test_render_block_attachment_sections_in_fixed_order() {
        let outcomes = vec![
            AttachmentOutcome::Materialized {
                resource: Resource::new("resources/2", "notes.pdf"),
                link: "resources/2_notes.pdf".to_string(),
            },
            AttachmentOutcome::Materialized {
                resource: Resource::new("resources/1", "my photo.PNG"),
                link: "resources/1_my photo.PNG".to_string(),
            },
            AttachmentOutcome::Skipped {
                resource: Resource::new("resources/3", "gone.png"),
            },
        ];
        let block = render_block(&memo("x"), &outcomes);
        let images = block.find("**Images**").unwrap();
        let files = block.find("**Files**").unwrap();
        assert!(images < files);
        assert!(block.contains("![my photo.PNG](<resources/1_my photo.PNG>)\n"));
        assert!(block.contains("- [notes.pdf](resources/2_notes.pdf)\n"));
        assert!(!block.contains("gone.png"));
    }

    #[test]
    fn test_render_block_failed_attachment_line() {
        let outcomes = vec![AttachmentOutcome::Failed {
            resource: Resource::new("resources/9", "a.png"),
            reason: "fetch failed: timeout".to_string(),
        }];
        let block = render_block(&memo("x"), &outcomes);
        assert!(!block.contains("**Images**"));
        assert!(block.contains("**Files**\n- ⚠ a.png (attachment failed: fetch failed: timeout)\n"));
    }

    #[test]
    fn test_content_cannot_forge_marker() {
        let block = render_block(&memo("> - ID: other"), &[]);
        assert!(!contains_marker(&block, "other"));
        assert!(contains_marker(&block, "abc123"));
    }

    #[test]
    fn test_contains_marker_is_line_exact() {
        let text = "x\n> - ID: 12\n";
        assert!(contains_marker(text, "12"));
        assert!(!contains_marker(text, "1"));
        assert!(contains_marker("> - ID: 7\r\n", "7"));
        assert!(!contains_marker("> - ID: 7   \n", "7"));
        assert!(contains_marker("> - ID: 7   \n", "7   "));
        assert!(contains_marker("> - ID: \n", ""));
        assert!(!contains_marker("> - ID: 7\n", ""));
    }

    #[test]
    fn test_marker_id() {
        assert_eq!(marker_id("> - ID: abc"), Some("abc"));
        assert_eq!(marker_id("> - ID: abc \r"), Some("abc "));
        assert_eq!(marker_id("> - ID:abc"), None);
        assert_eq!(marker_id("\\> - ID: abc"), None);
    }

    #[test]
    fn test_render_block_escapes_link_text_and_wraps_parens() {
        let outcomes = vec![
            AttachmentOutcome::Materialized {
                resource: Resource::new("resources/1", "chart(v2.png"),
                link: "resources/1_chart(v2.png".to_string(),
            },
            AttachmentOutcome::Materialized {
                resource: Resource::new("resources/2", "[draft]notes.pdf"),
                link: "resources/2_[draft]notes.pdf".to_string(),
            },
        ];
        let block = render_block(&memo("x"), &outcomes);
        assert!(block.contains("![chart(v2.png](<resources/1_chart(v2.png>)\n"));
        assert!(block.contains("- [\\[draft\\]notes.pdf](resources/2_[draft]notes.pdf)\n"));
    }
}
