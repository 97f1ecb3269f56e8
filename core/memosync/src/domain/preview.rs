//! メモ本文の短いプレビュー（Markdown 記法を落としたもの）
//!
//! ブロックの書き込みには使わない。ログの `preview` フィールド用。

use regex::Regex;
use std::sync::OnceLock;

struct Patterns {
    image: Regex,
    link: Regex,
    code_fence: Regex,
    inline_code: Regex,
    line_prefix: Regex,
    emphasis: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static Patterns {
    static P: OnceLock<Patterns> = OnceLock::new();
    P.get_or_init(|| Patterns {
        image: Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("static regex"),
        link: Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("static regex"),
        code_fence: Regex::new(r"(?m)^\s*```.*$").expect("static regex"),
        inline_code: Regex::new(r"`([^`]*)`").expect("static regex"),
        line_prefix: Regex::new(r"(?m)^\s*(#{1,6}\s+|>\s?|[-*+]\s+|\d+\.\s+|- \[[ xX]\]\s+)")
            .expect("static regex"),
        emphasis: Regex::new(r"(\*\*|__|\*|_|~~)").expect("static regex"),
        whitespace: Regex::new(r"\s+").expect("static regex"),
    })
}

/// Markdown を素のテキストにして max_chars 文字に切り詰める
pub fn preview(content: &str, max_chars: usize) -> String {
    let p = patterns();
    let s = p.code_fence.replace_all(content, "");
    let s = p.image.replace_all(&s, "$1");
    let s = p.link.replace_all(&s, "$1");
    let s = p.inline_code.replace_all(&s, "$1");
    let s = p.line_prefix.replace_all(&s, "");
    let s = p.emphasis.replace_all(&s, "");
    let s = p.whitespace.replace_all(&s, " ");
    let s = s.trim();

    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_strips_markdown() {
        let md = "## Title\n- **bold** item\n> quote with [link](http://x)\n![img](a.png) `code`";
        assert_eq!(preview(md, 100), "Title bold item quote with link img code");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("日本語のメモです", 3), "日本語…");
        assert_eq!(preview("short", 5), "short");
    }
}
