//! # サニタイザ
//!
//! 投稿本文からすべてのタグと属性を取り除き、プレーンテキストだけを残す。

use std::collections::HashSet;

/// 中身ごと削除する要素。テキストとして残すと意味を持たないもの。
const NON_TEXT_TAGS: [&str; 5] = ["script", "style", "textarea", "option", "noscript"];

/// タグ・属性を除去したテキストを返す。
///
/// 残ったテキスト中の `<` `>` `&` はエスケープされる。
/// HTML5パーサを通すため、マークアップがなくても改行 `\r\n` は `\n` に、
/// U+00A0（ノーブレークスペース）は `&nbsp;` になる。
pub fn sanitize(text: &str) -> String {
    let clean_content: HashSet<&str> = NON_TEXT_TAGS.into_iter().collect();
    ammonia::Builder::empty()
        .clean_content_tags(clean_content)
        .clean(text)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(sanitize("hola mundo"), "hola mundo");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_tags_removed_text_kept() {
        assert_eq!(sanitize("<b>gm</b> frens"), "gm frens");
        assert_eq!(sanitize("<p class=\"x\">a</p><p>b</p>"), "ab");
        assert_eq!(
            sanitize("<a href=\"https://evil.example\" onclick=\"steal()\">link</a>"),
            "link"
        );
    }

    #[test]
    fn test_script_content_dropped() {
        assert_eq!(sanitize("<script>alert(1)</script>ok"), "ok");
        assert_eq!(sanitize("<style>body{}</style>styled"), "styled");
    }

    #[test]
    fn test_no_markup_survives() {
        let out = sanitize("<img src=x onerror=alert(1)>caption<iframe src=\"//x\"></iframe>");
        assert_eq!(out, "caption");
        assert!(!out.contains('<'));
        assert!(!out.contains("onerror"));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(sanitize("Tom & Jerry"), "Tom &amp; Jerry");
    }

    #[test]
    fn test_parser_normalizes_line_endings_and_nbsp() {
        assert_eq!(sanitize("line1\r\nline2"), "line1\nline2");
        assert_eq!(sanitize("a\u{a0}b"), "a&nbsp;b");
    }
}
