//! Comment rewrites

use crate::bython::config::{BlockCommentStyle, CommentMarkers, Direction};

/// Docstring delimiter used for block comments.
pub const DOCSTRING_QUOTES: &str = "'''";

/// How one line's share of a block comment is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRendering {
    /// Python text, emitted like code
    Text(String),
    /// A line comment
    Comment(String),
    Nothing,
}

pub fn line_comment(
    markers: &CommentMarkers,
    direction: Direction,
    marker: &str,
    body: &str,
) -> String {
    format!("{}{}", markers.rewrite(marker, direction), body.trim_end())
}

/// A `#!` interpreter line at the top of a Python file, kept as written.
pub fn is_shebang(direction: Direction, line: usize, marker: &str, body: &str) -> bool {
    direction == Direction::Reverse && line == 1 && marker == "#" && body.starts_with('!')
}

/// Render the part of a block comment that sits on one line.
pub fn block_comment(
    style: BlockCommentStyle,
    marker: &str,
    opens: bool,
    closes: bool,
    body: &str,
) -> BlockRendering {
    match style {
        BlockCommentStyle::Docstring => {
            let mut text = String::new();
            if opens {
                text.push_str(DOCSTRING_QUOTES);
            }
            text.push_str(body);
            if closes {
                text.push_str(DOCSTRING_QUOTES);
            }
            BlockRendering::Text(text)
        }
        BlockCommentStyle::Hash if opens => {
            BlockRendering::Comment(format!("{marker}{}", body.trim_end()))
        }
        BlockCommentStyle::Hash => match body.trim() {
            "" => BlockRendering::Nothing,
            text => BlockRendering::Comment(format!("{marker} {text}")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_line_comment_marker() {
        let markers = CommentMarkers::default();
        assert_eq!(
            line_comment(&markers, Direction::Forward, "//", " note  "),
            "# note"
        );
        assert_eq!(
            line_comment(&markers, Direction::Reverse, "#", " note"),
            "// note"
        );
    }

    #[test]
    fn test_shebang_only_on_first_python_line() {
        assert!(is_shebang(Direction::Reverse, 1, "#", "!/usr/bin/env python3"));
        assert!(!is_shebang(Direction::Reverse, 2, "#", "!/usr/bin/env python3"));
        assert!(!is_shebang(Direction::Forward, 1, "#", "!/usr/bin/env python3"));
    }

    #[rstest]
    #[case(true, true, " one ", BlockRendering::Comment("# one".into()))]
    #[case(true, false, " start", BlockRendering::Comment("# start".into()))]
    #[case(false, false, "   middle", BlockRendering::Comment("# middle".into()))]
    #[case(false, true, "  ", BlockRendering::Nothing)]
    fn test_hash_style(
        #[case] opens: bool,
        #[case] closes: bool,
        #[case] body: &str,
        #[case] expected: BlockRendering,
    ) {
        assert_eq!(
            block_comment(BlockCommentStyle::Hash, "#", opens, closes, body),
            expected
        );
    }

    #[test]
    fn test_docstring_style() {
        assert_eq!(
            block_comment(BlockCommentStyle::Docstring, "#", true, true, " doc "),
            BlockRendering::Text("''' doc '''".to_string())
        );
        assert_eq!(
            block_comment(BlockCommentStyle::Docstring, "#", false, false, "  body"),
            BlockRendering::Text("  body".to_string())
        );
    }
}
