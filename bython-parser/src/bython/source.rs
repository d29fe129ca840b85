//! Line-numbered view of an input buffer

/// One physical line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based
    pub number: usize,
    pub text: String,
}

/// The whole input split into numbered lines. `\r\n` and `\n` terminators are both accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    lines: Vec<SourceLine>,
}

impl SourceBuffer {
    pub fn new(source: &str) -> Self {
        let lines = source
            .lines()
            .enumerate()
            .map(|(idx, text)| SourceLine {
                number: idx + 1,
                text: text.to_string(),
            })
            .collect();
        SourceBuffer { lines }
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of the last line, 0 for an empty buffer.
    pub fn last_line(&self) -> usize {
        self.lines.len()
    }
}

impl From<&str> for SourceBuffer {
    fn from(source: &str) -> Self {
        SourceBuffer::new(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_lines_from_one() {
        let buffer = SourceBuffer::new("a\r\nb\n\nc");
        let texts: Vec<_> = buffer.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "", "c"]);
        assert_eq!(buffer.lines()[3].number, 4);
        assert_eq!(buffer.last_line(), 4);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = SourceBuffer::new("");
        assert!(buffer.is_empty());
        assert_eq!(buffer.last_line(), 0);
    }
}
