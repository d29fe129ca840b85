//! Output line under construction

/// Gap placed between code and a trailing comment when the input spacing was lost.
const COMMENT_GAP: &str = "  ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLine {
    prefix: String,
    code: String,
    comment: String,
    /// Copied as is: trailing whitespace may belong to a string literal
    verbatim: bool,
}

impl OutputLine {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn code(prefix: String, code: &str) -> Self {
        OutputLine {
            prefix,
            code: code.trim_start().to_string(),
            ..Self::default()
        }
    }

    pub fn verbatim(text: &str) -> Self {
        OutputLine {
            code: text.to_string(),
            verbatim: true,
            ..Self::default()
        }
    }

    pub fn comment(prefix: String, comment: &str) -> Self {
        OutputLine {
            prefix,
            comment: comment.to_string(),
            ..Self::default()
        }
    }

    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }

    pub fn push_code(&mut self, text: &str) {
        self.code.push_str(text);
    }

    pub fn push_comment(&mut self, comment: &str) {
        if !self.comment.is_empty() {
            self.comment.push(' ');
        }
        self.comment.push_str(comment);
    }

    /// Terminate the code part with `suffix`, unless it already ends with it.
    pub fn terminate(&mut self, suffix: &str) {
        let code = self.code.trim_end();
        self.code = if code.ends_with(suffix.trim()) {
            code.to_string()
        } else {
            format!("{code}{suffix}")
        };
    }

    pub fn render(&self) -> String {
        if self.verbatim && self.comment.is_empty() {
            return self.code.clone();
        }
        let code = self.code.trim_end();
        match (code.is_empty(), self.comment.is_empty()) {
            (true, true) => String::new(),
            (false, true) => format!("{}{code}", self.prefix),
            (true, false) => format!("{}{}", self.prefix, self.comment),
            (false, false) => {
                let gap = &self.code[code.len()..];
                let gap = if gap.is_empty() { COMMENT_GAP } else { gap };
                format!("{}{code}{gap}{}", self.prefix, self.comment)
            }
        }
    }
}
