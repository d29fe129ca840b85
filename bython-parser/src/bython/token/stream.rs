//! Atom streams
//!
//! An atom is either a lexed code token or a whole string literal. Rewriters work on atom
//! streams so they can match on token kinds while literals pass through untouched.

use super::core::CodeToken;
use crate::bython::scanning::Piece;
use logos::Logos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    Token(CodeToken),
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub kind: AtomKind,
    pub text: String,
}

impl Atom {
    pub fn token(token: CodeToken, text: impl Into<String>) -> Self {
        Atom {
            kind: AtomKind::Token(token),
            text: text.into(),
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Atom {
            kind: AtomKind::Literal,
            text: text.into(),
        }
    }

    pub fn space() -> Self {
        Atom::token(CodeToken::Whitespace, " ")
    }

    pub fn is(&self, token: CodeToken) -> bool {
        self.kind == AtomKind::Token(token)
    }

    pub fn is_whitespace(&self) -> bool {
        self.is(CodeToken::Whitespace)
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.is(CodeToken::Ident) && self.text == word
    }

    pub fn is_literal(&self) -> bool {
        self.kind == AtomKind::Literal
    }
}

/// Lex a code run. Bytes no rule matches become [`CodeToken::Other`].
pub fn lex(code: &str) -> Vec<Atom> {
    let mut lexer = CodeToken::lexer(code);
    let mut atoms = Vec::new();
    while let Some(result) = lexer.next() {
        let token = result.unwrap_or(CodeToken::Other);
        atoms.push(Atom::token(token, lexer.slice()));
    }
    atoms
}

/// Atoms of the code and literal pieces, in order. Other pieces are skipped.
pub fn atomize<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> Vec<Atom> {
    let mut atoms = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Code(code) => atoms.extend(lex(code)),
            Piece::Literal(text) => atoms.push(Atom::literal(text.as_str())),
            _ => {}
        }
    }
    atoms
}

pub fn render(atoms: &[Atom]) -> String {
    atoms.iter().map(|a| a.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomize_keeps_every_byte() {
        let pieces = vec![
            Piece::Code("x = f(".to_string()),
            Piece::Literal("'a && b'".to_string()),
            Piece::Code(") && y".to_string()),
        ];
        let atoms = atomize(&pieces);
        assert_eq!(render(&atoms), "x = f('a && b') && y");
        assert_eq!(atoms.iter().filter(|a| a.is(CodeToken::AndAnd)).count(), 1);
    }

    #[test]
    fn test_non_ascii_is_preserved() {
        assert_eq!(render(&lex("naïve = 1")), "naïve = 1");
    }

    #[test]
    fn test_unicode_identifier_is_one_token() {
        let atoms = lex("naïve");
        assert_eq!(atoms.len(), 1);
        assert!(atoms[0].is(CodeToken::Ident));
    }
}
