//! Token definitions for code runs
//!
//! Code runs are the pieces of a line outside literals and comments. They are lexed with
//! logos into a flat token list that keeps every byte, so a rewritten run can be rendered by
//! concatenating token texts.
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum CodeToken {
    #[regex(r"[ \t\f]+")]
    Whitespace,

    #[regex(r"[\p{XID_Start}_]\p{XID_Continue}*")]
    Ident,

    // 0x1F, 1_000, 1.5e3 and 3j are one token each
    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,

    // C-style logical operators
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("!=")]
    NotEq,

    #[token("==")]
    EqEq,
    #[token("=")]
    Assign,
    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("*")]
    Star,
    #[token("**")]
    DoubleStar,
    #[token("&")]
    Amp,

    /// Any byte sequence the rules above don't cover
    Other,
}

impl CodeToken {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, CodeToken::Whitespace)
    }

    pub fn opens(&self) -> bool {
        matches!(
            self,
            CodeToken::LParen | CodeToken::LBracket | CodeToken::LBrace
        )
    }

    pub fn closes(&self) -> bool {
        matches!(
            self,
            CodeToken::RParen | CodeToken::RBracket | CodeToken::RBrace
        )
    }
}
