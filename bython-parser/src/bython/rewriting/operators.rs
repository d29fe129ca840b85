//! C-style operator rewrites
//!
//!     `&&` → `and`, `||` → `or`, `!x` → `not x` and `else if` → `elif`. The rewrite works on
//!     atoms, so operators inside literals are never touched and `!=` is a separate token.

use crate::bython::token::{Atom, AtomKind, CodeToken};

pub fn rewrite_operators(atoms: Vec<Atom>) -> Vec<Atom> {
    let mut out: Vec<Atom> = Vec::with_capacity(atoms.len());
    let mut i = 0;
    while i < atoms.len() {
        let atom = &atoms[i];
        if atom.is_word("else") {
            let mut j = i + 1;
            while j < atoms.len() && atoms[j].is_whitespace() {
                j += 1;
            }
            if j > i + 1 && j < atoms.len() && atoms[j].is_word("if") {
                out.push(Atom::token(CodeToken::Ident, "elif"));
                i = j + 1;
                continue;
            }
        }
        match atom.kind {
            AtomKind::Token(CodeToken::AndAnd) => push_word(&mut out, atoms.get(i + 1), "and"),
            AtomKind::Token(CodeToken::OrOr) => push_word(&mut out, atoms.get(i + 1), "or"),
            AtomKind::Token(CodeToken::Bang) => push_word(&mut out, atoms.get(i + 1), "not"),
            _ => out.push(atom.clone()),
        }
        i += 1;
    }
    out
}

fn push_word(out: &mut Vec<Atom>, next: Option<&Atom>, word: &str) {
    if let Some(prev) = out.last() {
        if !prev.is_whitespace() && !prev.is(CodeToken::LParen) && !prev.is(CodeToken::LBracket) {
            out.push(Atom::space());
        }
    }
    out.push(Atom::token(CodeToken::Ident, word));
    if next.is_some_and(|n| !n.is_whitespace()) {
        out.push(Atom::space());
    }
}

/// Drop statement-terminating semicolons, keeping any trailing whitespace.
pub fn strip_trailing_semicolons(text: &str) -> String {
    let code = text.trim_end();
    let trailing = &text[code.len()..];
    let stripped = code.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if stripped.len() == code.len() {
        return text.to_string();
    }
    format!("{stripped}{trailing}")
}
