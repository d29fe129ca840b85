//! C-style declarations
//!
//!     Two statement shapes are recognised at the start of a statement:
//!
//!         int add(int a, float b = 1.5) {      →  def add(a, b=1.5):
//!         int count = 0;                       →  count = 0
//!         char name;                           →  name = None
//!
//!     With type hints enabled the types survive as annotations (`def add(a: int, b: float =
//!     1.5) -> int:`, `count: int = 0`). C types map to Python types; anything unknown becomes
//!     `Any`, which asks the emitter for a `from typing import Any` header.
//!
//!     A function header ending in `;` is a prototype and becomes `def f(...): pass`.

use crate::bython::config::TranslationConfig;
use crate::bython::token::{render, Atom, AtomKind, CodeToken};

const TYPE_MAP: &[(&str, &str)] = &[
    ("int", "int"),
    ("long", "int"),
    ("short", "int"),
    ("unsigned", "int"),
    ("signed", "int"),
    ("float", "float"),
    ("double", "float"),
    ("char", "str"),
    ("string", "str"),
    ("str", "str"),
    ("bool", "bool"),
    ("void", "None"),
    ("bytes", "bytes"),
    ("list", "list"),
    ("dict", "dict"),
    ("set", "set"),
    ("tuple", "tuple"),
    ("object", "object"),
];

const MODIFIERS: &[&str] = &[
    "const", "static", "extern", "volatile", "inline", "register", "unsigned", "signed", "long",
    "short",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub text: String,
    /// The text mentions `Any`
    pub uses_any: bool,
}

pub struct DeclarationRewriter<'a> {
    config: &'a TranslationConfig,
}

impl<'a> DeclarationRewriter<'a> {
    pub fn new(config: &'a TranslationConfig) -> Self {
        DeclarationRewriter { config }
    }

    /// Rewrite a statement when it is a declaration. `opens_block` tells whether a `{`
    /// follows the statement on the same line.
    pub fn rewrite(&self, atoms: &[Atom], opens_block: bool) -> Option<Declaration> {
        let sig: Vec<usize> = (0..atoms.len())
            .filter(|&i| !atoms[i].is_whitespace())
            .collect();
        let first = atoms.get(*sig.first()?)?;
        if !first.is(CodeToken::Ident) || self.config.is_keyword(&first.text) {
            return None;
        }
        let typed = sig
            .iter()
            .take_while(|&&i| self.is_type_atom(&atoms[i]))
            .count();
        let indent = render(&atoms[..sig[0]]);
        let mut uses_any = false;
        let text = match sig.get(typed).map(|&i| &atoms[i]) {
            Some(atom) if atom.is(CodeToken::LParen) => {
                self.function(atoms, &sig, typed, opens_block, &mut uses_any)?
            }
            _ => self.variable(atoms, &sig, typed, &mut uses_any)?,
        };
        Some(Declaration {
            text: format!("{indent}{text}"),
            uses_any,
        })
    }

    fn function(
        &self,
        atoms: &[Atom],
        sig: &[usize],
        typed: usize,
        opens_block: bool,
        uses_any: &mut bool,
    ) -> Option<String> {
        let (types, name) = self.split_name(atoms, &sig[..typed])?;
        let open = sig[typed];
        let close = matching_close(atoms, open)?;
        let rest: Vec<&Atom> = atoms[close + 1..]
            .iter()
            .filter(|a| !a.is_whitespace())
            .collect();
        if !rest.iter().all(|a| a.is(CodeToken::Semicolon)) {
            return None;
        }
        let prototype = !rest.is_empty() && !opens_block;

        let params: Vec<String> = split_top_level(&atoms[open + 1..close])
            .into_iter()
            .filter_map(|param| self.parameter(param, uses_any))
            .collect();
        let mut text = format!("def {name}({})", params.join(", "));
        if self.config.type_hints {
            text.push_str(" -> ");
            text.push_str(&python_type(&types, uses_any));
        }
        if prototype {
            text.push_str(": pass");
        }
        Some(text)
    }

    fn variable(
        &self,
        atoms: &[Atom],
        sig: &[usize],
        typed: usize,
        uses_any: &mut bool,
    ) -> Option<String> {
        let (types, name) = self.split_name(atoms, &sig[..typed])?;
        let annotation = if self.config.type_hints {
            format!(": {}", python_type(&types, uses_any))
        } else {
            String::new()
        };
        match sig.get(typed).map(|&i| &atoms[i]) {
            Some(atom) if atom.is(CodeToken::Assign) => {
                let value = render(&atoms[sig[typed] + 1..]);
                Some(format!("{name}{annotation} = {}", value.trim_start()))
            }
            None => Some(format!("{name}{annotation} = None")),
            Some(_) => {
                let rest_is_terminator = sig[typed..]
                    .iter()
                    .all(|&i| atoms[i].is(CodeToken::Semicolon));
                rest_is_terminator.then(|| format!("{name}{annotation} = None"))
            }
        }
    }

    /// Split `type... name` into the type words and the name. Needs at least one type word.
    fn split_name<'t>(&self, atoms: &'t [Atom], sig: &[usize]) -> Option<(Vec<&'t str>, &'t str)> {
        let (&last, rest) = sig.split_last()?;
        let name = &atoms[last];
        if !name.is(CodeToken::Ident) {
            return None;
        }
        let types: Vec<&str> = rest
            .iter()
            .map(|&i| &atoms[i])
            .filter(|a| a.is(CodeToken::Ident))
            .map(|a| a.text.as_str())
            .collect();
        if types.is_empty() {
            return None;
        }
        Some((types, name.text.as_str()))
    }

    fn is_type_atom(&self, atom: &Atom) -> bool {
        (atom.is(CodeToken::Ident) && !self.config.is_keyword(&atom.text))
            || atom.is(CodeToken::Star)
            || atom.is(CodeToken::Amp)
    }

    fn parameter(&self, atoms: &[Atom], uses_any: &mut bool) -> Option<String> {
        let (left, default) = match atoms
            .iter()
            .position(|a| a.is(CodeToken::Assign))
        {
            Some(eq) => (&atoms[..eq], Some(render(&atoms[eq + 1..]).trim().to_string())),
            None => (atoms, None),
        };
        let sig: Vec<&Atom> = left.iter().filter(|a| !a.is_whitespace()).collect();
        let Some(first) = sig.first() else {
            return default;
        };

        let typed = sig.len() > 1
            && !first.is(CodeToken::Star)
            && !first.is(CodeToken::DoubleStar)
            && sig.iter().all(|a| self.is_type_atom(a))
            && sig.last().is_some_and(|a| a.is(CodeToken::Ident));
        let (name, annotation) = if typed {
            let types: Vec<&str> = sig[..sig.len() - 1]
                .iter()
                .filter(|a| a.is(CodeToken::Ident))
                .map(|a| a.text.as_str())
                .collect();
            let name = sig[sig.len() - 1].text.clone();
            let annotation = self
                .config
                .type_hints
                .then(|| python_type(&types, uses_any));
            (name, annotation)
        } else {
            (render(left).trim().to_string(), None)
        };

        Some(match (annotation, default) {
            (Some(ty), Some(default)) => format!("{name}: {ty} = {default}"),
            (Some(ty), None) => format!("{name}: {ty}"),
            (None, Some(default)) => format!("{name}={default}"),
            (None, None) => name,
        })
    }
}

/// Python spelling of a C type.
fn python_type(words: &[&str], uses_any: &mut bool) -> String {
    let word = words
        .iter()
        .rev()
        .find(|w| !MODIFIERS.contains(w))
        .or(words.last())
        .copied()
        .unwrap_or_default();
    match TYPE_MAP.iter().find(|(c, _)| *c == word) {
        Some((_, python)) => python.to_string(),
        None => {
            *uses_any = true;
            "Any".to_string()
        }
    }
}

fn matching_close(atoms: &[Atom], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, atom) in atoms.iter().enumerate().skip(open) {
        let AtomKind::Token(token) = atom.kind else {
            continue;
        };
        if token.opens() {
            depth += 1;
        } else if token.closes() {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn split_top_level(atoms: &[Atom]) -> Vec<&[Atom]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, atom) in atoms.iter().enumerate() {
        if let AtomKind::Token(token) = atom.kind {
            if token.opens() {
                depth += 1;
            } else if token.closes() {
                depth = depth.saturating_sub(1);
            } else if token == CodeToken::Comma && depth == 0 {
                parts.push(&atoms[start..i]);
                start = i + 1;
            }
        }
    }
    parts.push(&atoms[start..]);
    parts
}
