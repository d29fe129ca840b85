//! Token types for the rewriting stage.

pub mod core;
pub mod stream;

pub use core::CodeToken;
pub use stream::{atomize, render, Atom, AtomKind};
